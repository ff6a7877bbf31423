//! Run Recorder
//!
//! `RunRecorder` ties the pieces together: load a template schema, fill the
//! record from a configuration value by dotted-path lookup, merge performance
//! metrics, then persist the row to a delimited log, export the configuration
//! snapshot, or deliver the record to a webhook.
//!
//! # Example
//!
//! ```
//! use registrar::{FixedId, MergePolicy, RunRecorder, TemplateSchema};
//! use serde_json::json;
//!
//! let schema = TemplateSchema::from_fields(["ID", "lr", "batch_size"]);
//! let mut recorder =
//!     RunRecorder::from_schema(schema).with_id_provider(FixedId::new("202601011200"));
//!
//! recorder
//!     .populate_from(&json!({"lr": 0.01, "model": {"depth": 4}}))
//!     .unwrap();
//! recorder.merge_metrics(
//!     [("batch_size".to_string(), json!(4))],
//!     MergePolicy::MatchTemplate,
//! );
//!
//! assert_eq!(recorder.record().get("lr"), Some(&json!(0.01)));
//! assert_eq!(recorder.record().get("batch_size"), Some(&json!(4)));
//! ```


use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::ident::{IdProvider, IdStrategy, TimestampId};
use crate::record::{pretty_sorted, MergeOutcome, MergePolicy, RunRecord};
use crate::source::{ConfigSnapshot, ResolvePath};
use crate::table;
use crate::template::TemplateSchema;
use crate::webhook::WebhookClient;

/// Assembles one training-run record and persists it
pub struct RunRecorder {
    schema: TemplateSchema,
    record: RunRecord,
    run_id: String,
    id_strategy: IdStrategy,
    snapshot: Option<ConfigSnapshot>,
    webhook: Option<WebhookClient>,
}

impl RunRecorder {
    /// Load the template schema from `path` and seed an empty record
    ///
    /// Fatal when the extension is not a supported template format or the
    /// file cannot be read.
    pub fn from_template(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_schema(TemplateSchema::from_path(path)?))
    }

    /// Seed a recorder from an in-memory schema
    ///
    /// The run identifier starts as the wall-clock timestamp.
    pub fn from_schema(schema: TemplateSchema) -> Self {
        let run_id = TimestampId.next_id();
        let record = RunRecord::from_schema(&schema, run_id.clone());
        Self {
            schema,
            record,
            run_id,
            id_strategy: IdStrategy::default(),
            snapshot: None,
            webhook: None,
        }
    }

    /// Re-derive the run identifier from a different provider
    pub fn with_id_provider(mut self, provider: impl IdProvider) -> Self {
        self.run_id = provider.next_id();
        self.record.set_id(self.run_id.clone());
        self
    }

    /// Choose how the `ID` field is maintained across saves
    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Attach a webhook endpoint for [`notify`](Self::notify)
    pub fn with_webhook(mut self, url: impl Into<String>) -> Result<Self> {
        self.webhook = Some(WebhookClient::new(url)?);
        Ok(self)
    }

    /// Override the run identifier with a caller-supplied string
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.run_id = id.into();
        self.record.set_id(self.run_id.clone());
    }

    /// The current run identifier
    pub fn id(&self) -> &str {
        &self.run_id
    }

    /// The template schema the record was seeded from
    pub fn schema(&self) -> &TemplateSchema {
        &self.schema
    }

    /// The assembled record
    pub fn record(&self) -> &RunRecord {
        &self.record
    }

    /// The retained configuration snapshot, when one was captured
    pub fn snapshot(&self) -> Option<&ConfigSnapshot> {
        self.snapshot.as_ref()
    }

    /// The configured webhook client, when one was attached
    pub fn webhook(&self) -> Option<&WebhookClient> {
        self.webhook.as_ref()
    }

    /// Fill template fields from a configuration by dotted-path lookup
    ///
    /// Every template field is resolved against `config`; hits are stored
    /// verbatim, missing paths are treated as intentionally empty. The full
    /// value is retained for [`export_config`](Self::export_config).
    pub fn populate_from<C: Serialize>(&mut self, config: &C) -> Result<()> {
        let value = serde_json::to_value(config)?;
        self.populate_from_value(value);
        Ok(())
    }

    /// Same as [`populate_from`](Self::populate_from), for an
    /// already-converted JSON value
    pub fn populate_from_value(&mut self, config: Value) {
        for field in self.schema.fields() {
            if let Some(resolved) = config.resolve(field) {
                self.record.set(field, resolved.clone());
            }
        }
        self.snapshot = Some(ConfigSnapshot::new(config));
    }

    /// Merge performance metrics into the record
    ///
    /// Follows [`MergePolicy`] for keys the record does not carry. Applied
    /// entries are also mirrored into the retained snapshot's `performance`
    /// map when a configuration was captured.
    pub fn merge_metrics<I>(&mut self, metrics: I, policy: MergePolicy) -> MergeOutcome
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let pairs: Vec<(String, Value)> = metrics.into_iter().collect();
        if let Some(snapshot) = &mut self.snapshot {
            snapshot.clear_performance();
        }

        let outcome = self.record.merge_metrics(pairs.iter().cloned(), policy);

        if let Some(snapshot) = &mut self.snapshot {
            for (key, value) in pairs {
                if outcome.applied.contains(&key) {
                    snapshot.set_performance(&key, value);
                }
            }
        }
        outcome
    }

    /// Persist the record, appending when the log already exists
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with(path, true)
    }

    /// Persist the record to `path`
    ///
    /// With `append_if_exists` and an existing log, the record is appended
    /// under an outer-join union of columns; otherwise the file is created
    /// (or rewritten) with only the record's columns. Under
    /// [`IdStrategy::ByTime`] the `ID` field is reasserted before every
    /// write.
    pub fn save_with(&mut self, path: impl AsRef<Path>, append_if_exists: bool) -> Result<()> {
        if self.id_strategy == IdStrategy::ByTime {
            self.record.set_id(self.run_id.clone());
        }

        let path = path.as_ref();
        if append_if_exists && path.exists() {
            table::append_row(path, &self.record)?;
        } else {
            table::write_row(path, &self.record)?;
        }
        Ok(())
    }

    /// Write the retained configuration snapshot as key-sorted indented JSON
    ///
    /// Errors with [`Error::NoConfig`] when no configuration was populated.
    pub fn export_config(&self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = self.snapshot.as_ref().ok_or(Error::NoConfig)?;
        let text = pretty_sorted(snapshot.root())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Deliver the record to the configured webhook endpoint
    ///
    /// Errors with [`Error::NoWebhook`] when no endpoint was attached;
    /// transport failures and non-2xx statuses propagate.
    pub fn notify(&self) -> Result<()> {
        let webhook = self.webhook.as_ref().ok_or(Error::NoWebhook)?;
        webhook.send(&self.record.to_value())?;
        Ok(())
    }

    /// Key-sorted pretty JSON of the current record
    pub fn preview(&self) -> Result<String> {
        Ok(self.record.to_json_pretty()?)
    }
}

impl std::fmt::Debug for RunRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunRecorder")
            .field("run_id", &self.run_id)
            .field("id_strategy", &self.id_strategy)
            .field("fields", &self.record.fields().len())
            .field("has_snapshot", &self.snapshot.is_some())
            .field("has_webhook", &self.webhook.is_some())
            .finish_non_exhaustive()
    }
}
