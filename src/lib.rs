//! # Registrar: Training-Run Record Keeping
//!
//! Registrar collects the hyperparameters and performance metrics of one
//! training run into a single tabular row. A template file names the columns;
//! values come from a nested configuration by dotted-path lookup plus an
//! explicit metrics map; the finished row lands in a delimited log file
//! (appending unions columns with prior rows), a JSON snapshot, or a webhook
//! POST.
//!
//! ## Architecture
//!
//! - **template**: ordered field schema read from CSV/TSV/XLSX headers
//! - **ident**: run identifier providers (wall clock, fixed)
//! - **source**: dotted-path resolution over configuration values
//! - **record**: the output record and metric merge policies
//! - **table**: delimited log persistence with outer-join append
//! - **webhook**: one-shot JSON delivery of the record
//! - **recorder**: the [`RunRecorder`] facade tying it together
//!
//! ## Example
//!
//! ```
//! use registrar::{FixedId, MergePolicy, RunRecorder, TemplateSchema};
//! use serde_json::json;
//!
//! let schema = TemplateSchema::from_fields(["ID", "lr", "batch_size"]);
//! let mut recorder =
//!     RunRecorder::from_schema(schema).with_id_provider(FixedId::new("202601011200"));
//!
//! recorder.populate_from(&json!({ "lr": 0.01 })).unwrap();
//! let outcome = recorder.merge_metrics(
//!     [
//!         ("batch_size".to_string(), json!(4)),
//!         ("extra".to_string(), json!(1)),
//!     ],
//!     MergePolicy::MatchTemplate,
//! );
//!
//! assert_eq!(outcome.skipped, vec!["extra".to_string()]);
//! assert_eq!(recorder.record().get("lr"), Some(&json!(0.01)));
//! assert_eq!(recorder.id(), "202601011200");
//! ```

pub mod error;
pub mod ident;
pub mod record;
pub mod recorder;
pub mod source;
pub mod table;
pub mod template;
pub mod webhook;

// Re-export commonly used types
pub use error::{Error, Result};
pub use ident::{FixedId, IdProvider, IdStrategy, TimestampId, ID_FIELD};
pub use record::{MergeOutcome, MergePolicy, RunRecord};
pub use recorder::RunRecorder;
pub use source::{ConfigSnapshot, ResolvePath};
pub use template::{TemplateFormat, TemplateSchema};
pub use webhook::WebhookClient;
