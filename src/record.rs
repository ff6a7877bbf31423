//! Run Record Assembly
//!
//! One output row: field name to JSON value, in template column order. A
//! record is seeded from a [`TemplateSchema`](crate::template::TemplateSchema)
//! with every field empty, filled from configuration lookups, then extended
//! with performance metrics under a merge policy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ident::ID_FIELD;
use crate::template::TemplateSchema;

/// Policy for metric keys the record does not already carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergePolicy {
    /// Skip unknown keys silently
    #[default]
    MatchTemplate,
    /// Append unknown keys to the record after warning on stderr
    Extend,
}

/// Result of one metrics merge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// Keys written into the record, in merge order
    pub applied: Vec<String>,
    /// Keys dropped by [`MergePolicy::MatchTemplate`]
    pub skipped: Vec<String>,
}

/// One run's worth of collected values, keyed by field name
///
/// Column order is fixed once established: template fields first, then the
/// reserved `ID` field when the template lacks it, then any keys appended by
/// [`MergePolicy::Extend`] in merge order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    fields: Vec<String>,
    values: HashMap<String, Value>,
}

impl RunRecord {
    /// Seed a record from a template schema
    ///
    /// Every template field starts empty; the `ID` field is set to `id`.
    pub fn from_schema(schema: &TemplateSchema, id: impl Into<String>) -> Self {
        let mut fields: Vec<String> = schema.fields().to_vec();
        if !schema.contains(ID_FIELD) {
            fields.push(ID_FIELD.to_string());
        }
        let values = fields.iter().map(|f| (f.clone(), Value::Null)).collect();
        let mut record = Self { fields, values };
        record.set_id(id);
        record
    }

    /// Overwrite the reserved `ID` field
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.values
            .insert(ID_FIELD.to_string(), Value::String(id.into()));
    }

    /// The current identifier, when it is a string
    pub fn id(&self) -> Option<&str> {
        self.values.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Store a value for an existing field
    ///
    /// `Null` values and names outside the record are ignored; absent
    /// configuration attributes mean "intentionally empty", not errors.
    pub fn set(&mut self, name: &str, value: Value) {
        if value.is_null() || !self.values.contains_key(name) {
            return;
        }
        self.values.insert(name.to_string(), value);
    }

    /// The stored value for a field, `Null` included
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether the record carries this field
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether the field holds no value yet
    pub fn is_empty_field(&self, name: &str) -> bool {
        matches!(self.values.get(name), None | Some(Value::Null))
    }

    /// Field names in column order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Merge performance metrics into the record
    ///
    /// Known keys are overwritten with the supplied value, `Null` included.
    /// Unknown keys follow `policy`: dropped silently under `MatchTemplate`,
    /// appended to the column order after a stderr warning under `Extend`.
    pub fn merge_metrics<I>(&mut self, metrics: I, policy: MergePolicy) -> MergeOutcome
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut outcome = MergeOutcome::default();
        for (key, value) in metrics {
            if !self.values.contains_key(&key) {
                match policy {
                    MergePolicy::MatchTemplate => {
                        outcome.skipped.push(key);
                        continue;
                    }
                    MergePolicy::Extend => {
                        eprintln!(
                            "Metric {key:?} is not named by the template; adding it to the record"
                        );
                        self.fields.push(key.clone());
                    }
                }
            }
            self.values.insert(key.clone(), value);
            outcome.applied.push(key);
        }
        outcome
    }

    /// The record as a JSON object
    ///
    /// `serde_json` maps iterate in sorted key order, so the object
    /// serializes with sorted keys regardless of column order.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| {
                (
                    f.clone(),
                    self.values.get(f).cloned().unwrap_or(Value::Null),
                )
            })
            .collect();
        Value::Object(map)
    }

    /// Key-sorted, 4-space-indented JSON text of the record
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        pretty_sorted(&self.to_value())
    }
}

/// Serialize a value as indented JSON with 4-space indentation
///
/// Map keys come out sorted, so output is byte-stable for an unchanged value.
pub(crate) fn pretty_sorted(value: &Value) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
