//! Run Identifier Providers
//!
//! Every record carries a reserved `ID` field tagging the run. The default
//! provider derives it from the local wall clock (`YYYYMMDDHHMM`, one log row
//! per training session); a fixed provider pins the identifier for tests and
//! for callers that manage their own run names.

use chrono::Local;

/// Reserved field name for the record identifier
pub const ID_FIELD: &str = "ID";

/// How the recorder maintains the `ID` field across saves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Reassert the provider-derived identifier before every save
    #[default]
    ByTime,
    /// Leave the `ID` field exactly as last set
    Manual,
}

/// Source of run identifier strings
pub trait IdProvider {
    /// Produce the identifier for a new run
    fn next_id(&self) -> String;
}

/// Wall-clock identifier provider (`YYYYMMDDHHMM`, local time)
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampId;

impl IdProvider for TimestampId {
    fn next_id(&self) -> String {
        Local::now().format("%Y%m%d%H%M").to_string()
    }
}

/// Fixed identifier provider for tests and externally named runs
#[derive(Debug, Clone)]
pub struct FixedId(String);

impl FixedId {
    /// Create a provider that always yields `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl IdProvider for FixedId {
    fn next_id(&self) -> String {
        self.0.clone()
    }
}
