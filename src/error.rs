//! Error types for Registrar

use thiserror::Error;

use crate::table::TableError;
use crate::template::TemplateError;
use crate::webhook::WebhookError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No configuration captured; populate the recorder before exporting")]
    NoConfig,

    #[error("No webhook endpoint configured")]
    NoWebhook,
}

pub type Result<T> = std::result::Result<T, Error>;
