//! Error types shared by the data layer and outbound integrations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid stored value: {0}")]
    InvalidValue(String),

    #[error("bundled data is malformed: {0}")]
    MockData(#[from] serde_json::Error),
}

impl DataError {
    /// A unique index rejected the write (SQLSTATE 23505).
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DataError::Database(sqlx::Error::Database(e)) if e.is_unique_violation())
    }
}

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("{0} integration is not configured")]
    NotConfigured(&'static str),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("unexpected upstream response: {0}")]
    Response(String),
}
