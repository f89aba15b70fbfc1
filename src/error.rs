//! Error types for vpn-client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt event log: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("invalid date '{token}': {reason}")]
    DateParse { token: String, reason: String },

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("invalid sort order '{0}' (expected asc or desc)")]
    InvalidSortOrder(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
