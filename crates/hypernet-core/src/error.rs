use thiserror::Error;

/// All the ways the site plumbing can go wrong
///
/// None of these are fatal to the page. Callers log and degrade.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}")]
    Status { status: u16 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

/// Local storage failures
///
/// Kept separate from [`Error`] so store implementations don't drag in
/// the network variants.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage is not available: {0}")]
    Unavailable(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored value is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
