use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkerError>;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Cache error: {0}")]
    Cache(#[from] hypernet_cache::CacheError),

    #[error("{0}")]
    Core(#[from] hypernet_core::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] hypernet_core::StorageError),

    #[error("Precache of {url} failed with status {status}")]
    Precache { url: String, status: u16 },

    #[error("Host error: {0}")]
    Host(String),
}
