// Named, versioned response caches
// What the worker serves from when the network is slow or gone

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod storage;

pub use error::{CacheError, Result};
pub use memory::MemoryCacheStorage;
pub use sqlite::SqliteCacheStorage;
pub use storage::CacheStorage;
