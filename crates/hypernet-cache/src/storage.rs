use crate::Result;
use hypernet_core::{Request, Response};

/// A set of named caches, each mapping request identity to a response
///
/// Request identity is method plus URL. A cache name doubles as the
/// version tag: the worker drops every cache whose name isn't current.
pub trait CacheStorage: Send + Sync {
    /// Create the cache if it doesn't exist yet
    fn open(&self, name: &str) -> Result<()>;

    fn has(&self, name: &str) -> Result<bool>;

    /// Cache names, oldest first
    fn keys(&self) -> Result<Vec<String>>;

    /// Drop a cache and everything in it; `false` if there was nothing to drop
    fn delete(&self, name: &str) -> Result<bool>;

    /// Stored response for this request, if the cache has one
    fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>>;

    /// Store (or replace) the response for this request, creating the cache
    fn put(&self, name: &str, request: &Request, response: &Response) -> Result<()>;

    /// Request identities stored in one cache
    fn entries(&self, name: &str) -> Result<Vec<String>>;
}
