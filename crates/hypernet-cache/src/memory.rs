use crate::storage::CacheStorage;
use crate::{CacheError, Result};
use hypernet_core::{Request, Response};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    order: Vec<String>,
    caches: HashMap<String, HashMap<String, Response>>,
}

/// Cache storage held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    inner: Mutex<Inner>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| CacheError::Unavailable("cache lock poisoned".into()))
    }
}

impl Inner {
    fn open(&mut self, name: &str) -> &mut HashMap<String, Response> {
        if !self.caches.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.caches.entry(name.to_string()).or_default()
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&self, name: &str) -> Result<()> {
        self.lock()?.open(name);
        Ok(())
    }

    fn has(&self, name: &str) -> Result<bool> {
        Ok(self.lock()?.caches.contains_key(name))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.order.clone())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let mut inner = self.lock()?;
        inner.order.retain(|n| n != name);
        Ok(inner.caches.remove(name).is_some())
    }

    fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>> {
        let inner = self.lock()?;
        Ok(inner
            .caches
            .get(name)
            .and_then(|cache| cache.get(&request.cache_key()))
            .cloned())
    }

    fn put(&self, name: &str, request: &Request, response: &Response) -> Result<()> {
        self.lock()?
            .open(name)
            .insert(request.cache_key(), response.clone());
        Ok(())
    }

    fn entries(&self, name: &str) -> Result<Vec<String>> {
        let inner = self.lock()?;
        let mut keys: Vec<String> = inner
            .caches
            .get(name)
            .map(|cache| cache.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
