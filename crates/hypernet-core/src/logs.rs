// The two append-only logs kept in local storage
use crate::models::{AnalyticsEvent, SubmissionRecord};
use crate::storage::{KeyValueStore, StorageResult};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// Local storage key for queued contact-form submissions
pub const SUBMISSIONS_KEY: &str = "hypernetSubmissions";

/// Local storage key for tracked analytics events
pub const EVENTS_KEY: &str = "hypernetEvents";

/// Default cap on the events log
pub const MAX_EVENTS: usize = 100;

/// A JSON array living under one storage key
struct JsonList<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonList<T> {
    fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    /// Missing key and a stored `null` both read as an empty list
    fn load(&self) -> StorageResult<Vec<T>> {
        match self.store.get_item(self.key)? {
            Some(raw) => Ok(serde_json::from_str::<Option<Vec<T>>>(&raw)?.unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, items: &[T]) -> StorageResult<()> {
        let raw = serde_json::to_string(items)?;
        self.store.set_item(self.key, &raw)
    }

    fn clear(&self) -> StorageResult<()> {
        self.store.remove_item(self.key)
    }
}

/// Ordered queue of submissions waiting for the deferred sync
pub struct SubmissionLog {
    list: JsonList<SubmissionRecord>,
}

impl SubmissionLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            list: JsonList::new(store, SUBMISSIONS_KEY),
        }
    }

    pub fn load(&self) -> StorageResult<Vec<SubmissionRecord>> {
        self.list.load()
    }

    pub fn append(&self, record: SubmissionRecord) -> StorageResult<()> {
        let mut records = self.list.load()?;
        records.push(record);
        self.list.save(&records)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.list.clear()
    }
}

/// Rolling window of the most recent analytics events
pub struct EventLog {
    list: JsonList<AnalyticsEvent>,
    capacity: usize,
}

impl EventLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(store, MAX_EVENTS)
    }

    pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            list: JsonList::new(store, EVENTS_KEY),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load(&self) -> StorageResult<Vec<AnalyticsEvent>> {
        self.list.load()
    }

    /// Append and drop the oldest entries past capacity
    pub fn append(&self, event: AnalyticsEvent) -> StorageResult<()> {
        let mut events = self.list.load()?;
        events.push(event);
        let overflow = events.len().saturating_sub(self.capacity);
        events.drain(..overflow);
        self.list.save(&events)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.list.clear()
    }
}
