// Lightweight event tracking: external sink if present, local log always
use crate::clock::Clock;
use crate::logs::EventLog;
use crate::models::AnalyticsEvent;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Third-party analytics (gtag, Mixpanel, a custom backend...)
///
/// Fire-and-forget. Whatever happens on the other side is not our problem.
#[cfg_attr(test, mockall::automock)]
pub trait AnalyticsSink: Send + Sync {
    fn send(&self, event: &str, data: &Value);
}

pub struct Analytics {
    log: EventLog,
    clock: Arc<dyn Clock>,
    sink: Option<Arc<dyn AnalyticsSink>>,
    dev_host: bool,
}

impl Analytics {
    pub fn new(log: EventLog, clock: Arc<dyn Clock>) -> Self {
        Self {
            log,
            clock,
            sink: None,
            dev_host: false,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Echo every event to the log output, handy on localhost
    pub fn with_dev_host(mut self, dev_host: bool) -> Self {
        self.dev_host = dev_host;
        self
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Record one event
    ///
    /// Never fails: a broken storage backend just means the event isn't
    /// persisted.
    pub fn track(&self, event: &str, data: Value) {
        if let Some(sink) = &self.sink {
            sink.send(event, &data);
        }

        if self.dev_host {
            info!(event, %data, "Event");
        }

        let record = AnalyticsEvent {
            event: event.to_string(),
            data,
            timestamp: self.clock.now(),
        };

        if let Err(e) = self.log.append(record) {
            warn!("Local storage not available: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::{DisabledStore, MemoryStore};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::*;
    use serde_json::json;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()))
    }

    #[test]
    fn test_track_persists_event() {
        let analytics = Analytics::new(EventLog::new(Arc::new(MemoryStore::new())), clock());
        analytics.track("pageview", json!({ "page": "/", "title": "Hypernet" }));

        let events = analytics.log().load().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "pageview");
        assert_eq!(events[0].data["page"], "/");
        assert_eq!(events[0].timestamp, clock().now());
    }

    #[test]
    fn test_track_forwards_to_sink() {
        let mut sink = MockAnalyticsSink::new();
        sink.expect_send()
            .with(eq("section_view"), eq(json!({ "section": "about" })))
            .times(1)
            .return_const(());

        let analytics = Analytics::new(EventLog::new(Arc::new(MemoryStore::new())), clock())
            .with_sink(Arc::new(sink));
        analytics.track("section_view", json!({ "section": "about" }));
    }

    #[test]
    fn test_track_survives_missing_storage() {
        let mut sink = MockAnalyticsSink::new();
        sink.expect_send().times(1).return_const(());

        let analytics = Analytics::new(EventLog::new(Arc::new(DisabledStore)), clock())
            .with_sink(Arc::new(sink))
            .with_dev_host(true);

        // no panic, sink still called
        analytics.track("pageview", json!({}));
    }

    #[test]
    fn test_track_caps_at_hundred() {
        let analytics = Analytics::new(EventLog::new(Arc::new(MemoryStore::new())), clock());
        for n in 0..130 {
            analytics.track("tick", json!({ "n": n }));
        }

        let events = analytics.log().load().unwrap();
        assert_eq!(events.len(), 100);
        assert_eq!(events[0].data["n"], 30);
    }
}
