// Web vitals and navigation timing, reported as analytics events
use hypernet_core::Analytics;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum VitalName {
    CLS,
    FID,
    FCP,
    LCP,
    TTFB,
}

impl VitalName {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalName::CLS => "CLS",
            VitalName::FID => "FID",
            VitalName::FCP => "FCP",
            VitalName::LCP => "LCP",
            VitalName::TTFB => "TTFB",
        }
    }
}

/// A single web-vitals measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: VitalName,
    pub value: f64,
    pub id: String,
}

/// Navigation timing marks, milliseconds since the epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationTiming {
    pub navigation_start: u64,
    pub domain_lookup_start: u64,
    pub domain_lookup_end: u64,
    pub connect_start: u64,
    pub connect_end: u64,
    pub response_start: u64,
    pub dom_interactive: u64,
    pub load_event_end: u64,
}

impl NavigationTiming {
    /// Payload for the `page_load_time` event
    ///
    /// Marks that never fired read as 0; differences saturate instead of
    /// going negative.
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "duration": self.load_event_end.saturating_sub(self.navigation_start),
            "dns": self.domain_lookup_end.saturating_sub(self.domain_lookup_start),
            "tcp": self.connect_end.saturating_sub(self.connect_start),
            "ttfb": self.response_start.saturating_sub(self.navigation_start),
            "dom": self.dom_interactive.saturating_sub(self.navigation_start),
            "resources": self.load_event_end.saturating_sub(self.dom_interactive),
        })
    }
}

pub fn track_metric(analytics: &Analytics, metric: &Metric) {
    analytics.track(
        metric.name.as_str(),
        serde_json::to_value(metric).unwrap_or_default(),
    );
}

pub fn track_page_load(analytics: &Analytics, timing: &NavigationTiming) {
    analytics.track("page_load_time", timing.summary());
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypernet_core::{EventLog, FixedClock, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn test_timing_summary() {
        let timing = NavigationTiming {
            navigation_start: 1_000,
            domain_lookup_start: 1_010,
            domain_lookup_end: 1_030,
            connect_start: 1_030,
            connect_end: 1_080,
            response_start: 1_200,
            dom_interactive: 1_600,
            load_event_end: 2_500,
        };

        assert_eq!(
            timing.summary(),
            json!({
                "duration": 1500,
                "dns": 20,
                "tcp": 50,
                "ttfb": 200,
                "dom": 600,
                "resources": 900,
            })
        );
    }

    #[test]
    fn test_unfinished_load_saturates() {
        let timing = NavigationTiming {
            navigation_start: 1_000,
            dom_interactive: 1_400,
            ..Default::default()
        };
        let summary = timing.summary();
        assert_eq!(summary["duration"], 0);
        assert_eq!(summary["resources"], 0);
        assert_eq!(summary["dom"], 400);
    }

    #[test]
    fn test_metric_tracked_under_its_name() {
        let analytics = Analytics::new(
            EventLog::new(Arc::new(MemoryStore::new())),
            Arc::new(FixedClock(chrono::Utc::now())),
        );
        track_metric(
            &analytics,
            &Metric { name: VitalName::LCP, value: 1234.5, id: "v3-1".into() },
        );

        let events = analytics.log().load().unwrap();
        assert_eq!(events[0].event, "LCP");
        assert_eq!(events[0].data["value"], 1234.5);
        assert_eq!(events[0].data["name"], "LCP");
    }
}
