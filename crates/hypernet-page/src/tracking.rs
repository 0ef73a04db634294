// What gets tracked, and with which payload
use hypernet_core::Analytics;
use serde_json::json;

/// Share of a section that has to be visible before it counts as viewed
pub const SECTION_THRESHOLD: f64 = 0.25;

/// One intersection observation for a `<section id=...>`
#[derive(Debug, Clone, PartialEq)]
pub struct SectionEntry {
    pub id: String,
    pub ratio: f64,
}

impl SectionEntry {
    pub fn is_viewed(&self) -> bool {
        !self.id.is_empty() && self.ratio >= SECTION_THRESHOLD
    }
}

/// An anchor element the user clicked
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Link {
    pub href: String,
    pub text: String,
    pub target: Option<String>,
    pub rel: Option<String>,
}

impl Link {
    /// `target="_blank"` with a `rel` mentioning `noopener`
    pub fn is_external(&self) -> bool {
        self.target.as_deref() == Some("_blank")
            && self.rel.as_deref().is_some_and(|rel| rel.contains("noopener"))
    }
}

pub fn track_pageview(analytics: &Analytics, page: &str, title: &str) {
    analytics.track("pageview", json!({ "page": page, "title": title }));
}

/// Emit a `section_view` for every entry past the threshold; returns how many
pub fn track_sections(analytics: &Analytics, entries: &[SectionEntry]) -> usize {
    let mut viewed = 0;
    for entry in entries.iter().filter(|e| e.is_viewed()) {
        analytics.track("section_view", json!({ "section": entry.id }));
        viewed += 1;
    }
    viewed
}

/// Only outbound links are tracked
pub fn track_link_click(analytics: &Analytics, link: &Link) -> bool {
    if !link.is_external() {
        return false;
    }
    analytics.track(
        "external_link_click",
        json!({ "url": link.href, "text": link.text }),
    );
    true
}
