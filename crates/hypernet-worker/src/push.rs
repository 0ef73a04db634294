// Push messages and notification clicks
use crate::host::NotificationOptions;
use crate::worker::CacheWorker;
use crate::Result;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Optional JSON body of a push message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl PushPayload {
    /// Absent or unparseable payloads both read as empty
    pub fn parse(raw: Option<&[u8]>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_slice(raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Ignoring malformed push payload: {}", e);
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Focused { id: String },
    Opened { url: Url },
}

impl CacheWorker {
    pub fn notification_options(&self, payload: PushPayload) -> NotificationOptions {
        NotificationOptions {
            title: payload
                .title
                .unwrap_or_else(|| self.config.default_title.clone()),
            body: payload.body,
            icon: self.config.notification_icon.clone(),
            badge: self.config.notification_badge.clone(),
            tag: self.config.notification_tag.clone(),
            require_interaction: false,
        }
    }

    /// Show a notification for an incoming push
    ///
    /// Every notification carries the same tag, so a new one replaces any
    /// that hasn't been dismissed yet.
    pub async fn handle_push(&self, payload: Option<&[u8]>) {
        let options = self.notification_options(PushPayload::parse(payload));
        if let Err(e) = self.notifier.show(&options).await {
            warn!("Failed to show notification: {}", e);
        }
    }

    /// Close the notification, then bring the site root to the front
    ///
    /// Focuses an existing window already on `/` if there is one,
    /// otherwise opens a new one.
    pub async fn handle_notification_click(&self, tag: &str) -> Result<ClickOutcome> {
        if let Err(e) = self.notifier.close(tag).await {
            debug!("Failed to close notification {}: {}", tag, e);
        }

        let root = self.resolve("/")?;
        let windows = self.clients.match_windows().await?;

        if let Some(window) = windows.iter().find(|w| w.url == root && w.focusable) {
            self.clients.focus(&window.id).await?;
            return Ok(ClickOutcome::Focused {
                id: window.id.clone(),
            });
        }

        self.clients.open_window(&root).await?;
        Ok(ClickOutcome::Opened { url: root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockClients, MockNotifier, WindowClient};
    use hypernet_cache::MemoryCacheStorage;
    use hypernet_core::{HttpClient, MemoryStore, Request, Response, SiteConfig};
    use mockall::predicate::*;
    use std::sync::Arc;

    struct NoNetwork;

    #[async_trait::async_trait]
    impl HttpClient for NoNetwork {
        async fn send(&self, _request: &Request) -> hypernet_core::Result<Response> {
            Err(hypernet_core::Error::Network("no network in this test".into()))
        }
    }

    fn worker(notifier: MockNotifier, clients: MockClients) -> CacheWorker {
        CacheWorker::new(
            &SiteConfig::default(),
            Arc::new(MemoryCacheStorage::new()),
            Arc::new(NoNetwork),
            Arc::new(MemoryStore::new()),
        )
        .unwrap()
        .with_notifier(Arc::new(notifier))
        .with_clients(Arc::new(clients))
    }

    fn window(id: &str, url: &str, focusable: bool) -> WindowClient {
        WindowClient {
            id: id.to_string(),
            url: Url::parse(url).unwrap(),
            focusable,
        }
    }

    #[test]
    fn test_payload_parsing() {
        assert_eq!(PushPayload::parse(None), PushPayload::default());
        assert_eq!(PushPayload::parse(Some(b"not json".as_slice())), PushPayload::default());
        assert_eq!(
            PushPayload::parse(Some(br#"{"title":"Launch","body":"We're live"}"#.as_slice())),
            PushPayload {
                title: Some("Launch".into()),
                body: Some("We're live".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_push_without_payload_uses_default_title() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_show()
            .withf(|o| {
                o.title == "Hypernet Update"
                    && o.body.is_none()
                    && o.icon == "/assets/icon.png"
                    && o.badge == "/assets/badge.png"
                    && o.tag == "hypernet-notification"
                    && !o.require_interaction
            })
            .times(1)
            .returning(|_| Ok(()));

        worker(notifier, MockClients::new()).handle_push(None).await;
    }

    #[tokio::test]
    async fn test_push_with_payload() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_show()
            .withf(|o| o.title == "Launch" && o.body.as_deref() == Some("Live now"))
            .times(1)
            .returning(|_| Ok(()));

        worker(notifier, MockClients::new())
            .handle_push(Some(br#"{"title":"Launch","body":"Live now"}"#.as_slice()))
            .await;
    }

    #[tokio::test]
    async fn test_click_focuses_existing_root_window() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_close()
            .with(eq("hypernet-notification"))
            .times(1)
            .returning(|_| Ok(()));

        let mut clients = MockClients::new();
        clients.expect_match_windows().returning(|| {
            Ok(vec![
                window("blog", "http://localhost:8000/blog", true),
                window("root", "http://localhost:8000/", true),
            ])
        });
        clients
            .expect_focus()
            .with(eq("root"))
            .times(1)
            .returning(|_| Ok(()));
        clients.expect_open_window().never();

        let outcome = worker(notifier, clients)
            .handle_notification_click("hypernet-notification")
            .await
            .unwrap();
        assert_eq!(outcome, ClickOutcome::Focused { id: "root".into() });
    }

    #[tokio::test]
    async fn test_click_opens_root_when_none_open() {
        let mut notifier = MockNotifier::new();
        notifier.expect_close().returning(|_| Ok(()));

        let mut clients = MockClients::new();
        clients
            .expect_match_windows()
            .returning(|| Ok(vec![window("blog", "http://localhost:8000/blog", true)]));
        clients.expect_focus().never();
        clients
            .expect_open_window()
            .withf(|url| url.as_str() == "http://localhost:8000/")
            .times(1)
            .returning(|_| Ok(()));

        let outcome = worker(notifier, clients)
            .handle_notification_click("hypernet-notification")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Opened {
                url: Url::parse("http://localhost:8000/").unwrap()
            }
        );
    }
}
