// What the worker needs from its host: notifications and window clients
use crate::Result;
use serde::Serialize;
use tracing::info;
use url::Url;

/// Everything needed to put a notification on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOptions {
    pub title: String,
    pub body: Option<String>,
    pub icon: String,
    pub badge: String,
    /// Same tag replaces instead of stacking
    pub tag: String,
    pub require_interaction: bool,
}

/// A top-level window the worker can see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: Url,
    /// Some clients can't be focused (already closing, minimised by policy...)
    pub focusable: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn show(&self, options: &NotificationOptions) -> Result<()>;
    async fn close(&self, tag: &str) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Clients: Send + Sync {
    async fn match_windows(&self) -> Result<Vec<WindowClient>>;
    async fn focus(&self, id: &str) -> Result<()>;
    async fn open_window(&self, url: &Url) -> Result<()>;
    /// Take control of every open page without waiting for a reload
    async fn claim(&self) -> Result<()>;
}

/// Host with no screen and no windows; notifications go to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessHost;

#[async_trait::async_trait]
impl Notifier for HeadlessHost {
    async fn show(&self, options: &NotificationOptions) -> Result<()> {
        info!(
            tag = %options.tag,
            body = options.body.as_deref().unwrap_or(""),
            "Notification: {}",
            options.title
        );
        Ok(())
    }

    async fn close(&self, tag: &str) -> Result<()> {
        info!(tag, "Notification closed");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Clients for HeadlessHost {
    async fn match_windows(&self) -> Result<Vec<WindowClient>> {
        Ok(Vec::new())
    }

    async fn focus(&self, id: &str) -> Result<()> {
        info!(id, "Focus window");
        Ok(())
    }

    async fn open_window(&self, url: &Url) -> Result<()> {
        info!(%url, "Open window");
        Ok(())
    }

    async fn claim(&self) -> Result<()> {
        Ok(())
    }
}
