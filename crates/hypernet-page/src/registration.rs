use hypernet_core::Result;
use tracing::{debug, warn};

/// The browser's worker container
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WorkerRegistrar: Send + Sync {
    /// Whether the host can run cache workers at all
    fn supported(&self) -> bool;
    async fn register(&self, script: &str) -> Result<()>;
}

/// Register the cache worker; `true` on success
///
/// Failures are expected while developing on localhost and stay quiet there.
pub async fn register_worker(registrar: &dyn WorkerRegistrar, script: &str, hostname: &str) -> bool {
    if !registrar.supported() {
        debug!("Cache workers not supported, skipping registration");
        return false;
    }

    match registrar.register(script).await {
        Ok(()) => true,
        Err(e) => {
            if hostname != "localhost" {
                warn!("Service Worker registration failed: {}", e);
            }
            false
        }
    }
}
