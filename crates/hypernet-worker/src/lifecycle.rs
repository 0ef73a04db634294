// Install / activate: precache the asset list, then retire older versions
use crate::worker::CacheWorker;
use crate::{Result, WorkerError};
use futures::future::try_join_all;
use hypernet_core::{Request, Response};
use tracing::{info, warn};

/// Lifecycle of a worker, from freshly parsed to retired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Assets now in the cache (zero when precaching failed)
    pub precached: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivateReport {
    /// Cache names dropped because they weren't the current version
    pub deleted: Vec<String>,
}

impl CacheWorker {
    /// Open the cache and fill it with the precache list
    ///
    /// A failed precache is logged and the worker still moves on; there is
    /// no retry. Installing also skips the waiting phase, so the next
    /// `activate` can run straight away.
    pub async fn install(&self) -> InstallReport {
        self.set_state(WorkerState::Installing);

        let report = match self.precache().await {
            Ok(precached) => {
                info!("Precached {} assets into {}", precached, self.cache_name());
                InstallReport {
                    precached,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Service Worker install error: {}", e);
                InstallReport {
                    precached: 0,
                    error: Some(e.to_string()),
                }
            }
        };

        self.set_state(WorkerState::Installed);
        report
    }

    /// All-or-nothing: every asset must come back 2xx before anything is stored
    pub async fn precache(&self) -> Result<usize> {
        self.caches.open(self.cache_name())?;

        let mut requests = Vec::with_capacity(self.config.precache.len());
        for path in &self.config.precache {
            requests.push(Request::get(self.resolve(path)?));
        }

        let fetches = requests.iter().map(|request| self.fetch_asset(request));
        let responses = try_join_all(fetches).await?;

        for (request, response) in requests.iter().zip(&responses) {
            self.caches.put(self.cache_name(), request, response)?;
        }

        Ok(responses.len())
    }

    async fn fetch_asset(&self, request: &Request) -> Result<Response> {
        let response = self.network.send(request).await?;
        if !response.ok() {
            return Err(WorkerError::Precache {
                url: request.url.to_string(),
                status: response.status,
            });
        }
        Ok(response)
    }

    /// Drop every cache that isn't the current version, then claim open pages
    ///
    /// Old assets become unreachable the moment this returns.
    pub async fn activate(&self) -> Result<ActivateReport> {
        self.set_state(WorkerState::Activating);

        let deleted = match self.purge_stale_caches() {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!("Failed to clean old caches: {}", e);
                Vec::new()
            }
        };

        self.clients.claim().await?;
        self.set_controlling(true);
        self.set_state(WorkerState::Activated);

        info!(
            "Activated {} (dropped {} stale caches)",
            self.cache_name(),
            deleted.len()
        );
        Ok(ActivateReport { deleted })
    }

    fn purge_stale_caches(&self) -> Result<Vec<String>> {
        let mut deleted = Vec::new();
        for name in self.caches.keys()? {
            if name != self.cache_name() && self.caches.delete(&name)? {
                deleted.push(name);
            }
        }
        Ok(deleted)
    }

    /// Pick up as the worker that activated in an earlier run
    ///
    /// Controls pages straight away without touching any cache, so a
    /// short-lived process can serve from the current version.
    pub fn resume(&self) {
        self.set_controlling(true);
        self.set_state(WorkerState::Activated);
    }

    /// Replaced by a newer worker; stop handling anything
    pub fn retire(&self) {
        self.set_controlling(false);
        self.set_state(WorkerState::Redundant);
    }
}
