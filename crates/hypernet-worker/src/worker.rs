use crate::fetch::FetchOutcome;
use crate::host::{Clients, HeadlessHost, Notifier};
use crate::lifecycle::{ActivateReport, InstallReport, WorkerState};
use crate::push::ClickOutcome;
use crate::sync::SyncReport;
use crate::Result;
use hypernet_cache::CacheStorage;
use hypernet_core::config::WorkerConfig;
use hypernet_core::{HttpClient, KeyValueStore, Request, SiteConfig, SubmissionLog};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;
use url::Url;

/// Everything the host can throw at a worker
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch(Request),
    Sync { tag: String },
    Push { payload: Option<Vec<u8>> },
    NotificationClick { tag: String },
    /// A newer version took over
    Superseded,
}

#[derive(Debug)]
pub enum WorkerReply {
    Installed(InstallReport),
    Activated(ActivateReport),
    Fetched(FetchOutcome),
    /// `None` when the tag wasn't ours
    Synced(Option<SyncReport>),
    Pushed,
    Clicked(ClickOutcome),
    Retired,
}

/// The offline cache worker
///
/// All state lives in the injected collaborators; the struct itself only
/// tracks where it is in its lifecycle.
pub struct CacheWorker {
    pub(crate) config: WorkerConfig,
    pub(crate) origin: Url,
    pub(crate) caches: Arc<dyn CacheStorage>,
    pub(crate) network: Arc<dyn HttpClient>,
    pub(crate) submissions: SubmissionLog,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) clients: Arc<dyn Clients>,
    state: Mutex<WorkerState>,
    controlling: AtomicBool,
}

impl CacheWorker {
    pub fn new(
        config: &SiteConfig,
        caches: Arc<dyn CacheStorage>,
        network: Arc<dyn HttpClient>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        Ok(Self {
            config: config.worker.clone(),
            origin: config.origin()?,
            caches,
            network,
            submissions: SubmissionLog::new(store),
            notifier: Arc::new(HeadlessHost),
            clients: Arc::new(HeadlessHost),
            state: Mutex::new(WorkerState::Parsed),
            controlling: AtomicBool::new(false),
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_clients(mut self, clients: Arc<dyn Clients>) -> Self {
        self.clients = clients;
        self
    }

    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    pub fn state(&self) -> WorkerState {
        match self.state.lock() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub(crate) fn set_state(&self, next: WorkerState) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        debug!("Worker state {:?} -> {:?}", *state, next);
        *state = next;
    }

    /// Whether open pages route their requests through this worker
    pub fn is_controlling(&self) -> bool {
        self.controlling.load(Ordering::SeqCst)
    }

    pub(crate) fn set_controlling(&self, controlling: bool) {
        self.controlling.store(controlling, Ordering::SeqCst);
    }

    /// Site-relative path or absolute URL, resolved against the origin
    pub(crate) fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self
            .origin
            .join(path)
            .map_err(hypernet_core::Error::from)?)
    }

    /// Route one host event to its handler
    pub async fn dispatch(&self, event: WorkerEvent) -> Result<WorkerReply> {
        let reply = match event {
            WorkerEvent::Install => WorkerReply::Installed(self.install().await),
            WorkerEvent::Activate => WorkerReply::Activated(self.activate().await?),
            WorkerEvent::Fetch(request) => WorkerReply::Fetched(self.handle_fetch(&request).await),
            WorkerEvent::Sync { tag } => WorkerReply::Synced(self.handle_sync(&tag).await),
            WorkerEvent::Push { payload } => {
                self.handle_push(payload.as_deref()).await;
                WorkerReply::Pushed
            }
            WorkerEvent::NotificationClick { tag } => {
                WorkerReply::Clicked(self.handle_notification_click(&tag).await?)
            }
            WorkerEvent::Superseded => {
                self.retire();
                WorkerReply::Retired
            }
        };
        Ok(reply)
    }
}
