// Deferred sync: flush submissions queued in local storage
use crate::worker::CacheWorker;
use hypernet_core::Request;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub attempted: usize,
    /// Sends that errored or came back non-2xx. These records are gone.
    pub failed: usize,
    pub cleared: bool,
}

impl CacheWorker {
    /// Handle a background-sync signal; anything but our tag is ignored
    pub async fn handle_sync(&self, tag: &str) -> Option<SyncReport> {
        if tag != self.config.sync_tag {
            return None;
        }
        Some(self.sync_form_submissions().await)
    }

    /// Post every queued submission in order, then clear the queue
    ///
    /// Best effort: the queue is cleared even when some sends failed, so
    /// failed records are lost. `SyncReport::failed` says how many. A queue
    /// that can't be read is left alone.
    pub async fn sync_form_submissions(&self) -> SyncReport {
        let mut report = SyncReport::default();

        let submissions = match self.submissions.load() {
            Ok(submissions) => submissions,
            Err(e) => {
                warn!("Sync error: {}", e);
                return report;
            }
        };

        let endpoint = match self.resolve(&self.config.sync_endpoint) {
            Ok(url) => url,
            Err(e) => {
                warn!("Sync error: {}", e);
                return report;
            }
        };

        for submission in &submissions {
            report.attempted += 1;

            let request = match Request::post_json(endpoint.clone(), submission) {
                Ok(request) => request,
                Err(e) => {
                    warn!("Failed to encode submission: {}", e);
                    report.failed += 1;
                    continue;
                }
            };

            match self.network.send(&request).await {
                Ok(response) if response.ok() => {}
                Ok(response) => {
                    warn!("Submission sync rejected with status {}", response.status);
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("Submission sync failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        match self.submissions.clear() {
            Ok(()) => report.cleared = true,
            Err(e) => warn!("Sync error: {}", e),
        }

        info!(
            "Synced {} submissions ({} failed)",
            report.attempted, report.failed
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypernet_cache::MemoryCacheStorage;
    use hypernet_core::{
        ContactForm, Error, HttpClient, KeyValueStore, MemoryStore, Response, SiteConfig,
        SubmissionLog, SubmissionRecord,
    };
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        statuses: Mutex<Vec<Option<u16>>>,
        sent: Mutex<Vec<Request>>,
    }

    #[async_trait::async_trait]
    impl HttpClient for Recorder {
        async fn send(&self, request: &Request) -> hypernet_core::Result<Response> {
            self.sent.lock().unwrap().push(request.clone());
            match self.statuses.lock().unwrap().remove(0) {
                Some(status) => Ok(Response::new(status, "")),
                None => Err(Error::Network("offline".into())),
            }
        }
    }

    fn queue(store: &Arc<MemoryStore>, names: &[&str]) {
        let log = SubmissionLog::new(store.clone());
        for name in names {
            let form = ContactForm {
                name: name.to_string(),
                email: format!("{}@x.com", name),
                interest: "demo".into(),
                message: "hi".into(),
                newsletter: false,
            };
            log.append(SubmissionRecord::from_form(&form, chrono::Utc::now()))
                .unwrap();
        }
    }

    fn worker(store: Arc<MemoryStore>, statuses: Vec<Option<u16>>) -> (CacheWorker, Arc<Recorder>) {
        let network = Arc::new(Recorder {
            statuses: Mutex::new(statuses),
            sent: Default::default(),
        });
        let worker = CacheWorker::new(
            &SiteConfig::default(),
            Arc::new(MemoryCacheStorage::new()),
            network.clone(),
            store,
        )
        .unwrap();
        (worker, network)
    }

    #[tokio::test]
    async fn test_flush_sends_in_order_and_clears() {
        let store = Arc::new(MemoryStore::new());
        queue(&store, &["a", "b", "c"]);
        let (worker, network) = worker(store.clone(), vec![Some(200), Some(201), Some(200)]);

        let report = worker.handle_sync("sync-form-submissions").await.unwrap();
        assert_eq!(report, SyncReport { attempted: 3, failed: 0, cleared: true });

        let sent = network.sent.lock().unwrap();
        let names: Vec<String> = sent
            .iter()
            .map(|r| {
                let body: SubmissionRecord = serde_json::from_slice(r.body.as_ref().unwrap()).unwrap();
                body.name
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(sent.iter().all(|r| r.url.as_str() == "http://localhost:8000/api/submissions"));
        assert!(sent.iter().all(|r| r.method == reqwest::Method::POST));
        assert_eq!(store.get_item(hypernet_core::SUBMISSIONS_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_partial_failure_still_clears_queue() {
        let store = Arc::new(MemoryStore::new());
        queue(&store, &["a", "b", "c"]);
        let (worker, _) = worker(store.clone(), vec![Some(200), None, Some(500)]);

        let report = worker.sync_form_submissions().await;
        assert_eq!(report, SyncReport { attempted: 3, failed: 2, cleared: true });
        assert!(SubmissionLog::new(store).load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_tags_ignored() {
        let store = Arc::new(MemoryStore::new());
        queue(&store, &["a"]);
        let (worker, network) = worker(store.clone(), vec![]);

        assert_eq!(worker.handle_sync("sync-something-else").await, None);
        assert!(network.sent.lock().unwrap().is_empty());
        assert_eq!(SubmissionLog::new(store).load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_queue_left_in_place() {
        let store = Arc::new(MemoryStore::new());
        store.set_item(hypernet_core::SUBMISSIONS_KEY, "{oops").unwrap();
        let (worker, network) = worker(store.clone(), vec![]);

        let report = worker.sync_form_submissions().await;
        assert_eq!(report, SyncReport::default());
        assert!(network.sent.lock().unwrap().is_empty());
        assert_eq!(
            store.get_item(hypernet_core::SUBMISSIONS_KEY).unwrap().as_deref(),
            Some("{oops")
        );
    }

    #[tokio::test]
    async fn test_empty_queue() {
        let (worker, _) = worker(Arc::new(MemoryStore::new()), vec![]);
        let report = worker.sync_form_submissions().await;
        assert_eq!(report, SyncReport { attempted: 0, failed: 0, cleared: true });
    }
}
