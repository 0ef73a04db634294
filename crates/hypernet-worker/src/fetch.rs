// Request interception: cache first, then network, then the offline page
use crate::worker::CacheWorker;
use hypernet_core::{Request, Response, ResponseKind};
use tracing::{debug, warn};

const OFFLINE_PAGE: &str = "<h1>Offline</h1><p>Please check your internet connection.</p>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not ours - the request goes to the network untouched
    Passthrough,
    Respond {
        response: Response,
        source: ResponseSource,
    },
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Passthrough => None,
            FetchOutcome::Respond { response, .. } => Some(response),
        }
    }

    pub fn source(&self) -> Option<ResponseSource> {
        match self {
            FetchOutcome::Passthrough => None,
            FetchOutcome::Respond { source, .. } => Some(*source),
        }
    }
}

/// What the page gets when neither the cache nor the network can answer
pub fn offline_response() -> Response {
    Response::new(503, OFFLINE_PAGE)
        .with_header("Content-Type", "text/html")
        .with_status_text("Service Unavailable")
}

impl CacheWorker {
    /// Answer an intercepted request
    ///
    /// Only GETs are handled, and only once this worker controls the page.
    /// Cached entries are returned as-is with no revalidation; they go stale
    /// until the next version bump.
    pub async fn handle_fetch(&self, request: &Request) -> FetchOutcome {
        if !request.is_get() || !self.is_controlling() {
            return FetchOutcome::Passthrough;
        }

        match self.caches.match_request(self.cache_name(), request) {
            Ok(Some(response)) => {
                debug!("Cache hit for {}", request.url);
                return FetchOutcome::Respond {
                    response,
                    source: ResponseSource::Cache,
                };
            }
            Ok(None) => debug!("Cache miss for {}", request.url),
            Err(e) => warn!("Cache lookup failed for {}: {}", request.url, e),
        }

        match self.network.send(request).await {
            Ok(response) => {
                if Self::is_cacheable(&response) {
                    if let Err(e) = self.caches.put(self.cache_name(), request, &response) {
                        warn!("Failed to cache {}: {}", request.url, e);
                    }
                }
                FetchOutcome::Respond {
                    response,
                    source: ResponseSource::Network,
                }
            }
            Err(e) => {
                debug!("Network failed for {}: {}", request.url, e);
                FetchOutcome::Respond {
                    response: offline_response(),
                    source: ResponseSource::Offline,
                }
            }
        }
    }

    /// Exactly 200 and same-origin; redirects, partials and third-party
    /// responses are passed along but never stored
    fn is_cacheable(response: &Response) -> bool {
        response.status == 200 && response.kind == ResponseKind::Basic
    }
}
