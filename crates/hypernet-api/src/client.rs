use hypernet_core::{HttpClient, Request, Response, ResponseKind, Result};
use url::Url;
use tracing::debug;

/// `HttpClient` over reqwest
///
/// Knows the site origin so it can tag responses the way a browser would:
/// same-origin answers are `basic`, everything else `cors`.
pub struct ReqwestClient {
    client: reqwest::Client,
    origin: Url,
}

impl ReqwestClient {
    pub fn new(origin: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin,
        }
    }

    pub fn with_client(client: reqwest::Client, origin: Url) -> Self {
        Self { client, origin }
    }

    fn classify(&self, url: &Url) -> ResponseKind {
        if url.origin() == self.origin.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: &Request) -> Result<Response> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!("{} {}", request.method, request.url);
        let response = builder.send().await?;

        let status = response.status();
        // classify on the final URL, redirects may have left the origin
        let kind = self.classify(response.url());
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body,
            kind,
        })
    }
}
