// Minimal request/response model shared by the page and the worker
use crate::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

/// Where a response came from, relative to the requesting page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// Same-origin
    Basic,
    Cors,
    Opaque,
    Error,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Basic => "basic",
            ResponseKind::Cors => "cors",
            ResponseKind::Opaque => "opaque",
            ResponseKind::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "basic" => Some(ResponseKind::Basic),
            "cors" => Some(ResponseKind::Cors),
            "opaque" => Some(ResponseKind::Opaque),
            "error" => Some(ResponseKind::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// POST with a JSON body and the usual JSON headers
    pub fn post_json<T: Serialize>(url: Url, payload: &T) -> Result<Self> {
        let body = serde_json::to_vec(payload)?;
        Ok(Self::new(Method::POST, url)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json")
            .with_body(body))
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Identity used for cache lookups: method plus URL
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub kind: ResponseKind,
}

impl Response {
    /// Same-origin response with a canonical status text
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();

        Self {
            status,
            status_text,
            headers: Vec::new(),
            body: body.into(),
            kind: ResponseKind::Basic,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_kind(mut self, kind: ResponseKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_status_text(mut self, text: &str) -> Self {
        self.status_text = text.to_string();
        self
    }

    /// 2xx, same as `Response.ok` in the browser
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// The network, as far as the page and the worker are concerned
///
/// `Err` means the request never produced a response (DNS, connection
/// refused, offline). Any HTTP status, including 5xx, comes back as `Ok`.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_post_json_sets_headers_and_body() {
        let req = Request::post_json(url("https://example.com/f"), &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("ACCEPT"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[test]
    fn test_cache_key_includes_method() {
        let get = Request::get(url("https://example.com/style.css"));
        let post = Request::new(Method::POST, url("https://example.com/style.css"));
        assert_eq!(get.cache_key(), "GET https://example.com/style.css");
        assert_ne!(get.cache_key(), post.cache_key());
    }

    #[test]
    fn test_response_ok_range() {
        assert!(Response::new(200, "").ok());
        assert!(Response::new(204, "").ok());
        assert!(!Response::new(301, "").ok());
        assert!(!Response::new(503, "").ok());
        assert_eq!(Response::new(503, "").status_text, "Service Unavailable");
    }

    #[test]
    fn test_response_kind_names() {
        for kind in [ResponseKind::Basic, ResponseKind::Cors, ResponseKind::Opaque, ResponseKind::Error] {
            assert_eq!(ResponseKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ResponseKind::parse("weird"), None);
    }
}
