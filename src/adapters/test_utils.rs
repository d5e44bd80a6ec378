//! Shared test utilities for adapter testing
//!
//! Provides `MockTransport`, an in-memory `HttpTransport` that serves canned
//! responses keyed by method and URL path, and records every request it sees.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::{HttpMethod, HttpRequest, HttpTransport};

type Route = (HttpMethod, String);

/// Canned reply: a JSON body or an HTTP status with raw body
#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(u16, String),
}

/// In-memory transport for adapter unit tests
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<Route, Reply>,
    requests: Mutex<Vec<HttpRequest>>,
}

/// URL path without scheme, host or query
fn path_of(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or(url);
    match without_query.find("://") {
        Some(scheme_end) => {
            let rest = &without_query[scheme_end + 3..];
            rest.find('/').map(|i| &rest[i..]).unwrap_or("/")
        }
        None => without_query,
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `method` on `path`
    pub fn on(mut self, method: HttpMethod, path: &str, body: Value) -> Self {
        self.routes.insert((method, path.to_string()), Reply::Json(body));
        self
    }

    /// Fail `method` on `path` with a non-2xx status
    pub fn on_status(mut self, method: HttpMethod, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert((method, path.to_string()), Reply::Status(status, body.to_string()));
        self
    }

    /// All requests seen so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made to `path`
    pub fn count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }

    /// Most recent request made to `path`
    pub fn last_request(&self, path: &str) -> Option<HttpRequest> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| path_of(&r.url) == path)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn request(&self, request: HttpRequest) -> ExchangeResult<Value> {
        let key = (request.method, path_of(&request.url).to_string());
        self.requests.lock().unwrap().push(request);
        match self.routes.get(&key) {
            Some(Reply::Json(body)) => Ok(body.clone()),
            Some(Reply::Status(status, body)) => Err(ExchangeError::HttpStatus {
                status: *status,
                body: body.clone(),
            }),
            None => Err(ExchangeError::HttpStatus {
                status: 404,
                body: format!("no mock route for {} {}", key.0.as_str(), key.1),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_of() {
        assert_eq!(path_of("https://h.test/api/v2/k.json?a=1"), "/api/v2/k.json");
        assert_eq!(path_of("http://h.test"), "/");
        assert_eq!(path_of("/x?y"), "/x");
    }

    #[tokio::test]
    async fn test_mock_records_and_routes() {
        let mock = MockTransport::new().on(HttpMethod::Get, "/a", json!({"ok": true}));
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "https://h.test/a?q=1".into(),
            headers: vec![],
            body: None,
        };
        assert_eq!(mock.request(request.clone()).await.unwrap(), json!({"ok": true}));

        let missing = HttpRequest {
            method: HttpMethod::Post,
            ..request
        };
        assert!(matches!(
            mock.request(missing).await,
            Err(ExchangeError::HttpStatus { status: 404, .. })
        ));
        assert_eq!(mock.count("/a"), 2);
    }
}
