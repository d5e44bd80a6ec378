//! Reqwest-backed HTTP transport
//!
//! Sends shaped `HttpRequest`s and turns responses into JSON values.
//! Non-2xx statuses surface as `ExchangeError::HttpStatus` with the raw body
//! so adapters can map exchange error payloads.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::{HttpMethod, HttpRequest, HttpTransport};
use crate::config::constants;

/// Max idle connections per host in connection pool
const HTTP_POOL_MAX_IDLE: usize = 5;
/// How long idle connections stay in the pool (seconds)
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 60;
/// TCP keepalive interval (seconds)
const HTTP_TCP_KEEPALIVE_SECS: u64 = 30;

/// Create a pooled HTTP client with the given request timeout
pub fn create_http_client(exchange_name: &str, timeout: Duration) -> reqwest::Client {
    let connect_timeout = constants::http_connect_timeout();
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE)
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .tcp_keepalive(Duration::from_secs(HTTP_TCP_KEEPALIVE_SECS))
        .build()
        .unwrap_or_else(|e| {
            tracing::error!(exchange = %exchange_name, error = %e, "Failed to build HTTP client, using default");
            reqwest::Client::new()
        });
    tracing::info!(
        phase = "init",
        exchange = %exchange_name,
        timeout_ms = timeout.as_millis() as u64,
        connect_timeout_ms = connect_timeout.as_millis() as u64,
        pool_max_idle = HTTP_POOL_MAX_IDLE,
        "HTTP client configured"
    );
    client
}

/// Production transport over a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    exchange_name: &'static str,
    timeout_ms: u64,
}

impl ReqwestTransport {
    pub fn new(exchange_name: &'static str, timeout: Duration) -> Self {
        Self {
            client: create_http_client(exchange_name, timeout),
            exchange_name,
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> ExchangeError {
        if err.is_timeout() {
            ExchangeError::NetworkTimeout(self.timeout_ms)
        } else {
            ExchangeError::ConnectionFailed(err.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(&self, request: HttpRequest) -> ExchangeResult<Value> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        // Query strings of private GETs carry the signature
        let path = request.url.split('?').next().unwrap_or_default();
        tracing::debug!(
            exchange = self.exchange_name,
            method = request.method.as_str(),
            path = %path,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "HTTP request completed"
        );

        if !status.is_success() {
            return Err(ExchangeError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(parse_body(&text))
    }
}

/// Parse a response body as JSON, keeping non-JSON bodies as a string value
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
