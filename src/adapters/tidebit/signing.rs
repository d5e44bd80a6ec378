//! TideBit Signing
//!
//! Turns an endpoint path and parameters into a ready-to-send request.
//! Private requests carry `access_key`, `tonce` and an HMAC-SHA256 signature
//! over `METHOD|/api/{version}/{path}.json|{sorted urlencoded query}`.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::{HttpMethod, HttpRequest};
use crate::adapters::types::Params;

use super::config::TidebitConfig;

type HmacSha256 = Hmac<Sha256>;

/// API section an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Public,
    Private,
}

/// Current time in Unix milliseconds, used as the request nonce
pub fn current_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::error!("System time error: {}", e);
            0
        })
}

/// Names of `{placeholder}` segments in `path`
pub fn extract_params(path: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                names.push(after[..end].to_string());
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

/// Substitute `{placeholder}` segments in `path` from `params`
pub fn implode_params(path: &str, params: &Params) -> String {
    let mut result = path.to_string();
    for name in extract_params(path) {
        if let Some(value) = params.get(&name) {
            result = result.replace(&format!("{{{}}}", name), value);
        }
    }
    result
}

/// Form-urlencode params in key order
pub fn urlencode(params: &Params) -> ExchangeResult<String> {
    serde_urlencoded::to_string(params)
        .map_err(|e| ExchangeError::Exchange(format!("failed to encode request params: {}", e)))
}

/// Hex-encoded HMAC-SHA256 of `payload` keyed by `secret`
pub fn hmac_sha256_hex(payload: &str, secret: &str) -> ExchangeResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::AuthenticationFailed(format!("HMAC initialization failed: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build the request for `path` with `params`
///
/// `nonce` is only used for private requests.
pub fn sign(
    config: &TidebitConfig,
    api: Api,
    method: HttpMethod,
    path: &str,
    params: &Params,
    nonce: u64,
) -> ExchangeResult<HttpRequest> {
    let request_path = format!(
        "/api/{}/{}.json",
        config.api_version,
        implode_params(path, params)
    );
    let mut url = format!("{}{}", config.rest_base_url(), request_path);
    let mut headers = Vec::new();
    let mut body = None;

    match api {
        Api::Public => {
            let path_params = extract_params(path);
            let query: Params = params
                .iter()
                .filter(|(key, _)| !path_params.contains(key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            if !query.is_empty() {
                url.push('?');
                url.push_str(&urlencode(&query)?);
            }
        }
        Api::Private => {
            let (api_key, secret) = config.credentials()?;
            let mut signed = Params::new();
            signed.insert("access_key".to_string(), api_key.to_string());
            signed.insert("tonce".to_string(), nonce.to_string());
            signed.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));

            let query = urlencode(&signed)?;
            let payload = format!("{}|{}|{}", method.as_str(), request_path, query);
            let signature = hmac_sha256_hex(&payload, secret)?;
            let suffix = format!("{}&signature={}", query, signature);

            match method {
                HttpMethod::Get => {
                    url.push('?');
                    url.push_str(&suffix);
                }
                HttpMethod::Post => {
                    body = Some(suffix);
                    headers.push((
                        "Content-Type".to_string(),
                        "application/x-www-form-urlencoded".to_string(),
                    ));
                }
            }
        }
    }

    Ok(HttpRequest {
        method,
        url,
        headers,
        body,
    })
}
