//! HTTP plumbing shared by the explorer clients.
//!
//! # Responsibilities
//! - Build a client with fixed connect and request timeouts
//! - Map transport failures, timeouts and non-2xx statuses to `ExplorerError`
//! - Decode JSON bodies with `serde_json` so decode errors stay distinct

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::explorer::types::{ExplorerError, ExplorerResult};

/// Longest body excerpt kept in a status error.
const MAX_ERROR_BODY: usize = 256;

/// Build an HTTP client whose every request is bounded by `timeout_secs`.
pub fn build_client(timeout_secs: u64) -> ExplorerResult<Client> {
    let timeout = Duration::from_secs(timeout_secs);
    Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ExplorerError::ClientBuild(e.to_string()))
}

/// Parse a base URL, accepting only http and https.
pub fn parse_base_url(raw: &str) -> ExplorerResult<Url> {
    let url = Url::parse(raw).map_err(|e| ExplorerError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExplorerError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Append percent-encoded path segments to a base URL.
pub fn endpoint(base: &Url, segments: &[&str]) -> ExplorerResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ExplorerError::InvalidUrl {
            url: base.to_string(),
            reason: "cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a request and return the body of a successful response as text.
///
/// `what` names the looked-up object for the 404 case.
pub async fn fetch_text(
    request: RequestBuilder,
    timeout_secs: u64,
    what: &'static str,
) -> ExplorerResult<String> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(e, timeout_secs))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(e, timeout_secs))?;

    tracing::debug!(status = status.as_u16(), bytes = body.len(), "Explorer response");

    if status == StatusCode::NOT_FOUND {
        return Err(ExplorerError::NotFound(what));
    }
    if !status.is_success() {
        return Err(ExplorerError::Status {
            status: status.as_u16(),
            body: truncate(body.trim(), MAX_ERROR_BODY),
        });
    }
    Ok(body)
}

/// Send a request and decode a successful JSON response.
pub async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    timeout_secs: u64,
    what: &'static str,
) -> ExplorerResult<T> {
    let body = fetch_text(request, timeout_secs, what).await?;
    Ok(serde_json::from_str(&body)?)
}

fn transport_error(err: reqwest::Error, timeout_secs: u64) -> ExplorerError {
    if err.is_timeout() {
        ExplorerError::Timeout(timeout_secs)
    } else {
        // The Ethereum URL carries the API key in its query string.
        ExplorerError::Http(err.without_url())
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
