//! HTTP client for the remote approvals store.
//!
//! ```text
//! GET {uri}   Authorization: Bearer <token>            -> 200 [grant, ...]  (ETag optional)
//! PUT {uri}   Authorization: Bearer <token>
//!             If-Match: <etag>  (when the GET had one)  [grant, ...] -> 2xx
//! ```
//!
//! Status mapping:
//!
//! - transport errors, timeouts, 408, 429 and 5xx → `StoreUnavailable`
//! - 401 / 403 → `Unauthorized`
//! - 412 → `Conflict`
//! - any other non-2xx → `StoreRejected`
//! - undecodable body → `InvalidStoreData`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ETAG, IF_MATCH};
use url::Url;

use approvals_core::{
    ApprovalError, ApprovalResult, ApprovalSnapshot, ApprovalStore, Grant, Principal,
};

/// Longest store error body kept in error messages.
const MAX_ERROR_BODY: usize = 512;

/// [`ApprovalStore`] backed by a remote HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpApprovalStore {
    http_client: reqwest::Client,
    uri: Url,
}

impl HttpApprovalStore {
    /// Creates a client for the collection at `uri`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(uri: Url, request_timeout: Duration) -> ApprovalResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ApprovalError::configuration(format!("HTTP client: {e}")))?;
        Ok(Self { http_client, uri })
    }
}

#[async_trait]
impl ApprovalStore for HttpApprovalStore {
    async fn fetch_all(&self, principal: &Principal) -> ApprovalResult<ApprovalSnapshot> {
        let response = self
            .http_client
            .get(self.uri.as_str())
            .bearer_auth(principal.access_token())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(&self.uri, e))?;

        let response = ensure_success(response).await?;

        let version = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let grants: Vec<Grant> = response.json().await.map_err(|e| {
            if e.is_decode() {
                tracing::warn!(uri = %self.uri, error = %e, "Approvals store returned undecodable body");
                ApprovalError::invalid_store_data(e.to_string())
            } else {
                transport_error(&self.uri, e)
            }
        })?;

        tracing::debug!(uri = %self.uri, grants = grants.len(), version = ?version, "Fetched approvals");
        Ok(ApprovalSnapshot { grants, version })
    }

    async fn replace_all(
        &self,
        principal: &Principal,
        grants: &[Grant],
        expected_version: Option<&str>,
    ) -> ApprovalResult<()> {
        let mut request = self
            .http_client
            .put(self.uri.as_str())
            .bearer_auth(principal.access_token())
            .header(ACCEPT, "application/json")
            .json(grants);
        if let Some(version) = expected_version {
            request = request.header(IF_MATCH, version);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(&self.uri, e))?;
        ensure_success(response).await?;

        tracing::debug!(uri = %self.uri, grants = grants.len(), "Replaced approvals");
        Ok(())
    }
}

fn transport_error(uri: &Url, e: reqwest::Error) -> ApprovalError {
    tracing::warn!(uri = %uri, error = %e, timeout = e.is_timeout(), "Approvals store request failed");
    ApprovalError::store_unavailable(e.to_string())
}

/// Passes 2xx responses through and turns everything else into an error.
async fn ensure_success(response: reqwest::Response) -> ApprovalResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(status_error(status, body))
}

fn status_error(status: StatusCode, body: String) -> ApprovalError {
    let message = if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApprovalError::unauthorized(message),
        StatusCode::PRECONDITION_FAILED => ApprovalError::conflict(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            ApprovalError::store_unavailable(message)
        }
        s if s.is_server_error() => ApprovalError::store_unavailable(message),
        s => ApprovalError::store_rejected(s.as_u16(), message),
    }
}
