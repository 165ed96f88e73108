//! The blocking HTTP session shared by every resource client.
//!
//! A [`Transport`] carries the base URL, the default headers (bearer
//! token, content type, user agent, optional org id), and the retry
//! policy. Every response passes through [`validate`] before a caller
//! sees it, so a status >= 400 always surfaces as a typed error.

use std::thread;
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::datasets::ContentType;
use crate::error::{ApiError, Error, Result, decode_error_details};
use crate::util::join_url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Retry policy for transient server failures.
///
/// Applies only to the statuses listed in `statuses`; client errors and
/// network-level failures surface immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Backoff factor in seconds: the delay before retry `n` is
    /// `backoff_factor * 2^(n - 1)`.
    pub backoff_factor: f64,
    /// Status codes worth retrying.
    pub statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_factor: 2.0,
            statuses: vec![500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    fn is_retryable(&self, status: u16) -> bool {
        self.statuses.contains(&status)
    }

    fn delay(&self, retry: u32) -> Duration {
        Duration::from_secs_f64(self.backoff_factor * f64::from(2u32.pow(retry - 1)))
    }
}

/// An HTTP session bound to a base URL. Immutable once built; the
/// underlying connection pool is reference-counted, so clones share it
/// and the session can be used from multiple threads.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: HttpClient,
    headers: HeaderMap,
    base_url: String,
    retry: RetryPolicy,
}

impl Transport {
    pub(crate) fn new(base_url: String, token: &str, org_id: Option<&str>) -> Result<Self> {
        let headers = default_headers(token, org_id)?;
        let http = build_http(headers.clone(), DEFAULT_TIMEOUT)?;
        Ok(Self {
            http,
            headers,
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    pub(crate) fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_http(self.headers.clone(), timeout)?;
        Ok(self)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, &[], None, None)?;
        read_json(response)
    }

    pub(crate) fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_vec(body)?;
        let response = self.send(Method::POST, path, &[], None, Some(body))?;
        read_json(response)
    }

    pub(crate) fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_vec(body)?;
        let response = self.send(Method::PUT, path, &[], None, Some(body))?;
        read_json(response)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[], None, None)?;
        Ok(())
    }

    /// POST with a caller-encoded payload and an explicit content type,
    /// overriding the session default (used for NDJSON/CSV ingestion).
    pub(crate) fn post_bytes<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: ContentType,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.send(Method::POST, path, query, Some(content_type), Some(body))?;
        read_json(response)
    }

    /// Sends a request, retrying transient server statuses up to the
    /// attempt budget. The validator only ever sees the last response
    /// of a retry chain. Network-level errors propagate immediately.
    fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        content_type: Option<ContentType>,
        body: Option<Vec<u8>>,
    ) -> Result<Response> {
        let url = join_url(&self.base_url, path);
        tracing::trace!(%method, %url, "sending request");

        let mut attempt = 1u32;
        loop {
            let mut request = self.http.request(method.clone(), url.as_str());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(content_type) = content_type {
                request = request.header(CONTENT_TYPE, content_type.as_str());
            }
            if let Some(body) = &body {
                request = request.body(body.clone());
            }

            let response = request.send()?;
            let status = response.status().as_u16();

            if self.retry.is_retryable(status) && attempt < self.retry.attempts {
                let delay = self.retry.delay(attempt);
                tracing::debug!(
                    status,
                    attempt,
                    delay_secs = delay.as_secs_f64(),
                    "transient server error; retrying"
                );
                thread::sleep(delay);
                attempt += 1;
                continue;
            }

            return validate(response);
        }
    }
}

fn default_headers(token: &str, org_id: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| Error::InvalidHeader("Authorization"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    // Default content type; ingestion calls override it per request.
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&format!("axiom-client/{}", env!("CARGO_PKG_VERSION")))
            .unwrap_or(HeaderValue::from_static("axiom-client")),
    );

    if let Some(org_id) = org_id {
        tracing::debug!(%org_id, "found organization id");
        headers.insert(
            "x-axiom-org-id",
            HeaderValue::from_str(org_id).map_err(|_| Error::InvalidHeader("X-Axiom-Org-Id"))?,
        );
    }

    Ok(headers)
}

fn build_http(headers: HeaderMap, timeout: Duration) -> Result<HttpClient> {
    Ok(HttpClient::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}

/// Converts any >= 400 response into a typed [`ApiError`], decoding the
/// body per its content type. Successful responses pass through with no
/// body decoding.
fn validate(response: Response) -> Result<Response> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let url = response.url().clone();
    let body = response.text().unwrap_or_default();
    tracing::debug!(
        status,
        %url,
        content_type = content_type.as_deref().unwrap_or(""),
        %body,
        "request failed"
    );

    Err(Error::Api(ApiError {
        status,
        details: decode_error_details(content_type.as_deref(), &body),
    }))
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text()?;
    Ok(serde_json::from_str(&text)?)
}
