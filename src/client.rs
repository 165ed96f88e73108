use std::time::Duration;

use crate::config;
use crate::datasets::DatasetsClient;
use crate::error::Result;
use crate::http::{RetryPolicy, Transport};
use crate::users::UsersClient;
use crate::util::normalize_base_url;

/// Production endpoint, used when no base URL is given.
pub const AXIOM_URL: &str = "https://cloud.axiom.co";

/// The entry point for talking to Axiom.
///
/// Construction resolves credentials from explicit arguments first and
/// the process environment second (`AXIOM_TOKEN`, `AXIOM_ORG_ID`), then
/// bakes them into a reusable blocking HTTP session. The session is
/// immutable once built and can be shared freely across threads; per
/// call, only explicit arguments (e.g. an ingest content type) override
/// its defaults.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
}

impl Client {
    /// Creates a client configured entirely from the environment.
    ///
    /// Equivalent to `Client::new(None, None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `token` / `org_id` arguments
    /// - environment variables `AXIOM_TOKEN` / `AXIOM_ORG_ID`
    ///
    /// `url_base` defaults to [`AXIOM_URL`]; either way the versioned
    /// API path is appended to it, exactly once.
    pub fn new(
        token: Option<String>,
        org_id: Option<String>,
        url_base: Option<String>,
    ) -> Result<Self> {
        let credentials = config::resolve(token, org_id)?;
        let base_url = normalize_base_url(url_base.as_deref().unwrap_or(AXIOM_URL));
        let transport = Transport::new(
            base_url,
            &credentials.token,
            credentials.org_id.as_deref(),
        )?;
        Ok(Self { transport })
    }

    /// Replaces the default retry policy (3 attempts, backoff factor 2,
    /// statuses 500/502/503/504).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.transport = self.transport.with_retry_policy(retry);
        self
    }

    /// Replaces the default 60 s request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.transport = self.transport.with_timeout(timeout)?;
        Ok(self)
    }

    /// Effective request root, e.g. `https://cloud.axiom.co/api/v1/`.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn datasets(&self) -> DatasetsClient {
        DatasetsClient::new(self.transport.clone())
    }

    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.transport.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn base_url_is_normalized_with_and_without_trailing_slash() {
        let client = Client::new(
            Some("xaat-token".into()),
            None,
            Some("https://x".into()),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://x/api/v1/");

        let client = Client::new(
            Some("xaat-token".into()),
            None,
            Some("https://x/".into()),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://x/api/v1/");
    }

    #[test]
    fn default_base_url_is_production() {
        let client = Client::new(Some("xaat-token".into()), None, None).unwrap();
        assert_eq!(client.base_url(), "https://cloud.axiom.co/api/v1/");
    }

    #[test]
    fn resource_clients_share_the_session() {
        let server = MockServer::start();
        let datasets_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/datasets")
                .header("authorization", "Bearer xaat-token")
                .header("x-axiom-org-id", "acme");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([]));
        });
        let user_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/user")
                .header("authorization", "Bearer xaat-token")
                .header("x-axiom-org-id", "acme");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"id": "u1", "name": "Test User"}));
        });

        let client = Client::new(
            Some("xaat-token".into()),
            Some("acme".into()),
            Some(server.base_url()),
        )
        .unwrap();

        client.datasets().list().unwrap();
        client.users().current().unwrap();

        datasets_mock.assert();
        user_mock.assert();
    }
}
