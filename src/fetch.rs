//! HTTP fetch layer for GBFS documents.
//!
//! One GET per call, no retry, no auth. The [`HttpClient`] trait is the
//! seam tests use to observe requests; production code goes through
//! [`BasicClient`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

/// Plain `reqwest` client with a configurable per-request timeout.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

/// Fetches `url` with a single GET and parses the response body as JSON.
///
/// Only HTTP 200 counts as success; any other status is a
/// [`FetchError::Status`]. A 200 response whose body is not valid JSON is
/// a [`FetchError::Parse`], so the two failure modes stay distinguishable
/// in the logs.
pub async fn fetch_json<C: HttpClient>(client: &C, url: &str) -> Result<Value, FetchError> {
    let parsed = url.parse().map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = resp.text().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;

    serde_json::from_str(&body).map_err(|source| FetchError::Parse {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client() -> BasicClient {
        BasicClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_json_ok() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gbfs.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"data": {"en": {"feeds": []}}}"#);
        });

        let value = fetch_json(&client(), &server.url("/gbfs.json")).await.unwrap();
        assert!(value.get("data").is_some());
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gbfs.json");
            then.status(404);
        });

        let err = fetch_json(&client(), &server.url("/gbfs.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. }
            if status == reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_200_with_non_json_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gbfs.json");
            then.status(200).body("<html>definitely not json</html>");
        });

        let err = fetch_json(&client(), &server.url("/gbfs.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_any_request() {
        let err = fetch_json(&client(), "not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
