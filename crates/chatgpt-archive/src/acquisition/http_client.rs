//! HTTP client for stylesheet downloads, wrapping reqwest.
//!
//! Not a browser, just plain GETs. No retry: a sheet that cannot be
//! fetched aborts the run.

use crate::error::{ArchiveError, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Something that can return the text of a stylesheet URL.
#[async_trait]
pub trait StylesheetSource: Send + Sync {
    /// Fetch the body of `url` as text, verbatim.
    async fn fetch_stylesheet(&self, url: &Url) -> Result<String>;
}

/// HTTP client for the inlining pass.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with standard Chrome user-agent.
    pub fn new(timeout: Duration) -> Self {
        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                  AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/131.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// Single GET; transport errors, timeouts, and non-2xx statuses all fail.
    ///
    /// A 4xx/5xx response is an error even when it carries a body. The body
    /// of an error page is never returned, so it can never be inlined into
    /// the snapshot in place of the real stylesheet.
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        let fetch_err = |source| ArchiveError::StylesheetFetch {
            url: url.to_string(),
            source,
        };

        let resp = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(fetch_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ArchiveError::StylesheetStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(fetch_err)
    }
}

#[async_trait]
impl StylesheetSource for HttpClient {
    async fn fetch_stylesheet(&self, url: &Url) -> Result<String> {
        self.get_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url_of(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{p}", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_get_text_returns_body_verbatim() {
        let server = MockServer::start().await;
        let css = ".markdown{color:#0d0d0d}\n/* ünïcode */\n";
        Mock::given(method("GET"))
            .and(path("/cdn/root.css"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/css; charset=utf-8")
                    .set_body_string(css),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_secs(10));
        let body = client
            .fetch_stylesheet(&url_of(&server, "/cdn/root.css"))
            .await
            .unwrap();
        assert_eq!(body, css);
    }

    #[tokio::test]
    async fn test_get_text_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_secs(10));
        let err = client
            .get_text(&url_of(&server, "/missing.css"))
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::StylesheetStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_get_text_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("body{}")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_millis(50));
        let err = client
            .get_text(&url_of(&server, "/slow.css"))
            .await
            .unwrap_err();
        match err {
            ArchiveError::StylesheetFetch { source, .. } => assert!(source.is_timeout()),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
