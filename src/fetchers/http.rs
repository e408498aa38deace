use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::fetchers::{FetchedPage, PageFetcher};
use reqwest::redirect::Policy;
use url::Url;

/// Plain HTTP fetcher sharing one client across every request
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds the shared client with the configured timeout, redirect limit and user agent
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AuditError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Only absolute http(s) URLs are fetched
fn parse_target(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| AuditError::fetch(url, format!("invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(AuditError::fetch(
            url,
            format!("unsupported URL scheme '{scheme}'"),
        )),
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let target = parse_target(url)?;
        let start = std::time::Instant::now();
        ::log::debug!("GET {}", target);

        let response = self.client.get(target).send().await.map_err(|e| {
            if e.is_timeout() {
                AuditError::fetch(url, "request timed out")
            } else {
                AuditError::fetch(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::fetch(
                url,
                format!("request failed with status {status}"),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AuditError::fetch(url, format!("failed to read body: {e}")))?;

        ::log::debug!(
            "Fetched {} ({} bytes) in {:.2} seconds",
            url,
            html.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(FetchedPage::new(url, html))
    }
}
