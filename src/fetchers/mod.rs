pub mod http;
pub mod webdriver;

use crate::config::AuditConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::future::Future;

pub use http::HttpFetcher;
pub use webdriver::WebDriverFetcher;

/// Raw body of one fetched page. Consumed by the comparison, never retained.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    pub fn new(url: &str, html: String) -> Self {
        Self {
            url: url.to_string(),
            html,
            fetched_at: Utc::now(),
        }
    }
}

/// Source of page bodies for the audit engine.
///
/// Implementations are shared read-only across every concurrent fetch.
pub trait PageFetcher: Send + Sync {
    /// Fetches one page; any network, status, decode or timeout failure is
    /// an [`AuditError::Fetch`](crate::error::AuditError::Fetch) naming `url`
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage>> + Send;
}

/// Fetch backend selected by configuration
pub enum Fetcher {
    Http(HttpFetcher),
    WebDriver(WebDriverFetcher),
}

impl Fetcher {
    /// WebDriver rendering when a WebDriver URL is configured, plain HTTP otherwise
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        match config.webdriver_url.as_deref().filter(|url| !url.is_empty()) {
            Some(webdriver_url) => {
                ::log::info!("Rendering pages through WebDriver at {}", webdriver_url);
                Ok(Fetcher::WebDriver(WebDriverFetcher::new(
                    webdriver_url,
                    config.request_timeout(),
                )))
            }
            None => Ok(Fetcher::Http(HttpFetcher::new(config)?)),
        }
    }
}

impl PageFetcher for Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        match self {
            Fetcher::Http(fetcher) => fetcher.fetch(url).await,
            Fetcher::WebDriver(fetcher) => fetcher.fetch(url).await,
        }
    }
}
