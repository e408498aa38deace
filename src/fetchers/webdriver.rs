use crate::error::{AuditError, Result};
use crate::fetchers::{FetchedPage, PageFetcher};
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::timeout;

/// Fetches rendered page source through a WebDriver server (e.g. ChromeDriver).
///
/// Each fetch opens its own session so concurrent fetches share nothing.
#[derive(Debug, Clone)]
pub struct WebDriverFetcher {
    webdriver_url: String,
    page_timeout: Duration,
}

impl WebDriverFetcher {
    pub fn new(webdriver_url: &str, page_timeout: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            page_timeout,
        }
    }

    async fn connect(&self, url: &str) -> Result<Client> {
        ClientBuilder::native()
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                AuditError::fetch(url, format!("WebDriver connection failed: {e}"))
            })
    }
}

impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let client = self.connect(url).await?;
        let start = std::time::Instant::now();

        let source = timeout(self.page_timeout, async {
            client.goto(url).await?;
            client.source().await
        })
        .await;

        // session is closed whatever the navigation outcome
        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session for {}: {}", url, e);
        }

        let html = match source {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => return Err(AuditError::fetch(url, e)),
            Err(_) => return Err(AuditError::fetch(url, "page load timed out")),
        };

        ::log::debug!(
            "Rendered {} in {:.2} seconds",
            url,
            start.elapsed().as_secs_f64()
        );

        Ok(FetchedPage::new(url, html))
    }
}
