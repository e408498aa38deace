use clap::Parser;
use seo_audit::{AuditConfig, FailurePolicy};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seo-audit")]
#[command(about = "Audits live pages against an expected SEO baseline")]
#[command(version)]
pub struct Args {
    /// Baseline CSV with URL, Title, Canonical, robots and h1 columns
    #[arg(required_unless_present = "default_source")]
    pub baseline: Option<PathBuf>,

    /// Audit the configured default baseline instead of a file argument
    #[arg(long, conflicts_with = "baseline")]
    pub default_source: bool,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of pages fetched concurrently
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Deadline for the whole run in seconds
    #[arg(long)]
    pub run_timeout: Option<u64>,

    /// Report failed pages individually instead of failing the run
    #[arg(long)]
    pub partial: bool,

    /// Render pages through a WebDriver server at this URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Layers command-line overrides on top of a loaded configuration
    pub fn apply(&self, mut config: AuditConfig) -> AuditConfig {
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if self.run_timeout.is_some() {
            config.run_timeout_secs = self.run_timeout;
        }
        if self.partial {
            config.failure_policy = FailurePolicy::Partial;
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = Some(url.clone());
        }
        config
    }
}
