use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Semaphore;

/// What to do when one page of the batch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any failure aborts the run and discards every result
    #[default]
    FailFast,
    /// Every record is reported with its own status
    Partial,
}

/// How an absent robots meta tag or canonical link is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentTag {
    /// Compare as the literal string "undefined", like the legacy audit did
    #[default]
    LegacySentinel,
    /// Compare as an empty string
    Empty,
}

/// Configuration for an audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Per-request timeout for page fetches
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum redirects followed per page
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Maximum number of pages fetched at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Deadline for the whole run; the run is cancelled once it passes
    #[serde(default)]
    pub run_timeout_secs: Option<u64>,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    #[serde(default)]
    pub absent_tag: AbsentTag,

    /// Offset of the zone report timestamps are rendered in
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Slack-compatible incoming webhook; notifications are off when unset
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Baseline used by the default-source trigger
    #[serde(default)]
    pub default_baseline_path: Option<PathBuf>,

    /// Render pages through this WebDriver server instead of plain HTTP
    #[serde(default)]
    pub webdriver_url: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_concurrency() -> usize {
    16
}

/// Asia/Bangkok
fn default_utc_offset_hours() -> i32 {
    7
}

fn default_user_agent() -> String {
    format!("seo-audit/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            max_redirects: default_max_redirects(),
            max_concurrency: default_max_concurrency(),
            run_timeout_secs: None,
            failure_policy: FailurePolicy::default(),
            absent_tag: AbsentTag::default(),
            utc_offset_hours: default_utc_offset_hours(),
            webhook_url: None,
            default_baseline_path: None,
            webdriver_url: None,
            user_agent: default_user_agent(),
        }
    }
}

impl AuditConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from the environment where the variables are set and non-empty
    pub fn apply_env(mut self) -> Self {
        if let Some(url) = non_empty_env("SLACK_WEBHOOK_URL") {
            self.webhook_url = Some(url);
        }
        if let Some(path) = non_empty_env("SEO_AUDIT_BASELINE") {
            self.default_baseline_path = Some(PathBuf::from(path));
        }
        if let Some(url) = non_empty_env("WEBDRIVER_URL") {
            self.webdriver_url = Some(url);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(AuditConfig::invalid("max_concurrency must be at least 1"));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(AuditConfig::invalid(&format!(
                "max_concurrency must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(AuditConfig::invalid(
                "request_timeout_secs must be at least 1",
            ));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(AuditConfig::invalid(
                "utc_offset_hours must be between -12 and 14",
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }

    /// Webhook target, treating an empty string as unset
    pub fn webhook(&self) -> Option<&str> {
        self.webhook_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    fn invalid(message: &str) -> AuditError {
        AuditError::Config(message.to_string())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_http_settings() {
        let config = AuditConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.absent_tag, AbsentTag::LegacySentinel);
        assert_eq!(config.utc_offset_hours, 7);
        assert!(config.webhook().is_none());
        assert!(config.run_timeout().is_none());
    }

    #[test]
    fn test_from_json_fills_missing_fields_with_defaults() {
        let config = AuditConfig::from_json(
            r#"{"max_concurrency": 3, "failure_policy": "partial", "absent_tag": "empty"}"#,
        )
        .unwrap();
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.failure_policy, FailurePolicy::Partial);
        assert_eq!(config.absent_tag, AbsentTag::Empty);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let err = AuditConfig::from_json(r#"{"max_concurrency": 0}"#).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn test_concurrency_above_semaphore_limit_is_rejected() {
        let config = AuditConfig {
            max_concurrency: Semaphore::MAX_PERMITS + 1,
            ..AuditConfig::default()
        };
        assert!(matches!(config.validate(), Err(AuditError::Config(_))));

        let config = AuditConfig {
            max_concurrency: Semaphore::MAX_PERMITS,
            ..AuditConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_webhook_disables_notification() {
        let config = AuditConfig {
            webhook_url: Some("  ".to_string()),
            ..AuditConfig::default()
        };
        assert!(config.webhook().is_none());
    }

    #[test]
    fn test_from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.json");
        std::fs::write(&path, r#"{"webhook_url": "https://hooks.test/x"}"#).unwrap();

        let config = AuditConfig::from_file(&path).unwrap();
        assert_eq!(config.webhook(), Some("https://hooks.test/x"));
    }
}
