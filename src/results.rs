use serde::{Deserialize, Serialize};

/// Robots directive diff between expected and observed token sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsDiff {
    /// Expected directives the page lacks
    pub missing: Vec<String>,
    /// Directives the page carries that were not expected
    pub extra: Vec<String>,
}

impl RobotsDiff {
    pub fn is_match(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Single-valued tag diff; `missing` is empty when the tag matched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDiff {
    pub missing: Vec<String>,
}

impl TagDiff {
    pub fn is_match(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Outcome of comparing one page against its baseline row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub url: String,
    pub robots: RobotsDiff,
    /// Holds the observed canonical href when it differs from the expected one
    pub canonical: TagDiff,
    /// Holds the expected heading when some h1 contains it
    pub h1: TagDiff,
    /// Title found on the page; reported, never compared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Localized audit time
    pub timestamp: String,
}

impl ComparisonResult {
    pub fn is_match(&self) -> bool {
        self.robots.is_match() && self.canonical.is_match() && self.h1.is_match()
    }
}

/// Per-record status in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditEntry {
    Compared(ComparisonResult),
    Failed { url: String, error: String },
}

impl AuditEntry {
    pub fn failed(url: &str, error: impl std::fmt::Display) -> Self {
        AuditEntry::Failed {
            url: url.to_string(),
            error: error.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            AuditEntry::Compared(result) => &result.url,
            AuditEntry::Failed { url, .. } => url,
        }
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        match self {
            AuditEntry::Compared(result) => Some(result),
            AuditEntry::Failed { .. } => None,
        }
    }
}

/// Batch-level counts over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub failed: usize,
}

/// Final output of one audit run, in baseline order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub entries: Vec<AuditEntry>,
    pub summary: BatchSummary,
}

impl AuditReport {
    pub fn new(entries: Vec<AuditEntry>) -> Self {
        let mut summary = BatchSummary {
            total: entries.len(),
            ..BatchSummary::default()
        };
        for entry in &entries {
            match entry.result() {
                Some(result) if result.is_match() => summary.matched += 1,
                Some(_) => summary.mismatched += 1,
                None => summary.failed += 1,
            }
        }
        Self { entries, summary }
    }

    /// Successful comparisons, in baseline order
    pub fn results(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.entries.iter().filter_map(AuditEntry::result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str, robots_missing: &[&str]) -> ComparisonResult {
        ComparisonResult {
            url: url.to_string(),
            robots: RobotsDiff {
                missing: robots_missing.iter().map(|s| s.to_string()).collect(),
                extra: Vec::new(),
            },
            canonical: TagDiff::default(),
            h1: TagDiff::default(),
            title: None,
            timestamp: "1/1/2026, 7:00:00 AM".to_string(),
        }
    }

    #[test]
    fn test_summary_counts_each_outcome() {
        let report = AuditReport::new(vec![
            AuditEntry::Compared(result("https://a.test", &[])),
            AuditEntry::Compared(result("https://b.test", &["noindex"])),
            AuditEntry::failed("https://c.test", "HTTP 500"),
        ]);
        assert_eq!(
            report.summary,
            BatchSummary {
                total: 3,
                matched: 1,
                mismatched: 1,
                failed: 1,
            }
        );
        assert_eq!(
            report.results().map(|r| r.url.as_str()).collect::<Vec<_>>(),
            vec!["https://a.test", "https://b.test"]
        );
    }

    #[test]
    fn test_entries_serialize_with_status_tag() {
        let entry = AuditEntry::failed("https://c.test", "timeout");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["url"], "https://c.test");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "timeout");
    }
}
