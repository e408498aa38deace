use crate::error::AuditError;
use crate::results::{AuditEntry, AuditReport, ComparisonResult};
use std::fmt::Write;

const MATCH: &str = "✅ Match";

/// Renders reports and failures into the text handed to the notification channel
pub struct ReportFormatter;

impl ReportFormatter {
    /// Renders a report as Slack-flavoured plain text
    pub fn format_report(report: &AuditReport) -> String {
        let mut message = String::from("*SEO audit results*\n\n");

        for entry in &report.entries {
            let _ = writeln!(message, "*URL*: {}", entry.url());
            match entry {
                AuditEntry::Compared(result) => write_result(&mut message, result),
                AuditEntry::Failed { error, .. } => {
                    let _ = writeln!(message, "- *Error*: ❌ {error}");
                }
            }
            message.push('\n');
        }

        let summary = report.summary;
        let _ = write!(
            message,
            "*Summary*: {} pages, {} matched, {} mismatched, {} failed",
            summary.total, summary.matched, summary.mismatched, summary.failed
        );
        message
    }

    /// Renders the notification sent when a run fails
    pub fn format_error(error: &AuditError) -> String {
        format!("Failed to process baseline: {error}")
    }
}

fn write_result(message: &mut String, result: &ComparisonResult) {
    let robots = if result.robots.is_match() {
        MATCH.to_string()
    } else {
        format!(
            "❌ Mismatch (missing: {}, extra: {})",
            list(&result.robots.missing),
            list(&result.robots.extra)
        )
    };
    let canonical = if result.canonical.is_match() {
        MATCH.to_string()
    } else {
        format!("❌ Mismatch (found: {})", list(&result.canonical.missing))
    };
    let h1 = if result.h1.is_match() {
        MATCH.to_string()
    } else {
        format!("❌ Mismatch (missing: {})", list(&result.h1.missing))
    };

    let _ = writeln!(message, "- *Robots*: {robots}");
    let _ = writeln!(message, "- *Canonical*: {canonical}");
    let _ = writeln!(message, "- *H1*: {h1}");
    let _ = writeln!(message, "- *Time*: {}", result.timestamp);
}

fn list(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{RobotsDiff, TagDiff};

    fn mismatched() -> ComparisonResult {
        ComparisonResult {
            url: "https://ex.com".to_string(),
            robots: RobotsDiff {
                missing: vec!["noindex".to_string()],
                extra: Vec::new(),
            },
            canonical: TagDiff {
                missing: vec!["https://ex.com/other".to_string()],
            },
            h1: TagDiff::default(),
            title: None,
            timestamp: "10/16/2026, 3:04:05 PM".to_string(),
        }
    }

    #[test]
    fn test_format_report_lists_each_tag() {
        let report = AuditReport::new(vec![AuditEntry::Compared(mismatched())]);
        let text = ReportFormatter::format_report(&report);

        assert!(text.starts_with("*SEO audit results*\n\n*URL*: https://ex.com\n"));
        assert!(text.contains("- *Robots*: ❌ Mismatch (missing: noindex, extra: none)\n"));
        assert!(text.contains("- *Canonical*: ❌ Mismatch (found: https://ex.com/other)\n"));
        assert!(text.contains("- *H1*: ✅ Match\n"));
        assert!(text.contains("- *Time*: 10/16/2026, 3:04:05 PM\n"));
        assert!(text.ends_with("*Summary*: 1 pages, 0 matched, 1 mismatched, 0 failed"));
    }

    #[test]
    fn test_format_report_shows_failed_entries() {
        let report = AuditReport::new(vec![AuditEntry::failed(
            "https://down.test",
            "request timed out",
        )]);
        let text = ReportFormatter::format_report(&report);
        assert!(text.contains("*URL*: https://down.test\n- *Error*: ❌ request timed out\n"));
    }

    #[test]
    fn test_format_error_wraps_message() {
        let err = AuditError::Validation {
            missing: vec!["URL".to_string()],
        };
        assert_eq!(
            ReportFormatter::format_error(&err),
            "Failed to process baseline: baseline is missing required columns: URL"
        );
    }
}
