//! Comparison of a page's observed tags against its baseline row.

use crate::baseline::AuditRecord;
use crate::config::AbsentTag;
use crate::parsers::ExtractedTags;
use crate::parsers::robots::DirectiveSet;
use crate::results::{ComparisonResult, RobotsDiff, TagDiff};

/// Stand-in for a missing robots/canonical tag under [`AbsentTag::LegacySentinel`]
pub const ABSENT_SENTINEL: &str = "undefined";

/// Compares expected tag values against observed ones
#[derive(Debug, Clone, Copy, Default)]
pub struct TagComparator {
    absent_tag: AbsentTag,
}

impl TagComparator {
    pub fn new(absent_tag: AbsentTag) -> Self {
        Self { absent_tag }
    }

    /// Builds the comparison result for one record. `timestamp` is the
    /// already-localized audit time.
    pub fn compare(
        &self,
        record: &AuditRecord,
        observed: &ExtractedTags,
        timestamp: String,
    ) -> ComparisonResult {
        let robots = self.observed_value(observed.robots.as_deref());
        let canonical = self.observed_value(observed.canonical.as_deref());

        ComparisonResult {
            url: record.url.clone(),
            robots: compare_robots(&record.expected_robots, robots),
            canonical: compare_canonical(&record.expected_canonical, canonical),
            h1: compare_h1(record.expected_h1.as_deref(), &observed.h1),
            title: observed.title.clone(),
            timestamp,
        }
    }

    fn observed_value<'a>(&self, value: Option<&'a str>) -> &'a str {
        match (value, self.absent_tag) {
            (Some(value), _) => value,
            (None, AbsentTag::LegacySentinel) => ABSENT_SENTINEL,
            (None, AbsentTag::Empty) => "",
        }
    }
}

/// Token-set diff of robots directives; order and repetition are ignored
pub fn compare_robots(expected: &str, observed: &str) -> RobotsDiff {
    let expected = DirectiveSet::parse(expected);
    let observed = DirectiveSet::parse(observed);

    RobotsDiff {
        missing: expected.difference(&observed),
        extra: observed.difference(&expected),
    }
}

/// Trimmed equality; a mismatch reports the value found on the page
pub fn compare_canonical(expected: &str, observed: &str) -> TagDiff {
    if expected.trim() == observed.trim() {
        TagDiff::default()
    } else {
        TagDiff {
            missing: vec![observed.to_string()],
        }
    }
}

/// Flags the expected heading when some h1 contains it, ignoring case.
///
/// The polarity reads backwards but is what the legacy audit reported;
/// awaiting product confirmation before it is flipped.
pub fn compare_h1(expected: Option<&str>, observed: &[String]) -> TagDiff {
    let Some(expected) = expected.map(str::trim).filter(|e| !e.is_empty()) else {
        return TagDiff::default();
    };

    let needle = expected.to_lowercase();
    if observed.iter().any(|h1| h1.to_lowercase().contains(&needle)) {
        TagDiff {
            missing: vec![expected.to_string()],
        }
    } else {
        TagDiff::default()
    }
}
