use crate::error::{AuditError, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

/// Columns every baseline must carry, matched case-insensitively
pub const REQUIRED_HEADERS: [&str; 5] = ["URL", "Title", "Canonical", "robots", "h1"];

/// One row of the baseline: the tag values a page is expected to carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub url: String,
    pub expected_title: String,
    pub expected_canonical: String,
    pub expected_robots: String,
    pub expected_h1: Option<String>,
}

impl AuditRecord {
    /// Records without a URL are dropped before any page is fetched
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    url: usize,
    title: usize,
    canonical: usize,
    robots: usize,
    h1: usize,
}

impl ColumnMap {
    /// Locates each required column, or names every one that is absent
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let position = |name: &str| lowered.iter().position(|h| *h == name.to_lowercase());

        let missing: Vec<String> = REQUIRED_HEADERS
            .iter()
            .filter(|&&name| position(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AuditError::Validation { missing });
        }

        // every lookup below succeeded in the check above
        let index = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            url: index("URL"),
            title: index("Title"),
            canonical: index("Canonical"),
            robots: index("robots"),
            h1: index("h1"),
        })
    }

    fn record(&self, row: &StringRecord) -> AuditRecord {
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        let h1 = field(self.h1);

        AuditRecord {
            url: field(self.url),
            expected_title: field(self.title),
            expected_canonical: field(self.canonical),
            expected_robots: field(self.robots),
            expected_h1: if h1.is_empty() { None } else { Some(h1) },
        }
    }
}

/// Parses a delimited baseline table into records.
///
/// The first row is the header. Column presence is checked once against it;
/// extra columns are ignored and a table with no data rows yields no records.
/// Values are kept as written, trimming happens at comparison time. Cells
/// that are not valid UTF-8 fail the parse rather than being replaced.
pub fn parse(raw_table: &[u8]) -> Result<Vec<AuditRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw_table);

    let columns = ColumnMap::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for row in reader.records() {
        records.push(columns.record(&row?));
    }

    ::log::debug!("Parsed {} baseline rows", records.len());
    Ok(records)
}
