pub mod html;
pub mod robots;


use serde::{Deserialize, Serialize};

/// Tag values observed on a fetched page.
///
/// `None` means the tag is absent from the document, which is kept distinct
/// from a tag that is present with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTags {
    /// `content` of the first `<meta name="robots">`
    pub robots: Option<String>,
    /// `href` of the first `<link rel="canonical">`
    pub canonical: Option<String>,
    /// Text of the first `<title>`, trimmed
    pub title: Option<String>,
    /// Text of every `<h1>` in document order, each trimmed
    pub h1: Vec<String>,
}

/// Parses HTML and extracts the audited tags
pub fn extract(html: &str) -> ExtractedTags {
    html::extract_tags(html)
}
