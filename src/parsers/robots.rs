use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static COMMA_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*").unwrap());
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s,]+").unwrap());

/// Unordered, deduplicated set of robots directives.
///
/// Iteration follows first appearance in the source string, so diffs come
/// out in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveSet {
    tokens: Vec<String>,
}

impl DirectiveSet {
    /// Tokenizes a robots directive string.
    ///
    /// Lower-cases, collapses whitespace runs, folds `", "` into `","`, then
    /// splits on whitespace or commas, dropping empty tokens.
    pub fn parse(directive: &str) -> Self {
        let lowered = directive.to_lowercase();
        let collapsed = WHITESPACE_RUN.replace_all(lowered.trim(), " ");
        let folded = COMMA_SPACE.replace_all(&collapsed, ",");

        let mut tokens: Vec<String> = Vec::new();
        for token in SEPARATOR.split(&folded).filter(|t| !t.is_empty()) {
            if !tokens.iter().any(|seen| seen == token) {
                tokens.push(token.to_string());
            }
        }
        Self { tokens }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens of `self` that `other` lacks, in `self`'s order
    pub fn difference(&self, other: &DirectiveSet) -> Vec<String> {
        self.iter()
            .filter(|token| !other.contains(token))
            .map(str::to_string)
            .collect()
    }
}
