//! Resource templates and segment matching
//!
//! A template pattern is a `/`-separated list of segments:
//! - `students` matches the literal segment `students` only
//! - `#` matches any single segment made of ASCII digits
//! - `*` matches any single segment
//!
//! Matching is structural: the address must have exactly as many segments as
//! the pattern, so `students/#` never matches `students` or `students/1/x`.

use serde::{Deserialize, Serialize};
use std::fmt;
use students_query::ResourceAddress;

/// Classification of an address
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Every row of a table
    Collection,
    /// One row, selected by its identity column
    SingleItem,
    /// No registered template matched
    Unmatched,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Collection => write!(f, "collection"),
            ResourceKind::SingleItem => write!(f, "single-item"),
            ResourceKind::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// One segment of a template pattern
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    Literal(String),
    /// `#`
    Number,
    /// `*`
    Text,
}

impl PathSegment {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "#" => PathSegment::Number,
            "*" => PathSegment::Text,
            literal => PathSegment::Literal(literal.to_string()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self, PathSegment::Literal(_))
    }

    pub fn matches(&self, segment: &str) -> bool {
        match self {
            PathSegment::Literal(literal) => literal == segment,
            PathSegment::Number => !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()),
            PathSegment::Text => true,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Literal(literal) => write!(f, "{}", literal),
            PathSegment::Number => write!(f, "#"),
            PathSegment::Text => write!(f, "*"),
        }
    }
}

/// Static binding of an address pattern to a table
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResourceTemplate {
    authority: String,
    pattern: Vec<PathSegment>,
    kind: ResourceKind,
    table_name: String,
    identity_column: String,
}

impl ResourceTemplate {
    /// Template addressing a whole table
    pub fn collection(
        authority: impl Into<String>,
        pattern: &str,
        table_name: impl Into<String>,
        identity_column: impl Into<String>,
    ) -> Self {
        Self::build(
            ResourceKind::Collection,
            authority,
            pattern,
            table_name,
            identity_column,
        )
    }

    /// Template addressing one row; the last wildcard captures the identifier
    pub fn item(
        authority: impl Into<String>,
        pattern: &str,
        table_name: impl Into<String>,
        identity_column: impl Into<String>,
    ) -> Self {
        Self::build(
            ResourceKind::SingleItem,
            authority,
            pattern,
            table_name,
            identity_column,
        )
    }

    fn build(
        kind: ResourceKind,
        authority: impl Into<String>,
        pattern: &str,
        table_name: impl Into<String>,
        identity_column: impl Into<String>,
    ) -> Self {
        Self {
            authority: authority.into(),
            pattern: pattern
                .split('/')
                .filter(|s| !s.is_empty())
                .map(PathSegment::parse)
                .collect(),
            kind,
            table_name: table_name.into(),
            identity_column: identity_column.into(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn pattern(&self) -> &[PathSegment] {
        &self.pattern
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn identity_column(&self) -> &str {
        &self.identity_column
    }

    pub fn has_wildcard(&self) -> bool {
        self.pattern.iter().any(PathSegment::is_wildcard)
    }

    /// Pattern rendered back as `seg/seg`
    pub fn pattern_string(&self) -> String {
        self.pattern
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Match an address against this template
    ///
    /// # Returns
    /// The values captured by wildcard segments, in order, or `None` when the
    /// authority, segment count, or any segment differs.
    pub fn capture<'a>(&self, address: &'a ResourceAddress) -> Option<Vec<&'a str>> {
        if address.authority() != self.authority {
            return None;
        }

        if address.depth() != self.pattern.len() {
            return None;
        }

        let mut captured = Vec::new();
        for (expected, actual) in self.pattern.iter().zip(address.segments()) {
            if !expected.matches(actual) {
                return None;
            }
            if expected.is_wildcard() {
                captured.push(actual.as_str());
            }
        }

        Some(captured)
    }
}

impl fmt::Display for ResourceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} -> {} ({})",
            self.authority,
            self.pattern_string(),
            self.table_name,
            self.kind
        )
    }
}
