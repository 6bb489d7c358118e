use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// URI scheme used by every resource address
pub const CONTENT_SCHEME: &str = "content";

/// Address of a resource: an authority plus an ordered list of path segments
///
/// Rendered as `content://<authority>/<segment>/<segment>`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ResourceAddress {
    authority: String,
    segments: Vec<String>,
}

impl ResourceAddress {
    pub fn new(authority: impl Into<String>, segments: Vec<String>) -> Self {
        Self {
            authority: authority.into(),
            segments,
        }
    }

    pub fn from_slice(authority: impl Into<String>, segments: &[&str]) -> Self {
        Self {
            authority: authority.into(),
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Address of the bare namespace root (no path segments)
    pub fn root(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            segments: Vec::new(),
        }
    }

    /// Parse a `content://` URI
    ///
    /// Empty path segments (including a trailing slash) are dropped and each
    /// segment is percent-decoded. The authority must be a bare name: userinfo
    /// and ports are rejected, as are query strings, fragments and `.`/`..`
    /// segments.
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |reason: &str| ProviderError::invalid_address(format!("{}: {}", uri, reason));

        let url = url::Url::parse(uri)
            .map_err(|e| ProviderError::invalid_address(format!("{}: {}", uri, e)))?;

        if url.scheme() != CONTENT_SCHEME {
            return Err(invalid(&format!(
                "expected scheme '{}', got '{}'",
                CONTENT_SCHEME,
                url.scheme()
            )));
        }

        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid("userinfo is not allowed in the authority"));
        }
        if url.port().is_some() {
            return Err(invalid("port is not allowed in the authority"));
        }
        if url.query().is_some() {
            return Err(invalid("query strings are not supported"));
        }
        if url.fragment().is_some() {
            return Err(invalid("fragments are not supported"));
        }

        let authority = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(invalid("missing authority")),
        };

        // The url crate folds `.` and `..` away, so check the path as written
        for raw in raw_path(uri).split('/').filter(|s| !s.is_empty()) {
            if is_dot_segment(raw) {
                return Err(invalid(&format!("dot segment '{}' is not allowed", raw)));
            }
        }

        let mut segments = Vec::new();
        if let Some(raw_segments) = url.path_segments() {
            for raw in raw_segments.filter(|s| !s.is_empty()) {
                let decoded = urlencoding::decode(raw)
                    .map_err(|e| invalid(&format!("bad segment '{}': {}", raw, e)))?;
                segments.push(decoded.into_owned());
            }
        }

        Ok(Self {
            authority,
            segments,
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Return a copy of this address with one more segment appended
    pub fn with_segment(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self {
            authority: self.authority.clone(),
            segments,
        }
    }

    /// True if `other` lives at or below this address
    pub fn contains(&self, other: &ResourceAddress) -> bool {
        self.authority == other.authority && other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", CONTENT_SCHEME, self.authority)?;
        for segment in &self.segments {
            write!(f, "/{}", urlencoding::encode(segment))?;
        }
        Ok(())
    }
}

impl FromStr for ResourceAddress {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Path of a URI exactly as written, without query or fragment
fn raw_path(uri: &str) -> &str {
    let rest = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    let path = rest.find('/').map(|idx| &rest[idx..]).unwrap_or("");
    let end = path.find(|c: char| c == '?' || c == '#').unwrap_or(path.len());
    &path[..end]
}

fn is_dot_segment(raw: &str) -> bool {
    let lowered = raw.to_ascii_lowercase().replace("%2e", ".");
    lowered == "." || lowered == ".."
}

/// Caller-supplied query parameters
///
/// Every field is optional: no projection selects all columns, no filter selects
/// all rows, no sort order leaves ordering to the store.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Columns to return, in order
    pub projection: Option<Vec<String>>,
    /// Filter with positional `?` placeholders
    pub filter_predicate: Option<String>,
    /// Values substituted for the placeholders, in order
    pub filter_arguments: Option<Vec<String>>,
    /// Ordering clause handed to the store as-is
    pub sort_order: Option<String>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filter<I, S>(mut self, predicate: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_predicate = Some(predicate.into());
        self.filter_arguments = Some(arguments.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filter_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.filter_predicate = Some(predicate.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = Some(sort_order.into());
        self
    }
}

/// Fully resolved, storage-ready query
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub table_name: String,
    pub projection: Option<Vec<String>>,
    pub filter_predicate: Option<String>,
    pub filter_arguments: Option<Vec<String>>,
    pub sort_order: Option<String>,
}

impl QueryDescriptor {
    /// Descriptor selecting every row and column of a table
    pub fn table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            projection: None,
            filter_predicate: None,
            filter_arguments: None,
            sort_order: None,
        }
    }

    /// Arguments as a slice, empty when none were given
    pub fn arguments(&self) -> &[String] {
        self.filter_arguments.as_deref().unwrap_or(&[])
    }
}

/// A row of data as column -> value pairs
pub type DataRow = HashMap<String, serde_json::Value>;

/// Statistics about query execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryStats {
    /// Number of rows returned
    pub row_count: usize,
    /// Query execution time in milliseconds
    pub execution_ms: u64,
}

/// Result of executing a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Rows of data, in the order the store produced them
    pub rows: Vec<DataRow>,
    /// Execution statistics
    pub stats: QueryStats,
    /// Address observers should watch for changes to these rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_address: Option<ResourceAddress>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<DataRow>, execution_ms: u64) -> Self {
        let row_count = rows.len();

        Self {
            columns,
            rows,
            stats: QueryStats {
                row_count,
                execution_ms,
            },
            notification_address: None,
        }
    }

    pub fn with_notification_address(mut self, address: ResourceAddress) -> Self {
        self.notification_address = Some(address);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
