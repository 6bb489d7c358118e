//! # students-query
//!
//! Shared vocabulary for the students provider: resource addresses, query
//! requests and descriptors, result rows, and the seams to the outside world.
//!
//! ## Architecture
//!
//! - **ResourceAddress**: `content://<authority>/<segments>` addresses
//! - **QueryRequest**: caller-supplied projection, filter, and ordering
//! - **QueryDescriptor**: storage-ready query produced by the router crate
//! - **QueryExecutor**: storage collaborator that runs descriptors
//! - **ChangeNotifier**: optional change-notification capability
//!
//! ## Example
//!
//! ```rust
//! use students_query::{QueryRequest, ResourceAddress};
//!
//! # fn example() -> students_query::Result<()> {
//! let address = ResourceAddress::parse("content://com.example.school/students/147221")?;
//! assert_eq!(address.last_segment(), Some("147221"));
//!
//! let request = QueryRequest::new()
//!     .with_projection(["num_control", "nombre"])
//!     .with_sort_order("nombre ASC");
//! assert!(request.filter_predicate.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! Storage backends live in their own crates:
//! - `students-query-sqlite` - SQLite implementation

pub mod error;
pub mod notify;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{ProviderError, Result, RoutingErrorKind};
pub use notify::{BroadcastNotifier, NoopNotifier};
pub use traits::{ChangeNotifier, QueryExecutor};
pub use types::{
    DataRow, QueryDescriptor, QueryRequest, QueryResult, QueryStats, ResourceAddress,
    CONTENT_SCHEME,
};
