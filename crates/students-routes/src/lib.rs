//! Resource address routing and query translation
//!
//! - [`SchemaRegistry`]: ordered, snapshot-swapped set of [`ResourceTemplate`]s
//! - [`Router`]: classifies addresses into a [`MatchResult`]
//! - [`translate`]: builds the [`students_query::QueryDescriptor`] for a match

pub mod registry;
pub mod router;
pub mod template;
pub mod translator;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod router_test;

pub use registry::*;
pub use router::*;
pub use template::*;
pub use translator::*;
