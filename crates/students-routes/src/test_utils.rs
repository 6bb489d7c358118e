//! Test utilities for router tests

use crate::registry::SchemaRegistry;
use crate::router::Router;
use crate::template::ResourceTemplate;
use std::sync::Arc;
use students_query::ResourceAddress;

pub const AUTHORITY: &str = "com.example.lenovo.students_contenproviderfoundation";
pub const TABLE: &str = "student";
pub const ID_COLUMN: &str = "num_control";

/// Router over the two students templates: `students` and `students/*`
pub fn students_router() -> Router {
    let registry = SchemaRegistry::with_templates([
        ResourceTemplate::collection(AUTHORITY, "students", TABLE, ID_COLUMN),
        ResourceTemplate::item(AUTHORITY, "students/*", TABLE, ID_COLUMN),
    ])
    .expect("students templates are valid");

    Router::new(Arc::new(registry))
}

pub fn address(segments: &[&str]) -> ResourceAddress {
    ResourceAddress::from_slice(AUTHORITY, segments)
}
