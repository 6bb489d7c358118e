//! Address router
//!
//! Classifies a [`ResourceAddress`] against the registry in a single pass over
//! the current snapshot. The first template that matches structurally wins.
//! An address that matches nothing yields [`ResourceKind::Unmatched`]; turning
//! that into an error is left to the caller (see [`Router::resolve`]).

use crate::registry::SchemaRegistry;
use crate::template::{ResourceKind, ResourceTemplate};
use crate::translator::translate;
use std::sync::Arc;
use students_query::{ProviderError, QueryDescriptor, QueryRequest, ResourceAddress, Result};
use tracing::debug;

/// Outcome of classifying one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub kind: ResourceKind,
    /// Final wildcard value for item addresses
    pub extracted_identifier: Option<String>,
    template: Option<Arc<ResourceTemplate>>,
}

impl MatchResult {
    pub fn unmatched() -> Self {
        Self {
            kind: ResourceKind::Unmatched,
            extracted_identifier: None,
            template: None,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        self.kind == ResourceKind::Unmatched
    }

    /// Template that produced this match
    pub fn template(&self) -> Option<&ResourceTemplate> {
        self.template.as_deref()
    }
}

/// Router over a shared schema registry
#[derive(Clone)]
pub struct Router {
    registry: Arc<SchemaRegistry>,
}

impl Router {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Classify an address
    pub fn match_address(&self, address: &ResourceAddress) -> MatchResult {
        let templates = self.registry.templates();

        for template in templates.iter() {
            let Some(captured) = template.capture(address) else {
                continue;
            };

            let extracted_identifier = match template.kind() {
                ResourceKind::SingleItem => captured.last().map(|s| s.to_string()),
                ResourceKind::Collection | ResourceKind::Unmatched => None,
            };

            debug!(
                "Matched {} to {} template {}",
                address,
                template.kind(),
                template.pattern_string()
            );

            return MatchResult {
                kind: template.kind(),
                extracted_identifier,
                template: Some(template.clone()),
            };
        }

        debug!("No template matched {}", address);
        MatchResult::unmatched()
    }

    /// Match an address and translate the request in one step
    ///
    /// Fails with an unmatched routing error naming the address.
    pub fn resolve(
        &self,
        address: &ResourceAddress,
        request: QueryRequest,
    ) -> Result<QueryDescriptor> {
        let matched = self.match_address(address);

        let Some(template) = matched.template() else {
            return Err(ProviderError::unmatched(Some(address.to_string())));
        };

        translate(&matched, template, request)
    }
}
