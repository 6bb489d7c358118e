//! Resource schema registry
//!
//! Holds the ordered set of [`ResourceTemplate`]s the router evaluates. The set
//! is published as an immutable snapshot: readers load it without locking,
//! and registration builds a new snapshot under a writer mutex and swaps it in.

use crate::template::{ResourceKind, ResourceTemplate};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;
use students_query::{ProviderError, Result};
use tracing::{debug, warn};

/// Immutable view of the registered templates, in registration order
pub type TemplateSnapshot = Arc<Vec<Arc<ResourceTemplate>>>;

/// Ordered registry of resource templates
pub struct SchemaRegistry {
    templates: ArcSwap<Vec<Arc<ResourceTemplate>>>,
    /// Serializes writers; readers never take it
    write_lock: Mutex<()>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            templates: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Build a registry from templates, registered in iteration order
    pub fn with_templates<I>(templates: I) -> Result<Self>
    where
        I: IntoIterator<Item = ResourceTemplate>,
    {
        let registry = Self::new();
        for template in templates {
            registry.register(template)?;
        }
        Ok(registry)
    }

    /// Append a template
    ///
    /// Templates are evaluated in registration order, so a template whose
    /// pattern duplicates an earlier one can never match.
    pub fn register(&self, template: ResourceTemplate) -> Result<()> {
        match template.kind() {
            ResourceKind::Unmatched => {
                return Err(ProviderError::invalid_configuration(format!(
                    "template {} cannot have kind unmatched",
                    template
                )));
            }
            ResourceKind::SingleItem if !template.has_wildcard() => {
                return Err(ProviderError::invalid_configuration(format!(
                    "item template {} has no wildcard segment to capture an identifier",
                    template
                )));
            }
            _ => {}
        }

        if template.table_name().is_empty() || template.identity_column().is_empty() {
            return Err(ProviderError::invalid_configuration(format!(
                "template {} needs a table name and identity column",
                template
            )));
        }

        let _guard = self.write_lock.lock();
        let current = self.templates.load_full();

        if current.iter().any(|existing| {
            existing.authority() == template.authority() && existing.pattern() == template.pattern()
        }) {
            warn!("Template {} is shadowed by an earlier registration", template);
        }

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        debug!("Registered template #{}: {}", next.len(), template);
        next.push(Arc::new(template));

        self.templates.store(Arc::new(next));
        Ok(())
    }

    /// Current snapshot of the templates
    pub fn templates(&self) -> TemplateSnapshot {
        self.templates.load_full()
    }

    pub fn len(&self) -> usize {
        self.templates.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.load().is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
