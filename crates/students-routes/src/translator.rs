//! Query translator
//!
//! Turns a match plus a caller request into a [`QueryDescriptor`]. Item
//! addresses always filter on the identity column alone: any caller filter and
//! arguments are dropped. Collection addresses pass the caller's filter through
//! untouched, without checking placeholder counts; the store reports those.

use crate::router::MatchResult;
use crate::template::{ResourceKind, ResourceTemplate};
use students_query::{ProviderError, QueryDescriptor, QueryRequest, Result};
use tracing::debug;

/// Build the descriptor for a matched address
pub fn translate(
    matched: &MatchResult,
    template: &ResourceTemplate,
    request: QueryRequest,
) -> Result<QueryDescriptor> {
    let QueryRequest {
        projection,
        filter_predicate,
        filter_arguments,
        sort_order,
    } = request;

    let (filter_predicate, filter_arguments) = match matched.kind {
        ResourceKind::Unmatched => return Err(ProviderError::unmatched(None)),
        ResourceKind::SingleItem => {
            let identifier = matched.extracted_identifier.clone().ok_or_else(|| {
                ProviderError::Internal(format!(
                    "item match on {} carried no identifier",
                    template.pattern_string()
                ))
            })?;

            if filter_predicate.is_some() || filter_arguments.is_some() {
                debug!(
                    "Discarding caller filter for item lookup on {}",
                    template.table_name()
                );
            }

            (
                Some(identity_clause(template.identity_column())),
                Some(vec![identifier]),
            )
        }
        ResourceKind::Collection => (filter_predicate, filter_arguments),
    };

    Ok(QueryDescriptor {
        table_name: template.table_name().to_string(),
        projection,
        filter_predicate,
        filter_arguments,
        sort_order,
    })
}

fn identity_clause(column: &str) -> String {
    format!("{} = ?", column)
}
