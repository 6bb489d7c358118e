use std::fmt;
use thiserror::Error;

/// Why an address could not be routed
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RoutingErrorKind {
    /// The address matched no registered template
    Unmatched,
}

impl fmt::Display for RoutingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingErrorKind::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Unified error type for all provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Address could not be routed to a resource
    #[error("Routing failed ({kind}){}", address_suffix(.address))]
    Routing {
        kind: RoutingErrorKind,
        address: Option<String>,
    },

    /// Operation has no defined behavior on this provider
    #[error("Operation not implemented: {0}")]
    UnimplementedOperation(String),

    /// Address string could not be parsed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid query syntax or parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Connection could not be opened
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed before the operation ran
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Create an unmatched routing error, optionally naming the address
    pub fn unmatched(address: Option<String>) -> Self {
        ProviderError::Routing {
            kind: RoutingErrorKind::Unmatched,
            address,
        }
    }

    /// Create an unimplemented operation error
    pub fn unimplemented(operation: impl Into<String>) -> Self {
        ProviderError::UnimplementedOperation(operation.into())
    }

    /// Create an invalid address error
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        ProviderError::InvalidAddress(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        ProviderError::InvalidConfiguration(msg.into())
    }

    /// Whether this error is a routing failure of the given kind
    pub fn is_routing(&self, expected: RoutingErrorKind) -> bool {
        matches!(self, ProviderError::Routing { kind, .. } if *kind == expected)
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

fn address_suffix(address: &Option<String>) -> String {
    address
        .as_ref()
        .map(|a| format!(": {}", a))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ProviderError>;
