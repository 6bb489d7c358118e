use crate::error::Result;
use crate::types::*;
use async_trait::async_trait;

/// Storage collaborator that runs fully resolved queries
///
/// Implementations own placeholder substitution, locking and persistence. The
/// routing layer never inspects the rows it gets back.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Get the type name of this source
    fn source_type(&self) -> &'static str;

    /// Execute a descriptor and return its rows in store order
    async fn execute_query(&self, descriptor: &QueryDescriptor) -> Result<QueryResult>;

    /// Close the underlying connection
    ///
    /// Queries issued after closing fail with `ConnectionLost`.
    async fn close(&self) -> Result<()>;
}

/// Change-notification capability for resource addresses
///
/// Subscribing must be safe to call any number of times, including on
/// implementations that do nothing.
pub trait ChangeNotifier: Send + Sync {
    /// Register interest in changes at or below `address`
    fn subscribe(&self, address: &ResourceAddress);

    /// Announce that data at `address` changed
    fn notify_change(&self, address: &ResourceAddress);
}
