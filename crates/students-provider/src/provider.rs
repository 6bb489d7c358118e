//! The students provider
//!
//! Reads go through routing, translation, and the storage source, in that
//! order. Writes and MIME type lookups are refused outright, whatever the
//! address.

use crate::config::ProviderConfig;
use crate::contract;
use std::sync::Arc;
use students_query::{
    ChangeNotifier, DataRow, NoopNotifier, ProviderError, QueryExecutor, QueryRequest,
    QueryResult, ResourceAddress, Result,
};
use students_query_sqlite::SqliteSource;
use students_routes::Router;
use tracing::{debug, info, warn};

/// Content-provider style facade over the `student` table
pub struct StudentsProvider {
    router: Router,
    source: Arc<dyn QueryExecutor>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl StudentsProvider {
    /// Create a provider over an existing router and source
    ///
    /// Change notification is a no-op until [`with_notifier`](Self::with_notifier)
    /// installs one.
    pub fn new(router: Router, source: Arc<dyn QueryExecutor>) -> Self {
        Self {
            router,
            source,
            notifier: Arc::new(NoopNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ChangeNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Open the configured database and register the students templates
    ///
    /// Opening is cheap: no schema is created or checked.
    pub fn open(config: &ProviderConfig) -> Result<Self> {
        if config.authority.trim().is_empty() {
            return Err(ProviderError::invalid_configuration(
                "authority must not be empty",
            ));
        }

        let registry = contract::schema_registry(&config.authority)?;
        let source = if config.read_only {
            SqliteSource::open_read_only(&config.database_path)?
        } else {
            SqliteSource::open(&config.database_path)?
        };

        info!(
            "Students provider ready on {} ({})",
            config.authority,
            source.location()
        );

        Ok(Self::new(Router::new(Arc::new(registry)), Arc::new(source)))
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Query the rows an address names
    ///
    /// The returned result carries `address` as its notification address, and
    /// `address` is subscribed with the change notifier.
    pub async fn query(
        &self,
        address: &ResourceAddress,
        request: QueryRequest,
    ) -> Result<QueryResult> {
        let descriptor = self.router.resolve(address, request).map_err(|e| {
            warn!("Rejected query on {}: {}", address, e);
            e
        })?;

        debug!(
            "Querying {} for {} via {}",
            descriptor.table_name,
            address,
            self.source.source_type()
        );

        let result = self.source.execute_query(&descriptor).await?;
        self.notifier.subscribe(address);

        Ok(result.with_notification_address(address.clone()))
    }

    /// Insert a row; not supported
    pub async fn insert(
        &self,
        address: &ResourceAddress,
        _values: DataRow,
    ) -> Result<ResourceAddress> {
        Err(ProviderError::unimplemented(format!("insert into {}", address)))
    }

    /// Update rows; not supported
    pub async fn update(
        &self,
        address: &ResourceAddress,
        _values: DataRow,
        _selection: Option<&str>,
        _selection_args: Option<&[String]>,
    ) -> Result<usize> {
        Err(ProviderError::unimplemented(format!("update of {}", address)))
    }

    /// Delete rows; not supported
    pub async fn delete(
        &self,
        address: &ResourceAddress,
        _selection: Option<&str>,
        _selection_args: Option<&[String]>,
    ) -> Result<usize> {
        Err(ProviderError::unimplemented(format!("delete from {}", address)))
    }

    /// MIME type of an address; not supported
    pub fn get_type(&self, address: &ResourceAddress) -> Result<String> {
        Err(ProviderError::unimplemented(format!("type of {}", address)))
    }

    /// Close the storage source; later queries fail with `ConnectionLost`
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down students provider");
        self.source.close().await
    }
}
