//! students-provider: content-provider facade for the students resource
//!
//! Routes `content://` addresses to the `student` table and runs the
//! resulting queries against SQLite. Only reads are supported; every write
//! path fails with `UnimplementedOperation`.

pub mod config;
pub mod contract;
pub mod provider;

pub use config::ProviderConfig;
pub use provider::StudentsProvider;
