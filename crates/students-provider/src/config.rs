//! Provider configuration

use crate::contract::{CONTENT_AUTHORITY, DEFAULT_DATABASE_NAME};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_NAME)
}

fn default_authority() -> String {
    CONTENT_AUTHORITY.to_string()
}

/// Where the provider stores its data and which authority it answers for
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// SQLite database file, created on open unless `read_only` is set
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Authority the students templates are registered under
    #[serde(default = "default_authority")]
    pub authority: String,

    /// Open the database without write access
    #[serde(default)]
    pub read_only: bool,
}

impl ProviderConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Self::default()
        }
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            authority: default_authority(),
            read_only: false,
        }
    }
}
