//! Database configuration.

use std::path::PathBuf;

/// File name of the SQLite database inside the storage directory.
pub const DB_FILE_NAME: &str = "mediacast.db";

/// Where and how to connect to the database
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SeaORM connection URL
    pub url: String,
    /// Directory that must exist before connecting (file-backed SQLite only)
    pub storage_path: Option<PathBuf>,
    /// Upper bound on pooled connections
    pub max_connections: Option<u32>,
    /// Connections kept open even when idle
    pub min_connections: Option<u32>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::sqlite_dir(std::env::temp_dir().join("mediacast"))
    }
}

impl DatabaseConfig {
    /// SQLite file `mediacast.db` inside `dir`
    pub fn sqlite_dir(dir: PathBuf) -> Self {
        let db_path = dir.join(DB_FILE_NAME);
        Self {
            url: format!("sqlite:{}?mode=rwc", db_path.display()),
            storage_path: Some(dir),
            max_connections: None,
            min_connections: None,
        }
    }

    /// Private in-memory SQLite database.
    ///
    /// The database lives as long as its connection, so the pool is pinned
    /// to exactly one.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            storage_path: None,
            max_connections: Some(1),
            min_connections: Some(1),
        }
    }

    /// Explicit connection URL
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            storage_path: None,
            max_connections: None,
            min_connections: None,
        }
    }

    /// Read `MEDIACAST_DATABASE_URL`, falling back to `MEDIACAST_STORAGE_PATH`
    /// and finally to a directory under the system temp dir.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("MEDIACAST_DATABASE_URL").filter(|u| !u.is_empty()) {
            return Self::url(url);
        }
        lookup("MEDIACAST_STORAGE_PATH")
            .filter(|p| !p.is_empty())
            .map(|p| Self::sqlite_dir(PathBuf::from(p)))
            .unwrap_or_default()
    }
}
