//! Database module for SQLite persistence using SeaORM

pub mod entities;

use std::time::{SystemTime, UNIX_EPOCH};

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr,
    Statement,
};

use crate::config::DatabaseConfig;

/// Current time as Unix seconds, the unit every timestamp column uses.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Initialize database connection and create tables
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    // Ensure storage directory exists
    if let Some(dir) = &config.storage_path {
        std::fs::create_dir_all(dir).ok();
    }

    tracing::info!("Connecting to database: {}", config.url);

    let mut options = ConnectOptions::new(config.url.clone());
    if let Some(max) = config.max_connections {
        options.max_connections(max);
    }
    if let Some(min) = config.min_connections {
        options.min_connections(min);
    }

    let db = Database::connect(options).await?;

    if db.get_database_backend() == DatabaseBackend::Sqlite {
        // Referential actions on media.podcast_id depend on this
        db.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "PRAGMA foreign_keys = ON".to_string(),
        ))
        .await?;
    }

    create_tables(&db).await?;

    Ok(db)
}

/// Create all tables if they don't exist
async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Podcasts table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS podcasts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slug VARCHAR(50) NOT NULL UNIQUE CHECK (slug <> '' AND length(slug) <= 50),
            created_on INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            modified_on INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
            title VARCHAR(50) NOT NULL CHECK (length(title) <= 50),
            subtitle VARCHAR(255) CHECK (length(subtitle) <= 255),
            description TEXT,
            category VARCHAR(50) CHECK (length(category) <= 50),
            author_name VARCHAR(50) NOT NULL CHECK (length(author_name) <= 50),
            author_email VARCHAR(50) NOT NULL CHECK (length(author_email) <= 50),
            explicit BOOLEAN DEFAULT NULL,
            copyright VARCHAR(50) CHECK (length(copyright) <= 50),
            itunes_url VARCHAR(80) CHECK (length(itunes_url) <= 80),
            feedburner_url VARCHAR(80) CHECK (length(feedburner_url) <= 80)
        )
        "#.to_string(),
    )).await?;

    // Default listing order
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_podcasts_title ON podcasts(title)"#.to_string(),
    )).await?;

    // Media table (episodes); removing a podcast detaches its episodes
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS media (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            podcast_id INTEGER,
            slug VARCHAR(50) NOT NULL UNIQUE,
            title VARCHAR(255) NOT NULL,
            reviewed BOOLEAN NOT NULL DEFAULT 0,
            encoded BOOLEAN NOT NULL DEFAULT 0,
            publishable BOOLEAN NOT NULL DEFAULT 0,
            publish_on INTEGER,
            publish_until INTEGER,
            created_on INTEGER NOT NULL,
            FOREIGN KEY (podcast_id) REFERENCES podcasts(id) ON UPDATE CASCADE ON DELETE SET NULL
        )
        "#.to_string(),
    )).await?;

    // Create index for episode lookups
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_media_podcast ON media(podcast_id)"#.to_string(),
    )).await?;

    tracing::info!("Database tables initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn count_tables(db: &DatabaseConnection) -> i64 {
        let row = db
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name IN ('podcasts', 'media')".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[tokio::test]
    async fn test_init_file_database() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested");
        let config = DatabaseConfig::sqlite_dir(dir.clone());

        let db = init_database(&config).await.unwrap();
        assert!(dir.join(crate::config::DB_FILE_NAME).exists());
        assert_eq!(count_tables(&db).await, 2);

        // Re-running table creation is harmless
        create_tables(&db).await.unwrap();
        assert_eq!(count_tables(&db).await, 2);
    }

    #[tokio::test]
    async fn test_schema_enforces_lengths() {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        let long_title = "t".repeat(51);
        let result = db
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(
                    "INSERT INTO podcasts (slug, title, author_name, author_email) VALUES ('ok', '{}', 'a', 'b')",
                    long_title
                ),
            ))
            .await;
        assert!(result.is_err());

        let result = db
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                "INSERT INTO podcasts (slug, title, author_name, author_email) VALUES ('', 'x', 'a', 'b')".to_string(),
            ))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_unix_now_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(unix_now() > 1_577_836_800);
    }
}
