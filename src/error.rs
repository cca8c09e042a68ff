use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Required field missing: {0}")]
    MissingField(String),

    #[error("Slug is empty after normalization: {0:?}")]
    EmptySlug(String),

    #[error("Podcast not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(msg)) = err.sql_err() {
            return Error::UniqueViolation(msg);
        }
        if let Some(column) = not_null_column(&err.to_string()) {
            return Error::MissingField(column);
        }
        Error::Database(err)
    }
}

/// Extracts the column name from a NOT NULL failure reported by SQLite
/// (`NOT NULL constraint failed: podcasts.title`) or Postgres
/// (`null value in column "title" ... violates not-null constraint`).
fn not_null_column(message: &str) -> Option<String> {
    if let Some(idx) = message.find("NOT NULL constraint failed: ") {
        let rest = &message[idx + "NOT NULL constraint failed: ".len()..];
        let qualified = rest.split_whitespace().next()?;
        let column = qualified.rsplit('.').next()?;
        return Some(column.to_string());
    }
    if message.contains("violates not-null constraint") {
        let start = message.find("null value in column \"")? + "null value in column \"".len();
        let end = message[start..].find('"')?;
        return Some(message[start..start + end].to_string());
    }
    None
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_null_column_sqlite() {
        let msg = "Execution Error: error returned from database: (code: 1299) NOT NULL constraint failed: podcasts.title";
        assert_eq!(not_null_column(msg).as_deref(), Some("title"));
    }

    #[test]
    fn test_not_null_column_postgres() {
        let msg = r#"null value in column "author_email" of relation "podcasts" violates not-null constraint"#;
        assert_eq!(not_null_column(msg).as_deref(), Some("author_email"));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = Error::from(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, Error::Database(_)));
        assert!(not_null_column("UNIQUE constraint failed: podcasts.slug").is_none());
    }
}
