use async_trait::async_trait;
use shared::models::{Character, Greeting, NewCharacter};
use std::sync::Arc;
use thiserror::Error;

pub mod postgres;
pub mod sqlite;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseConfig {
    Sqlite { url: String },
    Postgres { url: String },
}

impl DatabaseConfig {
    /// `postgres://` and `postgresql://` URLs select PostgreSQL, anything else SQLite.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Self::Postgres {
                url: url.to_string(),
            }
        } else {
            Self::Sqlite {
                url: url.to_string(),
            }
        }
    }

    pub async fn connect(&self) -> DbResult<Arc<dyn Database>> {
        Ok(match self {
            Self::Sqlite { url } => Arc::new(sqlite::SqliteDatabase::new(url).await?),
            Self::Postgres { url } => Arc::new(postgres::PostgresDatabase::new(url).await?),
        })
    }
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

#[async_trait]
pub trait Database: Send + Sync {
    async fn get_characters(&self) -> DbResult<Vec<Character>>;
    async fn get_character(&self, character_id: i64) -> DbResult<Character>;
    async fn create_character(&self, character: NewCharacter) -> DbResult<Character>;
    async fn get_greetings(&self, character_id: i64) -> DbResult<Vec<Greeting>>;
    /// Inserts a character's whole greeting batch in one transaction.
    ///
    /// Fails with [`DbError::Conflict`] if a batch was already stored for the
    /// character. An empty batch writes nothing.
    async fn create_greetings(
        &self,
        character_id: i64,
        greetings: Vec<String>,
    ) -> DbResult<Vec<Greeting>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_urls_select_postgres() {
        assert!(matches!(
            DatabaseConfig::from_url("postgres://localhost/npc"),
            DatabaseConfig::Postgres { .. }
        ));
        assert!(matches!(
            DatabaseConfig::from_url("postgresql://localhost/npc"),
            DatabaseConfig::Postgres { .. }
        ));
    }

    #[test]
    fn other_urls_select_sqlite() {
        assert_eq!(
            DatabaseConfig::from_url("sqlite://npc-greeter.db"),
            DatabaseConfig::Sqlite {
                url: "sqlite://npc-greeter.db".to_string()
            }
        );
    }
}
