use crate::dbs::{Database, DbError, DbResult};
use async_trait::async_trait;
use shared::models::{Character, Greeting, NewCharacter};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

impl SqliteDatabase {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    /// A private in-memory database. Pinned to one connection because every
    /// SQLite `:memory:` connection is a separate database.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> DbResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS characters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                occupation TEXT NOT NULL,
                personality TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS greetings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                greeting_text TEXT NOT NULL,
                character_id INTEGER NOT NULL,
                FOREIGN KEY(character_id) REFERENCES characters(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        // One row per character whose greetings have been generated.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS greeting_batches (
                character_id INTEGER PRIMARY KEY,
                FOREIGN KEY(character_id) REFERENCES characters(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn character_from_row(row: &SqliteRow) -> Character {
    Character {
        id: row.get("id"),
        name: row.get("name"),
        age: row.get("age"),
        occupation: row.get("occupation"),
        personality: row.get("personality"),
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn get_characters(&self) -> DbResult<Vec<Character>> {
        let rows = sqlx::query(
            "SELECT id, name, age, occupation, personality FROM characters ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(character_from_row).collect())
    }

    async fn get_character(&self, character_id: i64) -> DbResult<Character> {
        let row = sqlx::query(
            "SELECT id, name, age, occupation, personality FROM characters WHERE id = ?",
        )
        .bind(character_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(character_from_row(&row)),
            None => Err(DbError::NotFound(format!(
                "Character {} not found",
                character_id
            ))),
        }
    }

    async fn create_character(&self, character: NewCharacter) -> DbResult<Character> {
        let row = sqlx::query(
            "INSERT INTO characters (name, age, occupation, personality) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&character.name)
        .bind(character.age)
        .bind(&character.occupation)
        .bind(&character.personality)
        .fetch_one(&self.pool)
        .await?;

        Ok(character.with_id(row.get("id")))
    }

    async fn get_greetings(&self, character_id: i64) -> DbResult<Vec<Greeting>> {
        let rows = sqlx::query(
            "SELECT id, greeting_text, character_id FROM greetings WHERE character_id = ? ORDER BY id",
        )
        .bind(character_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Greeting {
                id: row.get("id"),
                greeting_text: row.get("greeting_text"),
                character_id: row.get("character_id"),
            })
            .collect())
    }

    async fn create_greetings(
        &self,
        character_id: i64,
        greetings: Vec<String>,
    ) -> DbResult<Vec<Greeting>> {
        if greetings.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            "INSERT INTO greeting_batches (character_id) VALUES (?) ON CONFLICT DO NOTHING",
        )
        .bind(character_id)
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            return Err(DbError::Conflict(format!(
                "Greetings already generated for character {}",
                character_id
            )));
        }

        let mut created = Vec::with_capacity(greetings.len());
        for greeting_text in greetings {
            let row = sqlx::query(
                "INSERT INTO greetings (greeting_text, character_id) VALUES (?, ?) RETURNING id",
            )
            .bind(&greeting_text)
            .bind(character_id)
            .fetch_one(&mut *tx)
            .await?;

            created.push(Greeting {
                id: row.get("id"),
                greeting_text,
                character_id,
            });
        }

        tx.commit().await?;
        Ok(created)
    }
}
