use crate::dbs::{Database, DbError, DbResult};
use async_trait::async_trait;
use shared::models::{Character, Greeting, NewCharacter};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Pool, Postgres, Row};

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new().connect(database_url).await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> DbResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS characters (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                age BIGINT NOT NULL,
                occupation TEXT NOT NULL,
                personality TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS greetings (
                id BIGSERIAL PRIMARY KEY,
                greeting_text TEXT NOT NULL,
                character_id BIGINT NOT NULL REFERENCES characters(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS greeting_batches (
                character_id BIGINT PRIMARY KEY REFERENCES characters(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn character_from_row(row: &PgRow) -> Character {
    Character {
        id: row.get("id"),
        name: row.get("name"),
        age: row.get("age"),
        occupation: row.get("occupation"),
        personality: row.get("personality"),
    }
}

#[async_trait]
impl Database for PostgresDatabase {
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
            "SELECT id, name, age, occupation, personality FROM characters WHERE id = $1",
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
            "INSERT INTO characters (name, age, occupation, personality) VALUES ($1, $2, $3, $4) RETURNING id",
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
            "SELECT id, greeting_text, character_id FROM greetings WHERE character_id = $1 ORDER BY id",
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

        // A concurrent generate for the same character blocks here until the
        // other transaction commits, then sees the conflict.
        let claimed = sqlx::query(
            "INSERT INTO greeting_batches (character_id) VALUES ($1) ON CONFLICT DO NOTHING",
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

        let rows = sqlx::query(
            "INSERT INTO greetings (greeting_text, character_id)
             SELECT text, $2 FROM UNNEST($1::TEXT[]) WITH ORDINALITY AS batch(text, position)
             ORDER BY position
             RETURNING id, greeting_text",
        )
        .bind(&greetings)
        .bind(character_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut created: Vec<Greeting> = rows
            .into_iter()
            .map(|row| Greeting {
                id: row.get("id"),
                greeting_text: row.get("greeting_text"),
                character_id,
            })
            .collect();
        created.sort_by_key(|g| g.id);
        Ok(created)
    }
}
