use crate::dbs::{Database, DbError, DbResult};
use crate::error::ApiError;
use async_trait::async_trait;
use shared::models::Character;

/// An entity addressable by integer primary key.
#[async_trait]
pub trait Model: Sized {
    const NAME: &'static str;

    async fn find(db: &dyn Database, id: i64) -> DbResult<Self>;
}

#[async_trait]
impl Model for Character {
    const NAME: &'static str = "Character";

    async fn find(db: &dyn Database, id: i64) -> DbResult<Self> {
        db.get_character(id).await
    }
}

/// Resolves a raw path segment to a stored `M`.
///
/// A segment that is not an integer is a 400, an unknown id a 404.
pub async fn validate_model<M: Model>(db: &dyn Database, raw_id: &str) -> Result<M, ApiError> {
    let id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{} {} invalid", M::NAME, raw_id)))?;

    match M::find(db, id).await {
        Ok(model) => Ok(model),
        Err(DbError::NotFound(_)) => Err(ApiError::NotFound(format!(
            "{} {} not found",
            M::NAME,
            id
        ))),
        Err(e) => {
            tracing::error!("Failed to get {} {}: {:?}", M::NAME, id, e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbs::sqlite::SqliteDatabase;
    use shared::models::NewCharacter;

    #[tokio::test]
    async fn resolves_existing_character() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let created = db
            .create_character(NewCharacter {
                name: "Ciri".to_string(),
                age: 21,
                occupation: "swordswoman".to_string(),
                personality: "defiant".to_string(),
            })
            .await
            .unwrap();

        let found: Character = validate_model(&db, &created.id.to_string()).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn non_integer_id_is_bad_request() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let err = validate_model::<Character>(&db, "abc").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.to_string(), "Character abc invalid");
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let err = validate_model::<Character>(&db, "9999").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), "Character 9999 not found");
    }
}
