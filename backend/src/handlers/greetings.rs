use crate::AppState;
use crate::dbs::DbError;
use crate::error::ApiError;
use crate::handlers::validate_model;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::models::{Character, CharacterGreetings, strip_quotes};

fn notice(message: String) -> Response {
    (StatusCode::CREATED, Json(message)).into_response()
}

pub async fn list_greetings(
    State(state): State<AppState>,
    Path(character_id): Path<String>,
) -> Result<Response, ApiError> {
    let character: Character = validate_model(state.db.as_ref(), &character_id).await?;

    let greetings = state.db.get_greetings(character.id).await.map_err(|e| {
        tracing::error!("Failed to list greetings: {:?}", e);
        e
    })?;

    if greetings.is_empty() {
        return Ok(notice(format!("No greetings found for {}", character.name)));
    }
    Ok(Json(CharacterGreetings::new(character.name, greetings)).into_response())
}

pub async fn generate_greetings(
    State(state): State<AppState>,
    Path(character_id): Path<String>,
) -> Result<Response, ApiError> {
    let character: Character = validate_model(state.db.as_ref(), &character_id).await?;

    // The model is queried even when the result ends up discarded below.
    let phrases = state.generator.generate(&character).await.map_err(|e| {
        tracing::error!("Failed to generate greetings: {:?}", e);
        e
    })?;

    let existing = state.db.get_greetings(character.id).await.map_err(|e| {
        tracing::error!("Failed to list greetings: {:?}", e);
        e
    })?;
    if !existing.is_empty() {
        return Ok(notice(format!(
            "Greetings already generated for {}",
            character.name
        )));
    }

    let greetings = phrases
        .iter()
        .map(|phrase| strip_quotes(phrase).to_string())
        .collect();

    match state.db.create_greetings(character.id, greetings).await {
        Ok(created) => {
            tracing::info!(
                "Stored {} greetings for character {}",
                created.len(),
                character.id
            );
            Ok(notice(format!(
                "Greetings successfully added to {}",
                character.name
            )))
        }
        Err(DbError::Conflict(_)) => Ok(notice(format!(
            "Greetings already generated for {}",
            character.name
        ))),
        Err(e) => {
            tracing::error!("Failed to store greetings: {:?}", e);
            Err(e.into())
        }
    }
}
