use crate::AppState;
use crate::error::ApiError;
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use shared::models::{Character, CreateCharacterRequest};

pub async fn list_characters(
    State(state): State<AppState>,
) -> Result<Json<Vec<Character>>, ApiError> {
    let characters = state.db.get_characters().await.map_err(|e| {
        tracing::error!("Failed to list characters: {:?}", e);
        e
    })?;
    Ok(Json(characters))
}

pub async fn create_character(
    State(state): State<AppState>,
    payload: Result<Json<CreateCharacterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    let Json(payload) = payload?;
    let new_character = payload.into_new_character()?;

    let character = state
        .db
        .create_character(new_character)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create character: {:?}", e);
            e
        })?;

    tracing::info!("Created character {} ({})", character.id, character.name);
    Ok((StatusCode::CREATED, Json(character)))
}
