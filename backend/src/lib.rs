mod dbs;
mod error;
mod handlers;
mod openai;

pub use crate::dbs::{Database, DatabaseConfig, DbError, DbResult};
pub use crate::dbs::{postgres::PostgresDatabase, sqlite::SqliteDatabase};
pub use crate::error::ApiError;
pub use crate::openai::{
    DEFAULT_API_BASE, DEFAULT_MODEL, GenerationError, GeneratorConfig, GreetingGenerator,
    OpenAiGenerator, build_prompt, parse_phrases,
};

use crate::handlers::{create_character, generate_greetings, list_characters, list_greetings};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub generator: Arc<dyn GreetingGenerator>,
}

pub fn init(state: AppState) -> Router<()> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/characters",
            get(list_characters).post(create_character),
        )
        .route("/characters/{char_id}/greetings", get(list_greetings))
        .route("/characters/{char_id}/generate", post(generate_greetings))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
