use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use super::{
    error::AppError,
    validation::{StoreRequest, UpdateRequest},
    AppState,
};
use crate::api::{CheckRequest, CheckResponse, ValidationErrors};

pub async fn check_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>, AppError> {
    let Json(payload) = payload?;
    let word = state.storage.get_word(payload.word.trim()).await?;
    debug!(word = %payload.word, exists = word.is_some(), "checked word");

    Ok(Json(CheckResponse {
        exists: word.is_some(),
        word,
    }))
}

pub async fn store_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StoreRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = payload?;
    let word = payload.validate().map_err(AppError::Validation)?;

    if state.storage.get_word(&word.word).await?.is_some() {
        return Err(already_taken());
    }
    match state.storage.add_word(&word).await {
        Ok(id) => {
            info!(id, word = %word.word, "stored word");
            Ok(StatusCode::NO_CONTENT)
        }
        // lost a race against a concurrent store of the same word
        Err(error) if is_unique_violation(&error) => Err(already_taken()),
        Err(error) => Err(error.into()),
    }
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = payload?;
    let changes = payload.validate().map_err(AppError::Validation)?;

    let updated = state.storage.update_word(&word, &changes).await?;
    debug!(%word, updated, "updated word");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn destroy_handler(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state.storage.remove_word(&word).await?;
    debug!(%word, removed, "deleted word");
    Ok(StatusCode::NO_CONTENT)
}

fn already_taken() -> AppError {
    let mut errors = ValidationErrors::default();
    errors.add("word", "The word has already been taken.");
    AppError::Validation(errors)
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|error| error.is_unique_violation())
        .unwrap_or(false)
}
