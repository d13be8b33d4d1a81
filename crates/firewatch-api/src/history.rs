use axum::{Json, extract::State, response::IntoResponse};

use crate::error::ApiError;
use crate::{AppState, with_store};

pub async fn list_history(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let history = with_store(&state, |store| Ok(store.load_history())).await?;
    Ok(Json(history))
}

pub async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = with_store(&state, |store| Ok(store.summary())).await?;
    Ok(Json(summary))
}
