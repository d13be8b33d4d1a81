use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use firewatch_db::StoreError;
use firewatch_types::{RecipientInput, RecipientPatch, SetActiveRequest, Severity};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::{AppState, with_store};

pub async fn list_recipients(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let recipients = with_store(&state, |store| Ok(store.load_recipients())).await?;
    Ok(Json(recipients))
}

pub async fn get_recipient(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let recipient = with_store(&state, move |store| {
        store.get_recipient(id).ok_or(StoreError::NotFound { id })
    })
    .await?;
    Ok(Json(recipient))
}

pub async fn add_recipient(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RecipientInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = with_store(&state, move |store| store.add_recipient(req)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_recipient(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<RecipientPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = with_store(&state, move |store| store.update_recipient(id, req)).await?;
    Ok(Json(updated))
}

pub async fn delete_recipient(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    with_store(&state, move |store| store.delete_recipient(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_active(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<SetActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    with_store(&state, move |store| store.set_active(id, req.is_active)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Active recipients that an alert of `severity` would reach.
pub async fn audience(
    State(state): State<AppState>,
    ApiPath(severity): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let severity: Severity = severity.parse()?;
    let recipients = with_store(&state, move |store| Ok(store.recipients_for(severity))).await?;
    Ok(Json(recipients))
}
