//! Config entry API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::models::{CreateConfigEntryInput, UpdateConfigEntryInput};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/key/{key}", get(get_entry_by_key))
        .route("/{id}", get(get_entry).patch(update_entry).delete(delete_entry))
}

async fn list_entries(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.config_service.find_all().await?))
}

async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.config_service.find_one(id).await?))
}

async fn get_entry_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.config_service.find_by_key(&key).await?))
}

async fn create_entry(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateConfigEntryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state.config_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<UpdateConfigEntryInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.config_service.update(id, input).await?))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.config_service.remove(id).await?))
}
