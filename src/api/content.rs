//! Content API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::models::{CreateContentInput, UpdateContentInput};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_content).post(create_content))
        .route("/key/{key}", get(get_content_by_key))
        .route(
            "/{id}",
            get(get_content).patch(update_content).delete(delete_content),
        )
}

async fn list_content(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.content_service.find_all().await?))
}

async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.content_service.find_one(id).await?))
}

async fn get_content_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.content_service.find_by_key(&key).await?))
}

async fn create_content(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateContentInput>,
) -> Result<impl IntoResponse, ApiError> {
    let content = state.content_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(content)))
}

async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<UpdateContentInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.content_service.update(id, input).await?))
}

async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.content_service.remove(id).await?))
}
