//! Posts API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::models::{CreatePostInput, UpdatePostInput};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/slug/{slug}", get(get_post_by_slug))
        .route("/{id}", get(get_post).patch(update_post).delete(delete_post))
}

async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.post_service.find_all().await?))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.post_service.find_one(id).await?))
}

async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.post_service.find_by_slug(&slug).await?))
}

async fn create_post(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.post_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<UpdatePostInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.post_service.update(id, input).await?))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.post_service.remove(id).await?))
}
