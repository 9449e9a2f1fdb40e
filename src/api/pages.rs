//! Pages API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::models::{CreatePageInput, UpdatePageInput};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pages).post(create_page))
        .route("/slug/{slug}", get(get_page_by_slug))
        .route("/{id}", get(get_page).patch(update_page).delete(delete_page))
}

async fn list_pages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.page_service.find_all().await?))
}

async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.page_service.find_one(id).await?))
}

async fn get_page_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.page_service.find_by_slug(&slug).await?))
}

async fn create_page(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePageInput>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.page_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<UpdatePageInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.page_service.update(id, input).await?))
}

async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.page_service.remove(id).await?))
}
