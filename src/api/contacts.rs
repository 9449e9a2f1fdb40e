//! Contacts API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::models::{CreateContactInput, UpdateContactInput};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route(
            "/{id}",
            get(get_contact).patch(update_contact).delete(delete_contact),
        )
}

/// Form endpoint kept for older frontends, mounted at `/contact`
pub fn legacy_router() -> Router<AppState> {
    Router::new().route("/", post(create_contact))
}

async fn create_contact(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateContactInput>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state.contact_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn list_contacts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.contact_service.find_all().await?))
}

async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.contact_service.find_one(id).await?))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<UpdateContactInput>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.contact_service.update(id, input).await?))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.contact_service.remove(id).await?))
}
