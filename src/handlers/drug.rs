//! Drug CRUD handlers: list, read, create, update, delete, categories.

use crate::error::{AppError, FieldError};
use crate::model::{Drug, DrugCreate, DrugUpdate};
use crate::service::{validate_create, validate_list_params, validate_update, ListParams};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

/// Unreadable JSON is a 422 on `body`; an over-limit body stays 413.
fn body_or_422(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v).map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::Validation(FieldError::new("body", e.body_text()).into())
        }
    })
}

#[utoipa::path(
    get,
    path = "/drugs",
    tag = "drugs",
    params(ListParams),
    responses(
        (status = 200, description = "Matching drugs ordered by name", body = Vec<Drug>),
        (status = 422, description = "Invalid query parameters"),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Drug>>, AppError> {
    let Query(raw) =
        query.map_err(|e| AppError::Validation(FieldError::new("query", e.body_text()).into()))?;
    let (filter, page) = validate_list_params(raw)?;
    let drugs = state.store.list(&filter, page).await?;
    Ok(Json(drugs))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "drugs",
    responses((status = 200, description = "Distinct categories", body = Vec<String>))
)]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.categories().await?))
}

#[utoipa::path(
    get,
    path = "/drugs/{id}",
    tag = "drugs",
    params(("id" = String, Path, description = "Drug id")),
    responses(
        (status = 200, description = "The drug", body = Drug),
        (status = 404, description = "No drug with this id"),
    )
)]
pub async fn read(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Drug>, AppError> {
    let drug = state.store.get(&id).await?.ok_or_else(AppError::drug_not_found)?;
    Ok(Json(drug))
}

/// Replaying a create with an existing client id returns the stored record, still 201.
#[utoipa::path(
    post,
    path = "/drugs",
    tag = "drugs",
    request_body = DrugCreate,
    responses(
        (status = 201, description = "Created, or the existing record for a known id", body = Drug),
        (status = 413, description = "Body over 1 MiB"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Drug>), AppError> {
    let input = validate_create(body_or_422(body)?)?;
    let drug = state.store.create(input).await?;
    Ok((StatusCode::CREATED, Json(drug)))
}

#[utoipa::path(
    put,
    path = "/drugs/{id}",
    tag = "drugs",
    params(("id" = String, Path, description = "Drug id")),
    request_body = DrugUpdate,
    responses(
        (status = 200, description = "Updated drug", body = Drug),
        (status = 404, description = "No drug with this id"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Drug>, AppError> {
    let changes = validate_update(body_or_422(body)?)?;
    let drug = state
        .store
        .update(&id, &changes)
        .await?
        .ok_or_else(AppError::drug_not_found)?;
    Ok(Json(drug))
}

#[utoipa::path(
    delete,
    path = "/drugs/{id}",
    tag = "drugs",
    params(("id" = String, Path, description = "Drug id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No drug with this id"),
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    if state.store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::drug_not_found())
    }
}
