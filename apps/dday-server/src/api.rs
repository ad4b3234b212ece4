//! API-style surface under `/api/v1/ddays`
//!
//! Lists carry pagination metadata and accept search, category and
//! importance filters. Deletes answer with a confirmation message.

use crate::response::{
    or_internal, ApiError, COUNT_FAILED, CREATE_FAILED, DELETE_FAILED, FETCH_FAILED,
    FETCH_ONE_FAILED, UPDATE_FAILED,
};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, MethodRouter},
    Json, Router,
};
use dday_core::{validate_input, DDayInput, DDayRecord, ListParams, ListQuery, Pagination};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

/// Page of records plus pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<DDayRecord>,
    pub pagination: Pagination,
}

/// List and create, mounted on the collection path with and without a trailing slash
pub fn collection() -> MethodRouter<AppState> {
    get(list_ddays).post(create_dday)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", collection())
        .route(
            "/:id",
            get(get_dday).put(update_dday).delete(delete_dday),
        )
}

#[instrument(skip(state))]
async fn list_ddays(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError> {
    let query = ListQuery::from_params(&params);

    let data = state
        .db
        .list(&query.parts())
        .await
        .map_err(or_internal(FETCH_FAILED))?;

    let total = state
        .db
        .count(&query.filter_parts())
        .await
        .map_err(or_internal(COUNT_FAILED))?;

    Ok(Json(ListResponse {
        data,
        pagination: Pagination::new(query.page, query.page_size, total),
    }))
}

#[instrument(skip(state, payload))]
async fn create_dday(
    State(state): State<AppState>,
    payload: Result<Json<DDayInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DDayRecord>), ApiError> {
    let Json(input) = payload?;
    let record = create_record(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state))]
async fn get_dday(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DDayRecord>, ApiError> {
    let record = state
        .db
        .get_by_id(&id)
        .await
        .map_err(or_internal(FETCH_ONE_FAILED))?;
    Ok(Json(record))
}

#[instrument(skip(state, payload))]
async fn update_dday(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DDayInput>, JsonRejection>,
) -> Result<Json<DDayRecord>, ApiError> {
    let record = update_record(&state, &id, payload).await?;
    Ok(Json(record))
}

#[instrument(skip(state))]
async fn delete_dday(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    delete_record(&state, &id).await?;
    Ok(Json(json!({ "message": "D-Day deleted successfully" })))
}

/// Validate and insert a new record
pub(crate) async fn create_record(
    state: &AppState,
    input: &DDayInput,
) -> Result<DDayRecord, ApiError> {
    let validated = validate_input(input).map_err(or_internal(CREATE_FAILED))?;
    let record = DDayRecord::from_validated(validated);

    state
        .db
        .create(&record)
        .await
        .map_err(or_internal(CREATE_FAILED))?;

    info!(id = %record.id, "D-Day created");
    Ok(record)
}

/// Existence check, then body and validation, then a full replacement
///
/// The check and the write are separate statements; a concurrent delete in
/// between surfaces as 404.
pub(crate) async fn update_record(
    state: &AppState,
    id: &str,
    payload: Result<Json<DDayInput>, JsonRejection>,
) -> Result<DDayRecord, ApiError> {
    let existing = state
        .db
        .get_by_id(id)
        .await
        .map_err(or_internal(FETCH_ONE_FAILED))?;

    let Json(input) = payload?;
    let validated = validate_input(&input).map_err(or_internal(UPDATE_FAILED))?;
    let replacement = existing.replaced_with(validated);

    let affected = state
        .db
        .update(id, &replacement)
        .await
        .map_err(or_internal(UPDATE_FAILED))?;
    if affected == 0 {
        return Err(ApiError::not_found());
    }

    state
        .db
        .get_by_id(id)
        .await
        .map_err(or_internal(FETCH_ONE_FAILED))
}

/// Existence check, then delete
pub(crate) async fn delete_record(state: &AppState, id: &str) -> Result<(), ApiError> {
    state
        .db
        .get_by_id(id)
        .await
        .map_err(or_internal(FETCH_ONE_FAILED))?;

    state
        .db
        .delete(id)
        .await
        .map_err(or_internal(DELETE_FAILED))?;

    info!(%id, "D-Day deleted");
    Ok(())
}
