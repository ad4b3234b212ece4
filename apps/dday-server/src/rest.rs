//! REST-style surface under `/rest/ddays`
//!
//! Same records and validation as the API surface. Lists are a bare array
//! honoring only sort and paging; deletes answer 204.

use crate::api::{create_record, delete_record, update_record};
use crate::response::{or_internal, ApiError, FETCH_FAILED, FETCH_ONE_FAILED};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, MethodRouter},
    Json, Router,
};
use dday_core::{DDayInput, DDayRecord, ListParams, ListQuery};
use tracing::instrument;

pub fn collection() -> MethodRouter<AppState> {
    get(list).post(create)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", collection())
        .route("/:id", get(show).put(update).delete(destroy))
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<DDayRecord>>, ApiError> {
    let query = ListQuery::from_params(&params);
    let records = state
        .db
        .list(&query.window_parts())
        .await
        .map_err(or_internal(FETCH_FAILED))?;
    Ok(Json(records))
}

#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    payload: Result<Json<DDayInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DDayRecord>), ApiError> {
    let Json(input) = payload?;
    let record = create_record(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DDayRecord>, ApiError> {
    state
        .db
        .get_by_id(&id)
        .await
        .map(Json)
        .map_err(or_internal(FETCH_ONE_FAILED))
}

#[instrument(skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DDayInput>, JsonRejection>,
) -> Result<Json<DDayRecord>, ApiError> {
    update_record(&state, &id, payload).await.map(Json)
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_record(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
