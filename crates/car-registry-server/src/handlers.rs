//! REST route handlers.

use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use car_registry::{Car, CarPatch, MessageConfig, NewCar, RegistryError, SearchQuery, ServerConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

type ApiResult<T> = Result<T, ApiError>;

/// `GET /` - plain text welcome.
pub async fn handle_root() -> &'static str {
    ServerConfig::WELCOME_MESSAGE
}

/// `GET /health`
pub async fn handle_health(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let cars = state.store.len()?;
    Ok(Json(json!({ "status": "ok", "cars": cars })))
}

/// `GET /cars`
pub async fn list_cars(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Car>>> {
    Ok(Json(state.store.list()?))
}

/// `GET /cars/:id`
pub async fn get_car(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Car>> {
    let id = require_id(&raw_id)?;
    Ok(Json(state.store.get(id)?))
}

/// `POST /cars`
pub async fn create_car(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Car>)> {
    let body = parse_body(&body)?;
    let new_car = NewCar::from_json(body.as_ref())?;
    let car = state.store.create(new_car)?;
    Ok((StatusCode::CREATED, Json(car)))
}

/// `PUT /cars/:id`
pub async fn update_car(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Car>> {
    let id = require_id(&raw_id)?;
    let patch = match parse_body(&body).and_then(|body| CarPatch::from_json(body.as_ref())) {
        Ok(patch) => patch,
        Err(e) => {
            // A missing car outranks a bad body.
            state.store.get(id)?;
            return Err(e.into());
        }
    };
    Ok(Json(state.store.update(id, &patch)?))
}

/// `DELETE /cars/:id` - succeeds whether or not anything was removed.
pub async fn delete_car(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Value>> {
    match parse_id(&raw_id)? {
        PathId::Car(id) => {
            state.store.delete(id)?;
        }
        PathId::OutOfRange => debug!("Delete of out-of-range id {} is a no-op", raw_id),
    }
    Ok(Json(json!({ "message": MessageConfig::CAR_DELETED })))
}

/// `GET /cars/search?make=&model=&min_price=&max_price=`
pub async fn search_cars(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<Car>>> {
    let query = SearchQuery::from_pairs(params);
    Ok(Json(state.store.search(&query)?))
}

/// A car id taken from the path.
#[derive(Debug, PartialEq, Eq)]
enum PathId {
    Car(i64),
    /// All digits, but too large for any assigned id.
    OutOfRange,
}

/// Car ids in paths are non-negative integers.
fn parse_id(raw: &str) -> ApiResult<PathId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::UnknownId(raw.to_string()));
    }
    Ok(raw.parse::<i64>().map_or(PathId::OutOfRange, PathId::Car))
}

/// Like [`parse_id`], for routes where an unassignable id is a miss.
fn require_id(raw: &str) -> ApiResult<i64> {
    match parse_id(raw)? {
        PathId::Car(id) => Ok(id),
        PathId::OutOfRange => Err(ApiError::UnknownId(raw.to_string())),
    }
}

/// Decode a request body. A blank body is `None`.
fn parse_body(body: &[u8]) -> Result<Option<Value>, RegistryError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body)?;
    debug!("Request body: {}", value);
    Ok(Some(value))
}
