//! HTTP API handlers.

use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorResponse, StorageError, StorageResult, ValidationError};
use crate::metrics::{self, LatencyTimer};
use crate::storage::{StoreOperation, VehicleStore};
use crate::vehicle::{
    decode_object, CreateVehicleRequest, NewVehicle, UpdateVehicleRequest, Vehicle, VehicleUpdate,
};

/// Plain-text body served at `/`.
pub const WELCOME_MESSAGE: &str = "Welcome to the Vehicle Diagnostics API!";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record-access layer.
    pub store: Arc<dyn VehicleStore>,
    /// Prometheus handle, if a recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle rendered at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Run a blocking store call on the blocking pool, timing it and
    /// translating its error.
    pub async fn run<T, F>(&self, operation: StoreOperation, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn VehicleStore) -> StorageResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || {
            let _timer = LatencyTimer::new(operation);
            f(store.as_ref())
        })
        .await
        .map_err(|e| ApiError::Internal(format!("{operation} task failed: {e}")))?;

        if let Err(e) = &result {
            if !matches!(e, StorageError::NotFound { .. }) {
                metrics::inc_storage_errors(operation);
            }
        }

        result.map_err(ApiError::from)
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// Confirmation returned after a vehicle is created.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    /// Confirmation text.
    pub message: String,
    /// Id assigned to the new vehicle.
    pub id: i64,
}

/// Confirmation returned after an update or delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Confirmation text.
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: String,
}

/// Check for `application/json` or an `application/*+json` media type.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Read a JSON object body. A body sent without a JSON content type counts
/// as no input; a blank body, `null`, or `{}` yields `None`.
fn read_body<T: DeserializeOwned>(headers: &HeaderMap, body: &Bytes) -> Result<Option<T>, ApiError> {
    let blank = body.iter().all(u8::is_ascii_whitespace);
    if !blank && !is_json_content_type(headers) {
        return Err(ValidationError::NoInput.into());
    }
    Ok(decode_object(body)?)
}

/// Non-integer ids can never match a record.
fn vehicle_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!("Unroutable vehicle id: {}", rejection.body_text());
            Err(ApiError::NotFound("Vehicle not found".to_string()))
        }
    }
}

/// Index handler - static welcome text.
#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    responses((status = 200, description = "Welcome text", body = String, content_type = "text/plain"))
)]
pub async fn index() -> &'static str {
    WELCOME_MESSAGE
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "meta",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Metrics handler - Prometheus text exposition.
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => ApiError::NotFound("metrics recorder not installed".to_string()).into_response(),
    }
}

/// Create a vehicle from a JSON body.
#[utoipa::path(
    post,
    path = "/add_vehicle",
    tag = "vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle created", body = CreatedResponse),
        (status = 400, description = "No body, invalid JSON, or missing field", body = ErrorResponse),
        (status = 500, description = "Persistence failed", body = ErrorResponse)
    )
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let request: CreateVehicleRequest =
        read_body(&headers, &body)?.ok_or(ValidationError::NoInput)?;
    let new_vehicle = NewVehicle::try_from(request)?;

    let vehicle = state
        .run(StoreOperation::Create, move |store| store.create(new_vehicle))
        .await?;

    metrics::inc_vehicles_created();
    info!(id = vehicle.id, make = %vehicle.make, model = %vehicle.model, "Vehicle added");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Vehicle added successfully!".to_string(),
            id: vehicle.id,
        }),
    ))
}

/// List every vehicle.
#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    responses(
        (status = 200, description = "All vehicles", body = [Vehicle]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let vehicles = state.run(StoreOperation::List, |store| store.list()).await?;
    Ok(Json(vehicles))
}

/// Fetch one vehicle.
#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(("id" = i64, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "The vehicle", body = Vehicle),
        (status = 404, description = "Unknown id", body = ErrorResponse)
    )
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vehicle>, ApiError> {
    let id = vehicle_id(path)?;
    let vehicle = state.run(StoreOperation::Get, move |store| store.get(id)).await?;
    Ok(Json(vehicle))
}

/// Overwrite the fields present in the body.
#[utoipa::path(
    put,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(("id" = i64, Path, description = "Vehicle id")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = MessageResponse),
        (status = 400, description = "Invalid JSON or empty text field", body = ErrorResponse),
        (status = 404, description = "Unknown id", body = ErrorResponse)
    )
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = vehicle_id(path)?;
    let request: UpdateVehicleRequest = read_body(&headers, &body)?.unwrap_or_default();
    let update = VehicleUpdate::try_from(request)?;

    state
        .run(StoreOperation::Update, move |store| store.update(id, update))
        .await?;

    metrics::inc_vehicles_updated();
    info!(id, "Vehicle updated");

    Ok(MessageResponse::new("Vehicle updated successfully!"))
}

/// Permanently delete a vehicle.
#[utoipa::path(
    delete,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(("id" = i64, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Vehicle deleted", body = MessageResponse),
        (status = 404, description = "Unknown id", body = ErrorResponse)
    )
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = vehicle_id(path)?;
    state
        .run(StoreOperation::Delete, move |store| store.delete(id))
        .await?;

    metrics::inc_vehicles_deleted();
    info!(id, "Vehicle deleted");

    Ok(MessageResponse::new("Vehicle deleted successfully!"))
}
