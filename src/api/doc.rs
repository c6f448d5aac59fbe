//! OpenAPI documentation for the HTTP surface.
//!
//! Served as JSON at `/api-docs/openapi.json` and browsable through
//! Swagger UI at `/swagger-ui`.

use utoipa::OpenApi;

use super::handlers::{CreatedResponse, HealthResponse, MessageResponse};
use crate::error::ErrorResponse;
use crate::vehicle::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vehicle Diagnostics API",
        description = "CRUD access to vehicle records and their diagnostic trouble codes."
    ),
    paths(
        crate::api::handlers::index,
        crate::api::handlers::health,
        crate::api::handlers::create_vehicle,
        crate::api::handlers::list_vehicles,
        crate::api::handlers::get_vehicle,
        crate::api::handlers::update_vehicle,
        crate::api::handlers::delete_vehicle,
    ),
    components(schemas(
        Vehicle,
        CreateVehicleRequest,
        UpdateVehicleRequest,
        CreatedResponse,
        MessageResponse,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "vehicles", description = "Vehicle records"),
        (name = "meta", description = "Service information")
    )
)]
pub struct ApiDoc;
