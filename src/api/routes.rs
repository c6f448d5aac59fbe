//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::doc::ApiDoc;
use super::handlers::{
    create_vehicle, delete_vehicle, get_vehicle, health, index, list_vehicles, render_metrics,
    update_vehicle, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        // Vehicle records
        .route("/add_vehicle", post(create_vehicle))
        .route("/vehicles", get(list_vehicles))
        .route(
            "/vehicles/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        // Operational endpoints
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
