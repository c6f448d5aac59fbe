//! HTTP API module for vehicle records, health, and metrics endpoints.

pub mod doc;
pub mod handlers;
pub mod routes;

pub use doc::ApiDoc;
pub use handlers::AppState;
pub use routes::create_router;
