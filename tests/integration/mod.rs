//! Integration tests for the vehicle diagnostics API.
//!
//! Each test drives the full router against its own SQLite file.
//! Run with: cargo test --test integration

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use vehicle_diagnostics::api::{create_router, AppState};
use vehicle_diagnostics::storage::{SqliteVehicleStore, VehicleStore};

/// Router over a fresh database file. Keep the `TempDir` alive for the test.
fn test_app() -> (Router, Arc<SqliteVehicleStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteVehicleStore::open(dir.path().join("vehicle_data.db")).unwrap());
    let app = create_router(AppState::new(store.clone()));
    (app, store, dir)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn add(app: &Router, vehicle: Value) -> i64 {
    let (status, body) = call(app, Method::POST, "/add_vehicle", Some(vehicle)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn toyota_scenario() {
    let (app, _store, _dir) = test_app();

    let id = add(
        &app,
        json!({"make":"Toyota","model":"Corolla","year":2019,"mileage":30000,"error_code":"P0420"}),
    )
    .await;
    assert_eq!(id, 1);

    let (status, body) = call(&app, Method::GET, "/vehicles/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id":1,"make":"Toyota","model":"Corolla","year":2019,"mileage":30000,"error_code":"P0420"})
    );
}

#[tokio::test]
async fn omitted_error_code_is_null() {
    let (app, _store, _dir) = test_app();
    let id = add(&app, json!({"make":"Ford","model":"F150","year":2020,"mileage":1000})).await;

    let (_, body) = call(&app, Method::GET, &format!("/vehicles/{id}"), None).await;
    assert_eq!(body["error_code"], Value::Null);
}

#[tokio::test]
async fn each_missing_required_field_is_rejected() {
    let (app, store, _dir) = test_app();
    let complete = json!({"make":"Ford","model":"F150","year":2020,"mileage":1000});

    for field in ["make", "model", "year", "mileage"] {
        let mut body = complete.clone();
        body.as_object_mut().unwrap().remove(field);

        let (status, response) = call(&app, Method::POST, "/add_vehicle", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            json!({"error": format!("Missing required field: {field}")})
        );
    }

    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let (app, _store, _dir) = test_app();
    let id = add(&app, json!({"make":"Ford","model":"F150","year":2020,"mileage":1000})).await;
    let uri = format!("/vehicles/{id}");

    let (status, body) = call(&app, Method::PUT, &uri, Some(json!({"mileage": 2000}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Vehicle updated successfully!"}));

    let (_, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(
        body,
        json!({"id":id,"make":"Ford","model":"F150","year":2020,"mileage":2000,"error_code":null})
    );
}

#[tokio::test]
async fn explicit_null_clears_error_code_only() {
    let (app, _store, _dir) = test_app();
    let id = add(
        &app,
        json!({"make":"Honda","model":"Civic","year":2012,"mileage":150000,"error_code":"P0171"}),
    )
    .await;
    let uri = format!("/vehicles/{id}");

    let (status, _) = call(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"make": null, "error_code": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(body["make"], "Honda");
    assert_eq!(body["error_code"], Value::Null);
}

#[tokio::test]
async fn delete_is_final() {
    let (app, _store, _dir) = test_app();
    let id = add(&app, json!({"make":"Kia","model":"Rio","year":2018,"mileage":42000})).await;
    let uri = format!("/vehicles/{id}");

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Vehicle deleted successfully!"}));

    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": format!("Vehicle {id} not found")}));

    let (status, _) = call(&app, Method::PUT, &uri, Some(json!({"year": 2019}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_every_created_vehicle() {
    let (app, _store, _dir) = test_app();
    let mut ids = Vec::new();
    for (make, year) in [("Audi", 2010), ("BMW", 2011), ("Seat", 2012)] {
        ids.push(add(&app, json!({"make":make,"model":"X","year":year,"mileage":0})).await);
    }

    let (status, body) = call(&app, Method::GET, "/vehicles", None).await;
    assert_eq!(status, StatusCode::OK);

    let listed: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn records_survive_reopening_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vehicle_data.db");

    {
        let store = Arc::new(SqliteVehicleStore::open(&path).unwrap());
        let app = create_router(AppState::new(store));
        add(&app, json!({"make":"Volvo","model":"V70","year":2005,"mileage":310000})).await;
    }

    let reader = SqliteVehicleStore::open_read_only(&path).unwrap();
    let lines: Vec<String> = reader
        .list()
        .unwrap()
        .iter()
        .map(|v| v.summary_line())
        .collect();
    assert_eq!(
        lines,
        vec!["ID: 1, Make: Volvo, Model: V70, Year: 2005, Mileage: 310000, Error Code: None"]
    );
}
