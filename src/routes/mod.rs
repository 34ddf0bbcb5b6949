use axum::{Json, Router, http::{StatusCode, Uri}};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod appointments;
pub mod customers;
pub mod dashboard;
pub mod diagnoses;
pub mod doc;
pub mod health;
pub mod invoices;
pub mod params;
pub mod parts;
pub mod suppliers;
pub mod technicians;
pub mod vehicles;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/customers", customers::router())
        .nest("/vehicles", vehicles::router())
        .nest("/technicians", technicians::router())
        .nest("/diagnoses", diagnoses::router())
        .nest("/parts", parts::router())
        .nest("/suppliers", suppliers::router())
        .nest("/appointments", appointments::router())
        .nest("/invoices", invoices::router())
        .nest("/dashboard", dashboard::router())
        .fallback(api_not_found)
}

/// Unknown `/api/*` paths answer with JSON instead of the frontend shell.
pub async fn api_not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
