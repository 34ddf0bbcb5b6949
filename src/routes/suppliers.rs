use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::suppliers::{CreateSupplierRequest, SupplierList},
    error::AppResult,
    models::Supplier,
    response::ApiResponse,
    routes::params::Pagination,
    services::supplier_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_suppliers).post(create_supplier))
}

#[utoipa::path(
    get,
    path = "/api/suppliers",
    params(Pagination),
    responses(
        (status = 200, description = "Suppliers with quote and order counts", body = ApiResponse<SupplierList>),
    ),
    tag = "Suppliers"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<SupplierList>>> {
    let resp = supplier_service::list_suppliers(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = ApiResponse<Supplier>),
        (status = 400, description = "Invalid input"),
    ),
    tag = "Suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Supplier>>)> {
    let resp = supplier_service::create_supplier(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
