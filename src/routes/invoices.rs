use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, put},
};

use crate::{
    dto::invoices::{
        CreateInvoiceRequest, InvoiceList, UpdateInvoiceDetailRequest, UpdateInvoiceStatusRequest,
    },
    error::AppResult,
    models::Invoice,
    response::ApiResponse,
    routes::params::{Pagination, StatusQuery},
    services::invoice_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/{id}", get(get_invoice))
        .route("/{id}/status", patch(update_invoice_status))
        .route("/{id}/detail", put(update_invoice_detail))
}

#[utoipa::path(
    get,
    path = "/api/invoices",
    params(Pagination, StatusQuery),
    responses(
        (status = 200, description = "Invoices, newest issue date first", body = ApiResponse<InvoiceList>),
        (status = 400, description = "Unknown status"),
        (status = 500, description = "Stored line items are corrupt"),
    ),
    tag = "Invoices"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<ApiResponse<InvoiceList>>> {
    let resp = invoice_service::list_invoices(&state, pagination, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice computed, numbered and stored", body = ApiResponse<Invoice>),
        (status = 400, description = "Negative price or labor total"),
        (status = 404, description = "Diagnosis not found"),
        (status = 409, description = "Diagnosis already invoiced"),
    ),
    tag = "Invoices"
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Invoice>>)> {
    let resp = invoice_service::create_invoice(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    params(("id" = i32, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice", body = ApiResponse<Invoice>),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Stored line items are corrupt"),
    ),
    tag = "Invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Invoice>>> {
    let resp = invoice_service::get_invoice(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/invoices/{id}/status",
    params(("id" = i32, Path, description = "Invoice ID")),
    request_body = UpdateInvoiceStatusRequest,
    responses(
        (status = 200, description = "Updated invoice", body = ApiResponse<Invoice>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Invoices"
)]
pub async fn update_invoice_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateInvoiceStatusRequest>,
) -> AppResult<Json<ApiResponse<Invoice>>> {
    let resp = invoice_service::update_invoice_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/invoices/{id}/detail",
    params(("id" = i32, Path, description = "Invoice ID")),
    request_body = UpdateInvoiceDetailRequest,
    responses(
        (status = 200, description = "Line items replaced and totals recomputed", body = ApiResponse<Invoice>),
        (status = 400, description = "Negative price or labor total"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Invoices"
)]
pub async fn update_invoice_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateInvoiceDetailRequest>,
) -> AppResult<Json<ApiResponse<Invoice>>> {
    let resp = invoice_service::update_invoice_detail(&state, id, payload).await?;
    Ok(Json(resp))
}
