use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};

use crate::{
    dto::parts::{
        CreatePartRequest, CreatePartRequestRequest, CreateQuoteRequest, PartList,
        PartRequestList, UpdatePartRequestStatusRequest,
    },
    error::AppResult,
    models::{Part, PartRequest},
    response::ApiResponse,
    routes::params::{Pagination, StatusQuery},
    services::parts_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parts).post(create_part))
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/{id}/status", patch(update_request_status))
        .route("/requests/{id}/quotes", post(add_quote))
}

#[utoipa::path(
    get,
    path = "/api/parts",
    params(Pagination),
    responses(
        (status = 200, description = "Part catalog", body = ApiResponse<PartList>),
    ),
    tag = "Parts"
)]
pub async fn list_parts(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PartList>>> {
    let resp = parts_service::list_parts(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/parts",
    request_body = CreatePartRequest,
    responses(
        (status = 201, description = "Part added to the catalog", body = ApiResponse<Part>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Preferred supplier not found"),
    ),
    tag = "Parts"
)]
pub async fn create_part(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Part>>)> {
    let resp = parts_service::create_part(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/parts/requests",
    params(Pagination, StatusQuery),
    responses(
        (status = 200, description = "Part requests with their quotes", body = ApiResponse<PartRequestList>),
        (status = 400, description = "Unknown status"),
    ),
    tag = "Parts"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<ApiResponse<PartRequestList>>> {
    let resp = parts_service::list_requests(&state, pagination, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/parts/requests",
    request_body = CreatePartRequestRequest,
    responses(
        (status = 201, description = "Part requested", body = ApiResponse<PartRequest>),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Diagnosis or part not found"),
    ),
    tag = "Parts"
)]
pub async fn create_request(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartRequestRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PartRequest>>)> {
    let resp = parts_service::create_request(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/parts/requests/{id}/status",
    params(("id" = i32, Path, description = "Part request ID")),
    request_body = UpdatePartRequestStatusRequest,
    responses(
        (status = 200, description = "Updated part request", body = ApiResponse<PartRequest>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Parts"
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePartRequestStatusRequest>,
) -> AppResult<Json<ApiResponse<PartRequest>>> {
    let resp = parts_service::update_request_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/parts/requests/{id}/quotes",
    params(("id" = i32, Path, description = "Part request ID")),
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote recorded", body = ApiResponse<PartRequest>),
        (status = 400, description = "Price must be positive"),
        (status = 404, description = "Part request or supplier not found"),
    ),
    tag = "Parts"
)]
pub async fn add_quote(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateQuoteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PartRequest>>)> {
    let resp = parts_service::add_quote(&state, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
