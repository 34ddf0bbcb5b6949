use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::technicians::{CreateTechnicianRequest, TechnicianList},
    error::AppResult,
    models::Technician,
    response::ApiResponse,
    routes::params::Pagination,
    services::technician_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_technicians).post(create_technician))
        .route("/{id}", get(get_technician))
}

#[utoipa::path(
    get,
    path = "/api/technicians",
    params(Pagination),
    responses(
        (status = 200, description = "Active technicians", body = ApiResponse<TechnicianList>),
    ),
    tag = "Technicians"
)]
pub async fn list_technicians(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TechnicianList>>> {
    let resp = technician_service::list_technicians(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/technicians",
    request_body = CreateTechnicianRequest,
    responses(
        (status = 201, description = "Technician created", body = ApiResponse<Technician>),
        (status = 400, description = "Invalid input"),
    ),
    tag = "Technicians"
)]
pub async fn create_technician(
    State(state): State<AppState>,
    Json(payload): Json<CreateTechnicianRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Technician>>)> {
    let resp = technician_service::create_technician(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/technicians/{id}",
    params(("id" = i32, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Technician", body = ApiResponse<Technician>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Technicians"
)]
pub async fn get_technician(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Technician>>> {
    let resp = technician_service::get_technician(&state, id).await?;
    Ok(Json(resp))
}
