use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::appointments::{AppointmentList, CreateAppointmentRequest, UpdateAppointmentStatusRequest},
    error::AppResult,
    models::Appointment,
    response::ApiResponse,
    routes::params::{AppointmentQuery, Pagination},
    services::appointment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route("/{id}/status", patch(update_appointment_status))
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(Pagination, AppointmentQuery),
    responses(
        (status = 200, description = "Appointments, latest slot first", body = ApiResponse<AppointmentList>),
        (status = 400, description = "Unknown status"),
    ),
    tag = "Appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<ApiResponse<AppointmentList>>> {
    let resp = appointment_service::list_appointments(&state, pagination, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment scheduled", body = ApiResponse<Appointment>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Diagnosis or technician not found"),
    ),
    tag = "Appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Appointment>>)> {
    let resp = appointment_service::create_appointment(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    params(("id" = i32, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentStatusRequest,
    responses(
        (status = 200, description = "Updated appointment", body = ApiResponse<Appointment>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Appointments"
)]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAppointmentStatusRequest>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let resp = appointment_service::update_appointment_status(&state, id, payload).await?;
    Ok(Json(resp))
}
