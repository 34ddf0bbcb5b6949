use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::diagnoses::{CreateDiagnosisRequest, DiagnosisList, UpdateDiagnosisRequest},
    error::AppResult,
    models::Diagnosis,
    response::ApiResponse,
    routes::params::{DiagnosisQuery, Pagination},
    services::diagnosis_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_diagnoses).post(create_diagnosis))
        .route("/{id}", get(get_diagnosis).put(update_diagnosis))
}

#[utoipa::path(
    get,
    path = "/api/diagnoses",
    params(Pagination, DiagnosisQuery),
    responses(
        (status = 200, description = "List diagnoses, newest first", body = ApiResponse<DiagnosisList>),
        (status = 400, description = "Unknown status"),
    ),
    tag = "Diagnoses"
)]
pub async fn list_diagnoses(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<DiagnosisQuery>,
) -> AppResult<Json<ApiResponse<DiagnosisList>>> {
    let resp = diagnosis_service::list_diagnoses(&state, pagination, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/diagnoses",
    request_body = CreateDiagnosisRequest,
    responses(
        (status = 201, description = "Diagnosis opened", body = ApiResponse<Diagnosis>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Vehicle or technician not found"),
    ),
    tag = "Diagnoses"
)]
pub async fn create_diagnosis(
    State(state): State<AppState>,
    Json(payload): Json<CreateDiagnosisRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Diagnosis>>)> {
    let resp = diagnosis_service::create_diagnosis(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/diagnoses/{id}",
    params(("id" = i32, Path, description = "Diagnosis ID")),
    responses(
        (status = 200, description = "Diagnosis", body = ApiResponse<Diagnosis>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Diagnoses"
)]
pub async fn get_diagnosis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Diagnosis>>> {
    let resp = diagnosis_service::get_diagnosis(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/diagnoses/{id}",
    params(("id" = i32, Path, description = "Diagnosis ID")),
    request_body = UpdateDiagnosisRequest,
    responses(
        (status = 200, description = "Updated diagnosis", body = ApiResponse<Diagnosis>),
        (status = 400, description = "Missing status"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Diagnoses"
)]
pub async fn update_diagnosis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDiagnosisRequest>,
) -> AppResult<Json<ApiResponse<Diagnosis>>> {
    let resp = diagnosis_service::update_diagnosis(&state, id, payload).await?;
    Ok(Json(resp))
}
