use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::{DashboardStats, DiagnosisStats, RecentActivity, RevenueChart},
    error::AppResult,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/revenue-chart", get(revenue_chart))
        .route("/diagnosis-stats", get(diagnosis_stats))
        .route("/recent-activity", get(recent_activity))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Headline workshop figures", body = ApiResponse<DashboardStats>),
    ),
    tag = "Dashboard"
)]
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = dashboard_service::stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/revenue-chart",
    responses(
        (status = 200, description = "Paid revenue for the last six months", body = ApiResponse<RevenueChart>),
    ),
    tag = "Dashboard"
)]
pub async fn revenue_chart(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<RevenueChart>>> {
    let resp = dashboard_service::revenue_chart(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/diagnosis-stats",
    responses(
        (status = 200, description = "Diagnosis counts by status", body = ApiResponse<DiagnosisStats>),
    ),
    tag = "Dashboard"
)]
pub async fn diagnosis_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DiagnosisStats>>> {
    let resp = dashboard_service::diagnosis_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/recent-activity",
    responses(
        (status = 200, description = "Latest diagnoses, appointments and invoices", body = ApiResponse<RecentActivity>),
    ),
    tag = "Dashboard"
)]
pub async fn recent_activity(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<RecentActivity>>> {
    let resp = dashboard_service::recent_activity(&state).await?;
    Ok(Json(resp))
}
