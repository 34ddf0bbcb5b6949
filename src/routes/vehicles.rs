use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::vehicles::{CreateVehicleRequest, UpdateVehicleRequest, VehicleList, VehicleWithDiagnoses},
    error::AppResult,
    models::Vehicle,
    response::ApiResponse,
    routes::params::{Pagination, VehicleQuery},
    services::vehicle_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route(
            "/{id}",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

#[utoipa::path(
    get,
    path = "/api/vehicles",
    params(Pagination, VehicleQuery),
    responses(
        (status = 200, description = "List vehicles", body = ApiResponse<VehicleList>),
        (status = 400, description = "Unknown status"),
    ),
    tag = "Vehicles"
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<VehicleQuery>,
) -> AppResult<Json<ApiResponse<VehicleList>>> {
    let resp = vehicle_service::list_vehicles(&state, pagination, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = ApiResponse<Vehicle>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Plate or VIN already registered"),
    ),
    tag = "Vehicles"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(payload): Json<CreateVehicleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vehicle>>)> {
    let resp = vehicle_service::create_vehicle(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle with diagnoses", body = ApiResponse<VehicleWithDiagnoses>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Vehicles"
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<VehicleWithDiagnoses>>> {
    let resp = vehicle_service::get_vehicle(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    params(("id" = i32, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Updated vehicle", body = ApiResponse<Vehicle>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Plate or VIN already registered"),
    ),
    tag = "Vehicles"
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateVehicleRequest>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let resp = vehicle_service::update_vehicle(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle deactivated"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Vehicle has open diagnoses"),
    ),
    tag = "Vehicles"
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = vehicle_service::deactivate_vehicle(&state, id).await?;
    Ok(Json(resp))
}
