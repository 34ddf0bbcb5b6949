use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use validator::Validate;

use crate::{
    audit,
    dto::vehicles::{CreateVehicleRequest, UpdateVehicleRequest, VehicleList, VehicleWithDiagnoses},
    entity::{
        Customers, Diagnoses, diagnoses,
        enums::{DiagnosisStatus, VehicleStatus},
        vehicles::{ActiveModel, Column, Entity as Vehicles, Model as VehicleModel},
    },
    error::{AppError, AppResult},
    models::Vehicle,
    response::{ApiResponse, Meta},
    routes::params::{Pagination, VehicleQuery, search_term, status_filter},
    services::{diagnosis_service, lookup},
    state::AppState,
};

pub async fn list_vehicles(
    state: &AppState,
    pagination: Pagination,
    query: VehicleQuery,
) -> AppResult<ApiResponse<VehicleList>> {
    let (page, limit, offset) = pagination.normalize()?;
    let mut condition = Condition::all();

    if let Some(pattern) = search_term(query.search.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Plate).ilike(pattern.clone()))
                .add(Expr::col(Column::Make).ilike(pattern.clone()))
                .add(Expr::col(Column::Model).ilike(pattern.clone()))
                .add(Expr::col(Column::Vin).ilike(pattern)),
        );
    }
    if let Some(customer_id) = query.customer_id {
        condition = condition.add(Column::CustomerId.eq(customer_id));
    }
    if let Some(status) = status_filter::<VehicleStatus>(query.status.as_deref())? {
        condition = condition.add(Column::Status.eq(status));
    }

    let finder = Vehicles::find()
        .filter(condition)
        .order_by_desc(Column::RegisteredAt)
        .order_by_desc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = project_vehicles(&state.orm, rows).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Vehicles", VehicleList { items }, Some(meta)))
}

pub async fn create_vehicle(
    state: &AppState,
    payload: CreateVehicleRequest,
) -> AppResult<ApiResponse<Vehicle>> {
    payload.validate()?;

    let customer = Customers::find_by_id(payload.customer_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Customer"))?;

    let plate = normalize_plate(&payload.plate);
    let vin = payload.vin.trim().to_uppercase();
    ensure_unique(state, Column::Plate, &plate, "plate", None).await?;
    ensure_unique(state, Column::Vin, &vin, "VIN", None).await?;

    let vehicle = ActiveModel {
        id: NotSet,
        customer_id: Set(customer.id),
        make: Set(payload.make),
        model: Set(payload.model),
        year: Set(payload.year),
        plate: Set(plate),
        vin: Set(vin),
        mileage: Set(payload.mileage),
        registered_at: Set(Utc::now().into()),
        status: Set(payload.status),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(vehicle_id = vehicle.id, customer_id = customer.id, "vehicle registered");

    let mut data = vehicle_from_entity(vehicle, None);
    data.customer_name = Some(customer.full_name);
    Ok(ApiResponse::success("Vehicle created", data, Some(Meta::empty())))
}

pub async fn get_vehicle(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<VehicleWithDiagnoses>> {
    let vehicle = find_vehicle(state, id).await?;

    let diagnoses = Diagnoses::find()
        .filter(diagnoses::Column::VehicleId.eq(id))
        .order_by_desc(diagnoses::Column::DiagnosedAt)
        .all(&state.orm)
        .await?;
    let diagnoses = diagnosis_service::project_diagnoses(&state.orm, diagnoses).await?;

    let vehicle = project_vehicles(&state.orm, vec![vehicle])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Vehicle"))?;

    Ok(ApiResponse::success(
        "Vehicle",
        VehicleWithDiagnoses { vehicle, diagnoses },
        None,
    ))
}

pub async fn update_vehicle(
    state: &AppState,
    id: i32,
    payload: UpdateVehicleRequest,
) -> AppResult<ApiResponse<Vehicle>> {
    payload.validate()?;
    let existing = find_vehicle(state, id).await?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(plate) = payload.plate.as_deref().map(normalize_plate) {
        if plate != existing.plate {
            ensure_unique(state, Column::Plate, &plate, "plate", Some(id)).await?;
            active.plate = Set(plate);
        }
    }
    if let Some(vin) = payload.vin.as_deref().map(|v| v.trim().to_uppercase()) {
        if vin != existing.vin {
            ensure_unique(state, Column::Vin, &vin, "VIN", Some(id)).await?;
            active.vin = Set(vin);
        }
    }
    if let Some(make) = payload.make {
        active.make = Set(make);
    }
    if let Some(model) = payload.model {
        active.model = Set(model);
    }
    if let Some(year) = payload.year {
        active.year = Set(year);
    }
    if let Some(mileage) = payload.mileage {
        active.mileage = Set(mileage);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }

    let vehicle = active.update(&state.orm).await?;
    let data = project_vehicles(&state.orm, vec![vehicle])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Vehicle"))?;

    Ok(ApiResponse::success("Updated", data, Some(Meta::empty())))
}

/// Marks the vehicle inactive. Refused while it has open diagnoses.
pub async fn deactivate_vehicle(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_vehicle(state, id).await?;

    let open = Diagnoses::find()
        .filter(diagnoses::Column::VehicleId.eq(id))
        .filter(diagnoses::Column::Status.is_in(DiagnosisStatus::OPEN))
        .count(&state.orm)
        .await?;
    if open > 0 {
        return Err(AppError::Conflict(format!(
            "vehicle has {open} open diagnosis(es)"
        )));
    }

    let mut active: ActiveModel = existing.into();
    active.status = Set(VehicleStatus::Inactive);
    active.update(&state.orm).await?;

    tracing::info!(vehicle_id = id, "vehicle deactivated");
    audit::record(
        &state.pool,
        "vehicle_deactivate",
        "vehicles",
        serde_json::json!({ "vehicle_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

/// Adds the owner's name and the latest diagnosis date to each vehicle.
pub async fn project_vehicles<C>(conn: &C, rows: Vec<VehicleModel>) -> AppResult<Vec<Vehicle>>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = rows.iter().map(|v| v.id).collect();
    let owners = lookup::customer_names(conn, rows.iter().map(|v| v.customer_id)).await?;
    let last_services = last_service_dates(conn, ids).await?;

    Ok(rows
        .into_iter()
        .map(|v| {
            let last = last_services.get(&v.id).copied();
            let owner = owners.get(&v.customer_id).cloned();
            let mut vehicle = vehicle_from_entity(v, last);
            vehicle.customer_name = owner;
            vehicle
        })
        .collect())
}

#[derive(Debug, FromQueryResult)]
struct LastService {
    vehicle_id: i32,
    last: Option<DateTimeWithTimeZone>,
}

async fn last_service_dates<C>(conn: &C, ids: Vec<i32>) -> AppResult<HashMap<i32, DateTime<Utc>>>
where
    C: ConnectionTrait,
{
    let rows = Diagnoses::find()
        .select_only()
        .column(diagnoses::Column::VehicleId)
        .column_as(diagnoses::Column::DiagnosedAt.max(), "last")
        .filter(diagnoses::Column::VehicleId.is_in(ids))
        .group_by(diagnoses::Column::VehicleId)
        .into_model::<LastService>()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| row.last.map(|at| (row.vehicle_id, at.with_timezone(&Utc))))
        .collect())
}

async fn find_vehicle(state: &AppState, id: i32) -> AppResult<VehicleModel> {
    Vehicles::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Vehicle"))
}

async fn ensure_unique(
    state: &AppState,
    column: Column,
    value: &str,
    label: &str,
    except: Option<i32>,
) -> AppResult<()> {
    let mut finder = Vehicles::find().filter(column.eq(value));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(&state.orm).await? > 0 {
        return Err(AppError::Conflict(format!(
            "a vehicle with {label} {value} already exists"
        )));
    }
    Ok(())
}

/// Plates are compared upper-cased and without surrounding whitespace.
fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

fn vehicle_from_entity(model: VehicleModel, last_service: Option<DateTime<Utc>>) -> Vehicle {
    Vehicle {
        id: model.id,
        customer_id: model.customer_id,
        customer_name: None,
        make: model.make,
        model: model.model,
        year: model.year,
        plate: model.plate,
        vin: model.vin,
        mileage: model.mileage,
        registered_at: model.registered_at.with_timezone(&Utc),
        status: model.status,
        last_service,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plates_are_normalized() {
        assert_eq!(normalize_plate(" 1234abc "), "1234ABC");
    }

    #[tokio::test]
    async fn projecting_no_vehicles_needs_no_queries() {
        let conn = sea_orm::DatabaseConnection::Disconnected;
        assert!(project_vehicles(&conn, Vec::new()).await.unwrap().is_empty());
    }
}
