use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use validator::Validate;

use crate::{
    audit,
    dto::diagnoses::{CreateDiagnosisRequest, DiagnosisList, UpdateDiagnosisRequest},
    entity::{
        PartRequests, Technicians, Vehicles,
        diagnoses::{ActiveModel, Column, Entity as Diagnoses, Model as DiagnosisModel, Relation},
        enums::DiagnosisStatus,
        part_requests, vehicles,
    },
    error::{AppError, AppResult},
    models::Diagnosis,
    response::{ApiResponse, Meta},
    routes::params::{DiagnosisQuery, Pagination, search_term, status_filter},
    services::lookup,
    state::AppState,
};

pub async fn list_diagnoses(
    state: &AppState,
    pagination: Pagination,
    query: DiagnosisQuery,
) -> AppResult<ApiResponse<DiagnosisList>> {
    let (page, limit, offset) = pagination.normalize()?;
    let mut condition = Condition::all();

    if let Some(pattern) = search_term(query.search.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Diagnoses, Column::FaultDescription)).ilike(pattern.clone()))
                .add(Expr::col((Vehicles, vehicles::Column::Plate)).ilike(pattern)),
        );
    }
    if let Some(status) = status_filter::<DiagnosisStatus>(query.status.as_deref())? {
        condition = condition.add(Column::Status.eq(status));
    }

    let finder = Diagnoses::find()
        .join(JoinType::InnerJoin, Relation::Vehicles.def())
        .filter(condition)
        .order_by_desc(Column::DiagnosedAt)
        .order_by_desc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = project_diagnoses(&state.orm, rows).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Diagnoses", DiagnosisList { items }, Some(meta)))
}

pub async fn create_diagnosis(
    state: &AppState,
    payload: CreateDiagnosisRequest,
) -> AppResult<ApiResponse<Diagnosis>> {
    payload.validate()?;
    if payload.estimated_cost.is_sign_negative() {
        return Err(AppError::BadRequest("estimated_cost must not be negative".into()));
    }

    Vehicles::find_by_id(payload.vehicle_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Vehicle"))?;
    Technicians::find_by_id(payload.technician_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Technician"))?;

    let diagnosed_at = payload.diagnosed_at.unwrap_or_else(Utc::now);
    let diagnosis = ActiveModel {
        id: NotSet,
        vehicle_id: Set(payload.vehicle_id),
        technician_id: Set(payload.technician_id),
        fault_description: Set(payload.fault_description),
        diagnosed_at: Set(diagnosed_at.into()),
        status: Set(payload.status),
        priority: Set(payload.priority),
        estimated_time: Set(payload.estimated_time),
        notes: Set(payload.notes),
        estimated_cost: Set(payload.estimated_cost),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(
        diagnosis_id = diagnosis.id,
        vehicle_id = diagnosis.vehicle_id,
        "diagnosis opened"
    );

    let data = single(&state.orm, diagnosis).await?;
    Ok(ApiResponse::success("Diagnosis created", data, Some(Meta::empty())))
}

pub async fn get_diagnosis(state: &AppState, id: i32) -> AppResult<ApiResponse<Diagnosis>> {
    let diagnosis = Diagnoses::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Diagnosis"))?;
    let data = single(&state.orm, diagnosis).await?;
    Ok(ApiResponse::success("Diagnosis", data, None))
}

pub async fn update_diagnosis(
    state: &AppState,
    id: i32,
    payload: UpdateDiagnosisRequest,
) -> AppResult<ApiResponse<Diagnosis>> {
    let Some(status) = payload.status else {
        return Err(AppError::BadRequest("status is required".into()));
    };

    let existing = Diagnoses::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Diagnosis"))?;
    let previous = existing.status;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    let diagnosis = active.update(&state.orm).await?;

    tracing::info!(diagnosis_id = id, from = %previous, to = %status, "diagnosis status changed");
    audit::record(
        &state.pool,
        "diagnosis_status",
        "diagnoses",
        serde_json::json!({ "diagnosis_id": id, "from": previous, "to": status }),
    )
    .await;

    let data = single(&state.orm, diagnosis).await?;
    Ok(ApiResponse::success("Updated", data, Some(Meta::empty())))
}

async fn single<C>(conn: &C, model: DiagnosisModel) -> AppResult<Diagnosis>
where
    C: ConnectionTrait,
{
    project_diagnoses(conn, vec![model])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Diagnosis"))
}

/// Adds vehicle, customer and technician names plus the requested part
/// names to each diagnosis.
pub async fn project_diagnoses<C>(
    conn: &C,
    rows: Vec<DiagnosisModel>,
) -> AppResult<Vec<Diagnosis>>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let owners = lookup::vehicle_owners(conn, rows.iter().map(|d| d.vehicle_id)).await?;
    let technicians = lookup::technician_names(conn, rows.iter().map(|d| d.technician_id)).await?;
    let parts = required_parts(conn, rows.iter().map(|d| d.id).collect()).await?;

    Ok(rows
        .into_iter()
        .map(|d| {
            let owner = owners.get(&d.vehicle_id);
            Diagnosis {
                id: d.id,
                vehicle_id: d.vehicle_id,
                vehicle_info: owner.map(|o| o.vehicle_info.clone()),
                customer_name: owner.and_then(|o| o.customer_name()),
                technician_id: d.technician_id,
                technician_name: technicians.get(&d.technician_id).cloned(),
                fault_description: d.fault_description,
                diagnosed_at: d.diagnosed_at.with_timezone(&Utc),
                status: d.status,
                priority: d.priority,
                estimated_time: d.estimated_time,
                notes: d.notes,
                estimated_cost: d.estimated_cost,
                required_parts: parts.get(&d.id).cloned().unwrap_or_default(),
            }
        })
        .collect())
}

async fn required_parts<C>(conn: &C, ids: Vec<i32>) -> AppResult<HashMap<i32, Vec<String>>>
where
    C: ConnectionTrait,
{
    let requests = PartRequests::find()
        .filter(part_requests::Column::DiagnosisId.is_in(ids))
        .order_by_asc(part_requests::Column::Id)
        .all(conn)
        .await?;
    let names = lookup::part_names(conn, requests.iter().map(|r| r.part_id)).await?;

    let mut by_diagnosis: HashMap<i32, Vec<String>> = HashMap::new();
    for request in requests {
        if let Some(name) = names.get(&request.part_id) {
            by_diagnosis
                .entry(request.diagnosis_id)
                .or_default()
                .push(name.clone());
        }
    }
    Ok(by_diagnosis)
}
