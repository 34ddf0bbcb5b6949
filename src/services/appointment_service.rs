use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use validator::Validate;

use crate::{
    audit,
    dto::appointments::{AppointmentList, CreateAppointmentRequest, UpdateAppointmentStatusRequest},
    entity::{
        Diagnoses, Technicians,
        appointments::{ActiveModel, Column, Entity as Appointments, Model as AppointmentModel},
        diagnoses,
        enums::AppointmentStatus,
    },
    error::{AppError, AppResult},
    models::Appointment,
    response::{ApiResponse, Meta},
    routes::params::{AppointmentQuery, Pagination, status_filter},
    services::lookup,
    state::AppState,
};

pub async fn list_appointments(
    state: &AppState,
    pagination: Pagination,
    query: AppointmentQuery,
) -> AppResult<ApiResponse<AppointmentList>> {
    let (page, limit, offset) = pagination.normalize()?;
    let mut condition = Condition::all();
    if let Some(status) = status_filter::<AppointmentStatus>(query.status.as_deref())? {
        condition = condition.add(Column::Status.eq(status));
    }
    if let Some(technician_id) = query.technician_id {
        condition = condition.add(Column::TechnicianId.eq(technician_id));
    }

    let finder = Appointments::find()
        .filter(condition)
        .order_by_desc(Column::ScheduledAt)
        .order_by_desc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = project_appointments(&state.orm, rows).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Appointments", AppointmentList { items }, Some(meta)))
}

pub async fn create_appointment(
    state: &AppState,
    payload: CreateAppointmentRequest,
) -> AppResult<ApiResponse<Appointment>> {
    payload.validate()?;

    Diagnoses::find_by_id(payload.diagnosis_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Diagnosis"))?;
    Technicians::find_by_id(payload.technician_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Technician"))?;

    let appointment = ActiveModel {
        id: NotSet,
        diagnosis_id: Set(payload.diagnosis_id),
        technician_id: Set(payload.technician_id),
        scheduled_at: Set(payload.scheduled_at.into()),
        estimated_duration: Set(payload.estimated_duration),
        status: Set(AppointmentStatus::Scheduled),
        kind: Set(payload.kind),
        notes: Set(payload.notes),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(
        appointment_id = appointment.id,
        technician_id = appointment.technician_id,
        scheduled_at = %appointment.scheduled_at,
        "appointment scheduled"
    );

    let data = single(&state.orm, appointment).await?;
    Ok(ApiResponse::success("Appointment created", data, Some(Meta::empty())))
}

pub async fn update_appointment_status(
    state: &AppState,
    id: i32,
    payload: UpdateAppointmentStatusRequest,
) -> AppResult<ApiResponse<Appointment>> {
    let existing = Appointments::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Appointment"))?;
    let previous = existing.status;

    let mut active: ActiveModel = existing.into();
    active.status = Set(payload.status);
    let appointment = active.update(&state.orm).await?;

    tracing::info!(appointment_id = id, from = %previous, to = %payload.status, "appointment status changed");
    audit::record(
        &state.pool,
        "appointment_status",
        "appointments",
        serde_json::json!({ "appointment_id": id, "from": previous, "to": payload.status }),
    )
    .await;

    let data = single(&state.orm, appointment).await?;
    Ok(ApiResponse::success("Updated", data, Some(Meta::empty())))
}

async fn single<C>(conn: &C, model: AppointmentModel) -> AppResult<Appointment>
where
    C: ConnectionTrait,
{
    project_appointments(conn, vec![model])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Appointment"))
}

async fn project_appointments<C>(
    conn: &C,
    rows: Vec<AppointmentModel>,
) -> AppResult<Vec<Appointment>>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let diagnosis_ids: Vec<i32> = rows.iter().map(|a| a.diagnosis_id).collect();
    let diagnoses: HashMap<i32, diagnoses::Model> = Diagnoses::find()
        .filter(diagnoses::Column::Id.is_in(diagnosis_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();
    let owners = lookup::vehicle_owners(conn, diagnoses.values().map(|d| d.vehicle_id)).await?;
    let technicians = lookup::technician_names(conn, rows.iter().map(|a| a.technician_id)).await?;

    Ok(rows
        .into_iter()
        .map(|a| {
            let diagnosis = diagnoses.get(&a.diagnosis_id);
            let owner = diagnosis.and_then(|d| owners.get(&d.vehicle_id));
            let scheduled_at = a.scheduled_at.with_timezone(&Utc);
            Appointment {
                id: a.id,
                diagnosis_id: a.diagnosis_id,
                vehicle_info: owner.map(|o| o.vehicle_info.clone()),
                customer_name: owner.and_then(|o| o.customer_name()),
                technician_id: a.technician_id,
                technician_name: technicians.get(&a.technician_id).cloned(),
                scheduled_at,
                date: scheduled_at.date_naive(),
                start_time: clock(scheduled_at),
                end_time: clock(ends_at(scheduled_at, a.estimated_duration)),
                estimated_duration: a.estimated_duration,
                duration_label: duration_label(a.estimated_duration),
                status: a.status,
                kind: a.kind,
                description: diagnosis.map(|d| d.fault_description.clone()),
                notes: a.notes,
                created_at: a.created_at.with_timezone(&Utc),
            }
        })
        .collect())
}

pub fn ends_at(start: DateTime<Utc>, minutes: i32) -> DateTime<Utc> {
    start + Duration::minutes(i64::from(minutes))
}

/// `HH:MM` on a 24 hour clock.
pub fn clock(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

/// `90` -> `1h 30m`, `45` -> `0h 45m`.
pub fn duration_label(minutes: i32) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn end_time_adds_the_duration() {
        let start = Utc.with_ymd_and_hms(2024, 3, 14, 9, 30, 0).unwrap();
        assert_eq!(clock(start), "09:30");
        assert_eq!(clock(ends_at(start, 150)), "12:00");
    }

    #[test]
    fn end_time_can_cross_midnight() {
        let start = Utc.with_ymd_and_hms(2024, 3, 14, 23, 15, 0).unwrap();
        let end = ends_at(start, 60);
        assert_eq!(clock(end), "00:15");
        assert_eq!(end.date_naive().to_string(), "2024-03-15");
    }

    #[test]
    fn labels_hours_and_minutes() {
        assert_eq!(duration_label(90), "1h 30m");
        assert_eq!(duration_label(45), "0h 45m");
        assert_eq!(duration_label(120), "2h 0m");
        assert_eq!(duration_label(-5), "0h 0m");
    }
}
