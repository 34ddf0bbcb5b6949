use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use validator::Validate;

use crate::{
    dto::technicians::{CreateTechnicianRequest, TechnicianList},
    entity::{
        Diagnoses, diagnoses,
        enums::DiagnosisStatus,
        technicians::{ActiveModel, Column, Entity as Technicians, Model as TechnicianModel},
    },
    error::{AppError, AppResult},
    models::Technician,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::lookup,
    state::AppState,
};

/// Active technicians only, by name.
pub async fn list_technicians(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<TechnicianList>> {
    let (page, limit, offset) = pagination.normalize()?;

    let finder = Technicians::find()
        .filter(Column::Active.eq(true))
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<i32> = rows.iter().map(|t| t.id).collect();
    let open = if ids.is_empty() {
        Default::default()
    } else {
        lookup::counts_by(
            &state.orm,
            Diagnoses::find()
                .filter(diagnoses::Column::TechnicianId.is_in(ids))
                .filter(diagnoses::Column::Status.is_in(DiagnosisStatus::OPEN)),
            diagnoses::Column::TechnicianId,
        )
        .await?
    };

    let items = rows
        .into_iter()
        .map(|t| {
            let count = open.get(&t.id).copied().unwrap_or(0);
            technician_from_entity(t, count)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Technicians", TechnicianList { items }, Some(meta)))
}

pub async fn create_technician(
    state: &AppState,
    payload: CreateTechnicianRequest,
) -> AppResult<ApiResponse<Technician>> {
    payload.validate()?;
    if payload.hourly_rate.is_sign_negative() {
        return Err(AppError::BadRequest("hourly_rate must not be negative".into()));
    }

    let specialties: Vec<String> = payload
        .specialties
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let technician = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        phone: Set(payload.phone),
        email: Set(payload.email),
        specialties: Set(serde_json::json!(specialties)),
        hourly_rate: Set(payload.hourly_rate),
        active: Set(true),
        registered_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(technician_id = technician.id, "technician created");

    Ok(ApiResponse::success(
        "Technician created",
        technician_from_entity(technician, 0),
        Some(Meta::empty()),
    ))
}

pub async fn get_technician(state: &AppState, id: i32) -> AppResult<ApiResponse<Technician>> {
    let technician = Technicians::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Technician"))?;

    let open = Diagnoses::find()
        .filter(diagnoses::Column::TechnicianId.eq(id))
        .filter(diagnoses::Column::Status.is_in(DiagnosisStatus::OPEN))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::success(
        "Technician",
        technician_from_entity(technician, open),
        None,
    ))
}

/// Stored specialties that are not a list of strings read as empty.
fn specialties_of(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn technician_from_entity(model: TechnicianModel, active_diagnoses: i64) -> Technician {
    Technician {
        id: model.id,
        specialties: specialties_of(&model.specialties),
        name: model.name,
        phone: model.phone,
        email: model.email,
        hourly_rate: model.hourly_rate,
        active: model.active,
        registered_at: model.registered_at.with_timezone(&Utc),
        active_diagnoses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_specialties_list() {
        assert_eq!(
            specialties_of(&json!(["engine", "brakes"])),
            vec!["engine".to_string(), "brakes".to_string()]
        );
        assert!(specialties_of(&json!(null)).is_empty());
        assert!(specialties_of(&json!("engine")).is_empty());
    }
}
