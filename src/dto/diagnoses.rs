use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    entity::enums::{DiagnosisStatus, Priority},
    models::Diagnosis,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDiagnosisRequest {
    pub vehicle_id: i32,
    pub technician_id: i32,
    #[validate(length(min = 1))]
    pub fault_description: String,
    /// Defaults to now.
    pub diagnosed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: DiagnosisStatus,
    #[serde(default)]
    pub priority: Priority,
    #[validate(length(max = 50))]
    pub estimated_time: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub estimated_cost: Decimal,
}

/// `status` is optional on the wire so a missing value can be answered with 400.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDiagnosisRequest {
    pub status: Option<DiagnosisStatus>,
    pub notes: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct DiagnosisList {
    #[schema(value_type = Vec<Diagnosis>)]
    pub items: Vec<Diagnosis>,
}
