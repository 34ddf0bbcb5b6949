use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    entity::enums::{AppointmentKind, AppointmentStatus},
    models::Appointment,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAppointmentRequest {
    pub diagnosis_id: i32,
    pub technician_id: i32,
    pub scheduled_at: DateTime<Utc>,
    /// Minutes.
    #[validate(range(min = 1))]
    pub estimated_duration: i32,
    #[serde(default)]
    pub kind: AppointmentKind,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AppointmentList {
    #[schema(value_type = Vec<Appointment>)]
    pub items: Vec<Appointment>,
}
