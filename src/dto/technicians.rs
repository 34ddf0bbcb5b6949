use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Technician;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTechnicianRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub hourly_rate: Decimal,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct TechnicianList {
    #[schema(value_type = Vec<Technician>)]
    pub items: Vec<Technician>,
}
