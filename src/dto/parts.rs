use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    entity::enums::PartRequestStatus,
    models::{Part, PartRequest},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePartRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub reference_price: Option<Decimal>,
    pub preferred_supplier_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePartRequestRequest {
    pub diagnosis_id: i32,
    pub part_id: i32,
    #[serde(default = "one")]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

fn one() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePartRequestStatusRequest {
    pub status: PartRequestStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuoteRequest {
    pub supplier_id: i32,
    pub price: Decimal,
    #[validate(length(max = 50))]
    pub delivery_time: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PartList {
    #[schema(value_type = Vec<Part>)]
    pub items: Vec<Part>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PartRequestList {
    #[schema(value_type = Vec<PartRequest>)]
    pub items: Vec<PartRequest>,
}
