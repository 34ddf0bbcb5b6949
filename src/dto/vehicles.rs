use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    entity::enums::VehicleStatus,
    models::{Diagnosis, Vehicle},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    pub customer_id: i32,
    #[validate(length(min = 1, max = 50))]
    pub make: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[validate(length(min = 1, max = 20))]
    pub plate: String,
    #[validate(length(min = 1, max = 17))]
    pub vin: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub mileage: i32,
    #[serde(default)]
    pub status: VehicleStatus,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 50))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 20))]
    pub plate: Option<String>,
    #[validate(length(min = 1, max = 17))]
    pub vin: Option<String>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
    pub status: Option<VehicleStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleWithDiagnoses {
    pub vehicle: Vehicle,
    pub diagnoses: Vec<Diagnosis>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct VehicleList {
    #[schema(value_type = Vec<Vehicle>)]
    pub items: Vec<Vehicle>,
}
