use sea_orm::entity::prelude::*;

use super::enums::VehicleStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[sea_orm(unique)]
    pub plate: String,
    #[sea_orm(unique)]
    pub vin: String,
    pub mileage: i32,
    pub registered_at: DateTimeWithTimeZone,
    pub status: VehicleStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(has_many = "super::diagnoses::Entity")]
    Diagnoses,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::diagnoses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diagnoses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Short label used wherever a vehicle is referenced, e.g. `Seat León - 4567DEF`.
    pub fn label(&self) -> String {
        format!("{} {} - {}", self.make, self.model, self.plate)
    }
}
