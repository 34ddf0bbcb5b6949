use sea_orm::entity::prelude::*;

use super::enums::{AppointmentKind, AppointmentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub diagnosis_id: i32,
    pub technician_id: i32,
    pub scheduled_at: DateTimeWithTimeZone,
    /// Minutes.
    pub estimated_duration: i32,
    pub status: AppointmentStatus,
    pub kind: AppointmentKind,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::diagnoses::Entity",
        from = "Column::DiagnosisId",
        to = "super::diagnoses::Column::Id"
    )]
    Diagnoses,
    #[sea_orm(
        belongs_to = "super::technicians::Entity",
        from = "Column::TechnicianId",
        to = "super::technicians::Column::Id"
    )]
    Technicians,
}

impl Related<super::diagnoses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diagnoses.def()
    }
}

impl Related<super::technicians::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technicians.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
