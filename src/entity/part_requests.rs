use sea_orm::entity::prelude::*;

use super::enums::PartRequestStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "part_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub diagnosis_id: i32,
    pub part_id: i32,
    pub quantity: i32,
    pub status: PartRequestStatus,
    pub requested_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub best_offer_price: Option<Decimal>,
    pub selected_supplier_id: Option<i32>,
    pub delivery_time: Option<String>,
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
        belongs_to = "super::parts::Entity",
        from = "Column::PartId",
        to = "super::parts::Column::Id"
    )]
    Parts,
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::SelectedSupplierId",
        to = "super::suppliers::Column::Id"
    )]
    SelectedSupplier,
    #[sea_orm(has_many = "super::part_quotes::Entity")]
    PartQuotes,
}

impl Related<super::diagnoses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diagnoses.def()
    }
}

impl Related<super::parts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parts.def()
    }
}

impl Related<super::part_quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartQuotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
