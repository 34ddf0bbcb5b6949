use sea_orm::entity::prelude::*;

use super::enums::InvoiceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub invoice_number: String,
    #[sea_orm(unique)]
    pub diagnosis_id: i32,
    pub issue_date: DateTimeWithTimeZone,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub status: InvoiceStatus,
    #[sea_orm(column_type = "Decimal(None)")]
    pub parts_subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub parts_markup: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub labor_subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub tax: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub total: Decimal,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub parts_detail: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub labor_detail: Option<Json>,
    pub pdf_path: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::diagnoses::Entity",
        from = "Column::DiagnosisId",
        to = "super::diagnoses::Column::Id"
    )]
    Diagnoses,
}

impl Related<super::diagnoses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diagnoses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
