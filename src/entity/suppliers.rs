use sea_orm::entity::prelude::*;

use super::enums::SupplierKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub kind: SupplierKind,
    pub active: bool,
    pub avg_response_time: Option<String>,
    pub registered_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::part_quotes::Entity")]
    PartQuotes,
}

impl Related<super::part_quotes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartQuotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
