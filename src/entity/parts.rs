use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub category: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub reference_price: Option<Decimal>,
    pub preferred_supplier_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::PreferredSupplierId",
        to = "super::suppliers::Column::Id"
    )]
    PreferredSupplier,
    #[sea_orm(has_many = "super::part_requests::Entity")]
    PartRequests,
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PreferredSupplier.def()
    }
}

impl Related<super::part_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
