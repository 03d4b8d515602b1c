use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_document_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub document_id: i64,
    pub product_code: Option<String>,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_discount: Decimal,
    pub line_subtotal: Decimal,
    pub line_tax: Decimal,
    pub line_total: Decimal,
    pub line_number: i32,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_document::Entity",
        from = "Column::DocumentId",
        to = "super::purchase_document::Column::Id"
    )]
    PurchaseDocument,
}

impl Related<super::purchase_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseDocument.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
