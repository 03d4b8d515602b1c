use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cross-document reference carried by a purchase document (e.g. a credit
/// note pointing at the invoice it amends). `reference_code` is nullable;
/// empty source values are stored as NULL.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_document_references")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub document_id: i64,
    pub line_number: i32,
    pub referenced_document_type: Option<String>,
    pub referenced_folio: Option<String>,
    pub referenced_date: Option<NaiveDate>,
    pub reference_code: Option<String>,
    pub reason: Option<String>,
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
