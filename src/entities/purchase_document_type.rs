use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase-document type catalog, keyed by the tax-authority DTE code
/// (33 invoice, 34 exempt invoice, 46 purchase invoice, ...).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_document_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub dte_code: String,
    pub description: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase_document::Entity")]
    PurchaseDocuments,
}

impl Related<super::purchase_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
