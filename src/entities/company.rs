use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Receiving company. Looked up by tax id during ingestion; never created
/// by the ingestion pipeline.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub tax_id: String,
    pub legal_name: String,
    pub trade_name: Option<String>,
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
