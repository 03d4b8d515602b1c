use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier master record. `tax_id` is the natural key used when
/// reconciling document issuers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub supplier_code: String,
    #[sea_orm(unique)]
    pub tax_id: String,
    pub name: String,
    pub legal_name: Option<String>,
    pub business_activity: Option<String>,
    pub activity_code_1: Option<String>,
    pub activity_code_2: Option<String>,
    pub activity_code_3: Option<String>,
    pub activity_code_4: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::supplier_address::Entity")]
    SupplierAddresses,
    #[sea_orm(has_many = "super::purchase_document::Entity")]
    PurchaseDocuments,
}

impl Related<super::supplier_address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierAddresses.def()
    }
}

impl Related<super::purchase_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
