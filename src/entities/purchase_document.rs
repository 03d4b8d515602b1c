use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase-document aggregate root. Detail and reference rows are written
/// and deleted only together with their parent. `status` starts at
/// "PENDING"; downstream warehouse operations move it onward.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub supplier_id: i64,
    pub company_id: Option<i64>,
    pub document_type_id: Option<i64>,
    pub document_number: String,
    pub folio: String,
    pub document_date: Option<NaiveDate>,
    pub issuer_tax_id: String,
    pub receiver_tax_id: Option<String>,
    pub observations: Option<String>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub discount_total: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub exchange_rate: Decimal,
    #[sea_orm(column_type = "Text")]
    pub raw_xml: String,
    pub status: String,
    pub warehouse_available: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::purchase_document_type::Entity",
        from = "Column::DocumentTypeId",
        to = "super::purchase_document_type::Column::Id"
    )]
    DocumentType,
    #[sea_orm(has_many = "super::purchase_document_detail::Entity")]
    Details,
    #[sea_orm(has_many = "super::purchase_document_reference::Entity")]
    References,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::purchase_document_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentType.def()
    }
}

impl Related<super::purchase_document_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl Related<super::purchase_document_reference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::References.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
