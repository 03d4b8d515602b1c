use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::{
    db::DbPool,
    dte::{self, ExtractedDocument, ExtractedHeader, ExtractedLineItem, ExtractedTotals},
    entities::{
        company, purchase_document, purchase_document_detail, purchase_document_reference,
        purchase_document_type,
    },
    errors::ServiceError,
    services::{non_empty, suppliers::SupplierReconciler},
};

/// Initial processing state of every ingested document. A downstream
/// warehouse step moves documents onward and flips availability.
const INITIAL_STATUS: &str = "PENDING";
const DOCUMENT_CURRENCY: &str = "CLP";

/// Persisted purchase-document aggregate returned to the caller.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
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
    pub status: String,
    pub warehouse_available: bool,
    pub created_at: DateTime<Utc>,
    pub details: Vec<DocumentDetailResponse>,
    pub references: Vec<DocumentReferenceResponse>,
}

#[derive(Debug, Serialize)]
pub struct DocumentDetailResponse {
    pub id: i64,
    pub line_number: i32,
    pub product_code: Option<String>,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_discount: Decimal,
    pub line_subtotal: Decimal,
    pub line_tax: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DocumentReferenceResponse {
    pub id: i64,
    pub line_number: i32,
    pub referenced_document_type: Option<String>,
    pub referenced_folio: Option<String>,
    pub referenced_date: Option<NaiveDate>,
    pub reference_code: Option<String>,
    pub reason: Option<String>,
}

impl DocumentResponse {
    fn from_models(
        document: purchase_document::Model,
        details: Vec<purchase_document_detail::Model>,
        references: Vec<purchase_document_reference::Model>,
    ) -> Self {
        Self {
            id: document.id,
            supplier_id: document.supplier_id,
            company_id: document.company_id,
            document_type_id: document.document_type_id,
            document_number: document.document_number,
            folio: document.folio,
            document_date: document.document_date,
            issuer_tax_id: document.issuer_tax_id,
            receiver_tax_id: document.receiver_tax_id,
            observations: document.observations,
            subtotal: document.subtotal,
            tax_amount: document.tax_amount,
            discount_total: document.discount_total,
            total: document.total,
            currency: document.currency,
            exchange_rate: document.exchange_rate,
            status: document.status,
            warehouse_available: document.warehouse_available,
            created_at: document.created_at,
            details: details
                .into_iter()
                .map(|d| DocumentDetailResponse {
                    id: d.id,
                    line_number: d.line_number,
                    product_code: d.product_code,
                    description: d.description,
                    quantity: d.quantity,
                    unit_price: d.unit_price,
                    line_discount: d.line_discount,
                    line_subtotal: d.line_subtotal,
                    line_tax: d.line_tax,
                    line_total: d.line_total,
                })
                .collect(),
            references: references
                .into_iter()
                .map(|r| DocumentReferenceResponse {
                    id: r.id,
                    line_number: r.line_number,
                    referenced_document_type: r.referenced_document_type,
                    referenced_folio: r.referenced_folio,
                    referenced_date: r.referenced_date,
                    reference_code: r.reference_code,
                    reason: r.reason,
                })
                .collect(),
        }
    }
}

fn payment_method_label(code: &str) -> &'static str {
    match code.trim() {
        "2" => "CREDIT",
        "3" => "NO CHARGE",
        _ => "CASH",
    }
}

fn build_observations(header: &ExtractedHeader) -> String {
    let mut parts = vec![format!(
        "Payment method: {}",
        payment_method_label(&header.payment_term_code)
    )];
    if let Some(due_date) = header.due_date {
        parts.push(format!("Due date: {due_date}"));
    }
    parts.join(" | ")
}

/// Exempt documents keep their exempt amount as a distinct addend; when no
/// exempt amount exists the subtotal is the net amount alone.
fn document_subtotal(totals: &ExtractedTotals) -> Decimal {
    if totals.exempt_amount > Decimal::ZERO {
        totals.net_amount + totals.exempt_amount
    } else {
        totals.net_amount
    }
}

/// Computes (subtotal, tax, total) for one line. Tax applies only when the
/// document carries a net amount; fully exempt documents produce zero line
/// tax regardless of the nominal rate.
fn line_amounts(item: &ExtractedLineItem, totals: &ExtractedTotals) -> (Decimal, Decimal, Decimal) {
    let subtotal = item.quantity * item.unit_price - item.discount_amount;
    let tax = if totals.net_amount > Decimal::ZERO {
        subtotal * totals.tax_rate / Decimal::from(100)
    } else {
        Decimal::ZERO
    };
    let total = subtotal + tax;
    (subtotal, tax, total)
}

/// Assembles and persists the purchase-document aggregate from one
/// uploaded DTE file.
#[derive(Clone)]
pub struct DocumentIngestionService {
    db: Arc<DbPool>,
    reconciler: SupplierReconciler,
}

impl DocumentIngestionService {
    pub fn new(db: Arc<DbPool>, reconciler: SupplierReconciler) -> Self {
        Self { db, reconciler }
    }

    /// Runs the full pipeline: extract, reconcile the supplier, then write
    /// the document, its details and its references in one transaction.
    /// Any persistence failure rolls the whole aggregate back.
    #[instrument(skip(self, xml))]
    pub async fn ingest(&self, xml: &str) -> Result<DocumentResponse, ServiceError> {
        let extracted = dte::parse_document(xml)?;
        let header = &extracted.header;

        let supplier = self.reconciler.reconcile(&header.issuer).await?;
        let receiving_company = self.find_company(&header.receiver.tax_id).await?;
        let document_type = self.find_document_type(&header.document_type).await?;

        let document_id = self
            .persist_aggregate(
                &extracted,
                supplier.id,
                receiving_company.map(|c| c.id),
                document_type.map(|t| t.id),
            )
            .await?;

        info!(
            document_id,
            folio = %header.folio,
            supplier_id = supplier.id,
            "purchase document assembled"
        );

        self.load_document(document_id).await
    }

    /// Receiving company is optional; an unmatched receiver never fails
    /// the ingestion.
    async fn find_company(&self, tax_id: &str) -> Result<Option<company::Model>, ServiceError> {
        if tax_id.trim().is_empty() {
            return Ok(None);
        }
        let found = company::Entity::find()
            .filter(company::Column::TaxId.eq(tax_id))
            .one(&*self.db)
            .await?;
        Ok(found)
    }

    async fn find_document_type(
        &self,
        dte_code: &str,
    ) -> Result<Option<purchase_document_type::Model>, ServiceError> {
        if dte_code.trim().is_empty() {
            return Ok(None);
        }
        let found = purchase_document_type::Entity::find()
            .filter(purchase_document_type::Column::DteCode.eq(dte_code))
            .one(&*self.db)
            .await?;
        Ok(found)
    }

    async fn persist_aggregate(
        &self,
        extracted: &ExtractedDocument,
        supplier_id: i64,
        company_id: Option<i64>,
        document_type_id: Option<i64>,
    ) -> Result<i64, ServiceError> {
        let header = &extracted.header;
        let totals = &header.totals;
        let now = Utc::now();

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "failed to start ingestion transaction");
            ServiceError::DatabaseError(e)
        })?;

        let document = purchase_document::ActiveModel {
            supplier_id: Set(supplier_id),
            company_id: Set(company_id),
            document_type_id: Set(document_type_id),
            document_number: Set(header.folio.clone()),
            folio: Set(header.folio.clone()),
            document_date: Set(header.issue_date),
            issuer_tax_id: Set(header.issuer.tax_id.clone()),
            receiver_tax_id: Set(non_empty(&header.receiver.tax_id)),
            observations: Set(Some(build_observations(header))),
            subtotal: Set(document_subtotal(totals)),
            tax_amount: Set(totals.tax_amount),
            discount_total: Set(Decimal::ZERO),
            total: Set(totals.total_amount),
            currency: Set(DOCUMENT_CURRENCY.to_string()),
            exchange_rate: Set(Decimal::ONE),
            raw_xml: Set(extracted.raw_xml.clone()),
            status: Set(INITIAL_STATUS.to_string()),
            warehouse_available: Set(false),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        };

        let document = document.insert(&txn).await.map_err(|e| {
            error!(error = %e, "failed to persist purchase document header");
            ServiceError::DatabaseError(e)
        })?;

        for item in &extracted.items {
            let (line_subtotal, line_tax, line_total) = line_amounts(item, totals);
            let description = if !item.name.is_empty() {
                item.name.clone()
            } else if !item.description.is_empty() {
                item.description.clone()
            } else {
                "No description".to_string()
            };

            let detail = purchase_document_detail::ActiveModel {
                document_id: Set(document.id),
                product_code: Set(non_empty(&item.item_code)),
                description: Set(description),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                line_discount: Set(item.discount_amount),
                line_subtotal: Set(line_subtotal),
                line_tax: Set(line_tax),
                line_total: Set(line_total),
                line_number: Set(item.line_number),
                active: Set(true),
                ..Default::default()
            };
            detail.insert(&txn).await.map_err(|e| {
                error!(error = %e, line_number = item.line_number, "failed to persist document detail");
                ServiceError::DatabaseError(e)
            })?;
        }

        for reference in &extracted.references {
            let row = purchase_document_reference::ActiveModel {
                document_id: Set(document.id),
                line_number: Set(reference.line_number),
                referenced_document_type: Set(non_empty(&reference.document_type)),
                referenced_folio: Set(non_empty(&reference.folio)),
                referenced_date: Set(reference.date),
                // Empty reference codes violate the enumerated-value
                // constraint; store NULL instead.
                reference_code: Set(non_empty(&reference.reason_code)),
                reason: Set(non_empty(&reference.reason)),
                active: Set(true),
                ..Default::default()
            };
            row.insert(&txn).await.map_err(|e| {
                error!(error = %e, line_number = reference.line_number, "failed to persist document reference");
                ServiceError::DatabaseError(e)
            })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, "failed to commit ingestion transaction");
            ServiceError::DatabaseError(e)
        })?;

        Ok(document.id)
    }

    /// Reloads the persisted aggregate with details and references in line
    /// order.
    pub async fn load_document(&self, id: i64) -> Result<DocumentResponse, ServiceError> {
        let document = purchase_document::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("purchase document {id} not found")))?;

        let details = purchase_document_detail::Entity::find()
            .filter(purchase_document_detail::Column::DocumentId.eq(id))
            .order_by_asc(purchase_document_detail::Column::LineNumber)
            .all(&*self.db)
            .await?;

        let references = purchase_document_reference::Entity::find()
            .filter(purchase_document_reference::Column::DocumentId.eq(id))
            .order_by_asc(purchase_document_reference::Column::LineNumber)
            .all(&*self.db)
            .await?;

        Ok(DocumentResponse::from_models(document, details, references))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal, unit_price: Decimal, discount: Decimal) -> ExtractedLineItem {
        ExtractedLineItem {
            line_number: 1,
            item_code: String::new(),
            item_code_type: String::new(),
            name: "item".to_string(),
            description: String::new(),
            quantity,
            unit: String::new(),
            unit_price,
            discount_percent: Decimal::ZERO,
            discount_amount: discount,
            line_amount: Decimal::ZERO,
        }
    }

    fn totals(net: Decimal, exempt: Decimal, rate: Decimal) -> ExtractedTotals {
        ExtractedTotals {
            net_amount: net,
            exempt_amount: exempt,
            tax_rate: rate,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
        }
    }

    #[test]
    fn subtotal_is_net_when_no_exempt_amount() {
        let t = totals(dec!(8000), Decimal::ZERO, dec!(19));
        assert_eq!(document_subtotal(&t), dec!(8000));
    }

    #[test]
    fn subtotal_adds_exempt_amount_when_present() {
        let t = totals(dec!(8000), dec!(1500), dec!(19));
        assert_eq!(document_subtotal(&t), dec!(9500));
    }

    #[test]
    fn line_tax_applies_document_rate() {
        let t = totals(dec!(8000), Decimal::ZERO, dec!(19));

        let (subtotal, tax, total) = line_amounts(&line(dec!(3), dec!(1000), Decimal::ZERO), &t);
        assert_eq!(subtotal, dec!(3000));
        assert_eq!(tax, dec!(570));
        assert_eq!(total, dec!(3570));

        let (subtotal, tax, total) = line_amounts(&line(dec!(1), dec!(5000), Decimal::ZERO), &t);
        assert_eq!(subtotal, dec!(5000));
        assert_eq!(tax, dec!(950));
        assert_eq!(total, dec!(5950));
    }

    #[test]
    fn line_discount_reduces_taxable_subtotal() {
        let t = totals(dec!(1000), Decimal::ZERO, dec!(19));
        let (subtotal, tax, total) = line_amounts(&line(dec!(2), dec!(600), dec!(200)), &t);
        assert_eq!(subtotal, dec!(1000));
        assert_eq!(tax, dec!(190));
        assert_eq!(total, dec!(1190));
    }

    #[test]
    fn exempt_document_produces_zero_line_tax() {
        let t = totals(Decimal::ZERO, dec!(5000), dec!(19));
        let (subtotal, tax, total) = line_amounts(&line(dec!(5), dec!(1000), Decimal::ZERO), &t);
        assert_eq!(subtotal, dec!(5000));
        assert_eq!(tax, Decimal::ZERO);
        assert_eq!(total, dec!(5000));
    }

    #[test]
    fn observations_carry_payment_method_and_due_date() {
        let mut header = ExtractedHeader {
            payment_term_code: "2".to_string(),
            due_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 15),
            ..Default::default()
        };
        assert_eq!(
            build_observations(&header),
            "Payment method: CREDIT | Due date: 2024-04-15"
        );

        header.due_date = None;
        header.payment_term_code = String::new();
        assert_eq!(build_observations(&header), "Payment method: CASH");
    }

    #[test]
    fn payment_method_codes_map_to_labels() {
        assert_eq!(payment_method_label("1"), "CASH");
        assert_eq!(payment_method_label("2"), "CREDIT");
        assert_eq!(payment_method_label("3"), "NO CHARGE");
        assert_eq!(payment_method_label("99"), "CASH");
        assert_eq!(payment_method_label(""), "CASH");
    }
}
