use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything extracted from one DTE file: header, line items and
/// cross-document references, plus the raw XML retained for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedDocument {
    pub header: ExtractedHeader,
    pub items: Vec<ExtractedLineItem>,
    pub references: Vec<ExtractedReference>,
    #[serde(skip)]
    pub raw_xml: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedHeader {
    /// Tax-document type code (33, 34, 46, ...)
    pub document_type: String,
    /// Sequential document number assigned by the issuer
    pub folio: String,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// Payment-method code: 1 cash, 2 credit, 3 no charge
    pub payment_term_code: String,
    pub issuer: ExtractedIssuer,
    pub receiver: ExtractedReceiver,
    pub totals: ExtractedTotals,
}

/// Issuer block. `tax_id` is normalized (no dots, single hyphen before the
/// check digit); string fields default to empty when absent from the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedIssuer {
    pub tax_id: String,
    pub legal_name: String,
    pub business_activity: String,
    /// Trade-activity codes, source order, at most four
    pub activity_codes: Vec<String>,
    pub branch_code: String,
    pub phone: String,
    pub email: String,
    pub street_address: String,
    pub commune: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedReceiver {
    pub tax_id: String,
    pub legal_name: String,
    pub business_activity: String,
    pub street_address: String,
    pub commune: String,
    pub city: String,
    pub contact: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedTotals {
    pub net_amount: Decimal,
    pub exempt_amount: Decimal,
    /// Tax rate in percent; the statutory 19% when the source omits it
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

impl Default for ExtractedTotals {
    fn default() -> Self {
        Self {
            net_amount: Decimal::ZERO,
            exempt_amount: Decimal::ZERO,
            tax_rate: Decimal::from(19),
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
        }
    }
}

/// One invoice line. `line_number` falls back to 1-based discovery order
/// when the source carries no explicit number; ordering is significant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedLineItem {
    pub line_number: i32,
    pub item_code: String,
    pub item_code_type: String,
    pub name: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub line_amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedReference {
    pub line_number: i32,
    pub document_type: String,
    pub folio: String,
    pub date: Option<NaiveDate>,
    pub reason_code: String,
    pub reason: String,
}
