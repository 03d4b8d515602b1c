//! DTE (electronic tax document) XML extraction.
//!
//! Purely functional: turns raw XML text into transfer structures consumed
//! by supplier reconciliation and document assembly. No database access.

pub mod parser;
pub mod types;

pub use parser::{normalize_tax_id, parse_document};
pub use types::{
    ExtractedDocument, ExtractedHeader, ExtractedIssuer, ExtractedLineItem, ExtractedReceiver,
    ExtractedReference, ExtractedTotals,
};
