pub mod company;
pub mod purchase_document;
pub mod purchase_document_detail;
pub mod purchase_document_reference;
pub mod purchase_document_type;
pub mod supplier;
pub mod supplier_address;
