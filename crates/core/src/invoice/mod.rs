//! Electronic tax invoices

pub mod ports;
pub mod service;

pub use ports::{InvoiceRecordRepository, TaxInvoiceGateway};
pub use service::TaxInvoiceService;
