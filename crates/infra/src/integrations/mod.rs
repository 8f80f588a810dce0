//! Outbound third-party integrations

pub mod invoice_api;

pub use invoice_api::{DisabledInvoiceGateway, InvoiceApiClient};
