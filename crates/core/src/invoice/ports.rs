//! Port interfaces for electronic tax invoices

use async_trait::async_trait;
use smartcon_domain::{InvoiceRecord, Result, TaxInvoiceRequest, TaxInvoiceResponse};

/// Third-party issuing API.
#[async_trait]
pub trait TaxInvoiceGateway: Send + Sync {
    async fn issue(&self, request: &TaxInvoiceRequest) -> Result<TaxInvoiceResponse>;
}

#[async_trait]
pub trait InvoiceRecordRepository: Send + Sync {
    async fn save(&self, record: &InvoiceRecord) -> Result<()>;

    /// Most recently issued first.
    async fn list(&self) -> Result<Vec<InvoiceRecord>>;
}
