//! Electronic tax invoices

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{INVOICE_DATE_FORMAT, VAT_RATE_PERCENT};
use crate::impl_wire_name_conversions;

/// Supplier or buyer on a tax invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceParty {
    /// 사업자등록번호, digits only or `###-##-#####`.
    pub business_number: String,
    pub company_name: String,
    pub ceo_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub serial: u32,
    pub name: String,
    pub quantity: i64,
    pub unit_cost: i64,
    /// quantity × unit cost
    pub supply_cost: i64,
    pub tax: i64,
}

impl InvoiceLineItem {
    /// Line with supply cost and VAT derived from quantity and unit cost.
    pub fn priced(serial: u32, name: impl Into<String>, quantity: i64, unit_cost: i64) -> Self {
        let supply_cost = quantity * unit_cost;
        Self {
            serial,
            name: name.into(),
            quantity,
            unit_cost,
            supply_cost,
            tax: supply_cost * VAT_RATE_PERCENT / 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInvoiceRequest {
    pub write_date: NaiveDate,
    pub supplier: InvoiceParty,
    pub buyer: InvoiceParty,
    pub items: Vec<InvoiceLineItem>,
    #[serde(default)]
    pub remark: Option<String>,
}

impl TaxInvoiceRequest {
    /// Written date as sent to the issuing API.
    pub fn formatted_write_date(&self) -> String {
        format_invoice_date(self.write_date)
    }

    pub fn total_supply_cost(&self) -> i64 {
        self.items.iter().map(|i| i.supply_cost).sum()
    }

    pub fn total_tax(&self) -> i64 {
        self.items.iter().map(|i| i.tax).sum()
    }
}

/// `YYYYMMDD`
pub fn format_invoice_date(date: NaiveDate) -> String {
    date.format(INVOICE_DATE_FORMAT).to_string()
}

/// Issuing API reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInvoiceResponse {
    pub success: bool,
    /// 국세청 승인번호, present on success.
    #[serde(default)]
    pub approval_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Issued,
    Cancelled,
}

impl_wire_name_conversions!(InvoiceStatus {
    Issued => "issued",
    Cancelled => "cancelled",
});

/// Locally persisted copy of an issued invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: String,
    pub approval_number: String,
    pub write_date: String,
    pub supplier: InvoiceParty,
    pub buyer: InvoiceParty,
    pub items: Vec<InvoiceLineItem>,
    pub total_supply_cost: i64,
    pub total_tax: i64,
    pub status: InvoiceStatus,
    pub issued_at: i64,
}
