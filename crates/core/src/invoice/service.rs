//! Electronic tax invoice issuance

use std::sync::Arc;

use smartcon_common::Validator;
use smartcon_domain::{
    new_document_id, now_timestamp, InvoiceLineItem, InvoiceParty, InvoiceRecord, InvoiceStatus,
    Result, SmartconError, TaxInvoiceRequest,
};
use tracing::{error, info, warn};

use super::ports::{InvoiceRecordRepository, TaxInvoiceGateway};
use crate::validation::{is_business_number, validation_failed};

pub struct TaxInvoiceService {
    gateway: Arc<dyn TaxInvoiceGateway>,
    records: Arc<dyn InvoiceRecordRepository>,
}

impl TaxInvoiceService {
    pub fn new(
        gateway: Arc<dyn TaxInvoiceGateway>,
        records: Arc<dyn InvoiceRecordRepository>,
    ) -> Self {
        Self { gateway, records }
    }

    /// Validate, price the lines, send to the issuing API and keep a local
    /// record of the approved invoice.
    pub async fn issue(&self, request: TaxInvoiceRequest) -> Result<InvoiceRecord> {
        validate(&request)?;
        let request = priced(request);

        let response = self.gateway.issue(&request).await?;
        let approval_number = match (response.success, response.approval_number) {
            (true, Some(number)) if !number.trim().is_empty() => number,
            (_, _) => {
                let reason = response.message.unwrap_or_else(|| "no approval number".into());
                warn!(%reason, buyer = %request.buyer.company_name, "tax invoice rejected");
                return Err(SmartconError::Network(format!("tax invoice rejected: {reason}")));
            }
        };

        let record = InvoiceRecord {
            id: new_document_id(),
            approval_number,
            write_date: request.formatted_write_date(),
            total_supply_cost: request.total_supply_cost(),
            total_tax: request.total_tax(),
            supplier: request.supplier,
            buyer: request.buyer,
            items: request.items,
            status: InvoiceStatus::Issued,
            issued_at: now_timestamp(),
        };
        if let Err(e) = self.records.save(&record).await {
            // Already issued upstream; the operator needs the number to reconcile.
            error!(
                error = %e,
                approval_number = %record.approval_number,
                "issued invoice was not recorded"
            );
            return Err(e);
        }

        info!(
            approval_number = %record.approval_number,
            supply = record.total_supply_cost,
            tax = record.total_tax,
            "tax invoice issued"
        );
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<InvoiceRecord>> {
        self.records.list().await
    }
}

fn validate(request: &TaxInvoiceRequest) -> Result<()> {
    let mut v = Validator::new().stop_on_first_error();
    check_party(&mut v, "supplier", &request.supplier);
    check_party(&mut v, "buyer", &request.buyer);
    v.ensure("items", !request.items.is_empty(), "품목을 하나 이상 입력해주세요");
    for item in &request.items {
        v.require("items", &item.name, "품목명을 입력해주세요")
            .ensure("items", item.quantity > 0, "수량은 0보다 커야 합니다")
            .ensure("items", item.unit_cost >= 0, "단가는 0 이상이어야 합니다");
    }
    v.finalize().map_err(validation_failed)
}

fn check_party(v: &mut Validator, field: &str, party: &InvoiceParty) {
    v.ensure(
        field,
        is_business_number(&party.business_number),
        "사업자등록번호 형식이 올바르지 않습니다",
    )
    .require(field, &party.company_name, "상호를 입력해주세요")
    .require(field, &party.ceo_name, "대표자명을 입력해주세요");
}

/// Recompute supply cost and VAT and renumber serials from 1.
fn priced(mut request: TaxInvoiceRequest) -> TaxInvoiceRequest {
    request.items = request
        .items
        .into_iter()
        .zip(1..)
        .map(|(item, serial)| {
            InvoiceLineItem::priced(serial, item.name, item.quantity, item.unit_cost)
        })
        .collect();
    request
}
