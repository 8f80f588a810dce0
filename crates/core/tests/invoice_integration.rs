//! Tax invoice issuance against a stubbed issuing API.

mod support;

use std::sync::Arc;

use smartcon_core::TaxInvoiceService;
use smartcon_domain::{
    InvoiceLineItem, InvoiceParty, InvoiceStatus, SmartconError, TaxInvoiceRequest,
    TaxInvoiceResponse,
};
use support::{date, MemoryInvoiceRepository, StubGateway};

fn party(name: &str, business_number: &str) -> InvoiceParty {
    InvoiceParty {
        business_number: business_number.into(),
        company_name: name.into(),
        ceo_name: "김철수".into(),
        address: Some("서울시 강남구".into()),
        email: None,
    }
}

fn request() -> TaxInvoiceRequest {
    TaxInvoiceRequest {
        write_date: date(2024, 7, 31),
        supplier: party("청연", "1234567890"),
        buyer: party("대한건설", "987-65-43210"),
        items: vec![
            InvoiceLineItem::priced(3, "7월 인건비", 1, 4_500_000),
            InvoiceLineItem::priced(9, "장비 임대", 3, 120_000),
        ],
        remark: None,
    }
}

#[tokio::test]
async fn approved_invoice_is_recorded() {
    let gateway = Arc::new(StubGateway::approving("20240731-41000000-00001"));
    let records = Arc::new(MemoryInvoiceRepository::default());
    let service = TaxInvoiceService::new(gateway.clone(), records);

    let record = service.issue(request()).await.unwrap();
    assert_eq!(record.approval_number, "20240731-41000000-00001");
    assert_eq!(record.write_date, "20240731");
    assert_eq!(record.total_supply_cost, 4_860_000);
    assert_eq!(record.total_tax, 486_000);
    assert_eq!(record.status, InvoiceStatus::Issued);

    let sent = gateway.requests();
    assert_eq!(sent.len(), 1);
    let serials: Vec<u32> = sent[0].items.iter().map(|i| i.serial).collect();
    assert_eq!(serials, vec![1, 2]);

    let listed = service.list().await.unwrap();
    assert_eq!(listed, vec![record]);
}

#[tokio::test]
async fn rejection_is_a_network_error_and_not_recorded() {
    let gateway = Arc::new(StubGateway::answering(TaxInvoiceResponse {
        success: false,
        approval_number: None,
        message: Some("인증서가 만료되었습니다".into()),
    }));
    let service = TaxInvoiceService::new(gateway, Arc::new(MemoryInvoiceRepository::default()));

    let err = service.issue(request()).await.unwrap_err();
    assert!(matches!(&err, SmartconError::Network(msg) if msg.contains("인증서가 만료되었습니다")));
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn success_without_approval_number_is_rejected() {
    let gateway = Arc::new(StubGateway::answering(TaxInvoiceResponse {
        success: true,
        approval_number: None,
        message: None,
    }));
    let service = TaxInvoiceService::new(gateway, Arc::new(MemoryInvoiceRepository::default()));

    assert!(matches!(service.issue(request()).await, Err(SmartconError::Network(_))));
}

#[tokio::test]
async fn invalid_request_never_reaches_the_gateway() {
    let gateway = Arc::new(StubGateway::approving("unused"));
    let service =
        TaxInvoiceService::new(gateway.clone(), Arc::new(MemoryInvoiceRepository::default()));

    let mut bad = request();
    bad.items[1].quantity = 0;
    let err = service.issue(bad).await.unwrap_err();
    assert_eq!(err, SmartconError::Validation("수량은 0보다 커야 합니다".into()));
    assert!(gateway.requests().is_empty());
}
