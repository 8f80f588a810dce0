//! Electronic tax-invoice issuing API
//!
//! `POST {base_url}/taxinvoices` with the invoice as JSON. The API answers
//! with `success` and, when approved, the 국세청 approval number.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use smartcon_core::TaxInvoiceGateway;
use smartcon_domain::{
    InvoiceApiConfig, InvoiceLineItem, InvoiceParty, Result, SmartconError, TaxInvoiceRequest,
    TaxInvoiceResponse,
};
use tracing::{info, instrument};

use crate::http::HttpClient;

const ISSUE_PATH: &str = "/taxinvoices";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssuePayload<'a> {
    write_date: String,
    invoicer: PartyPayload<'a>,
    invoicee: PartyPayload<'a>,
    supply_cost_total: i64,
    tax_total: i64,
    total_amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    remark: Option<&'a str>,
    detail_list: Vec<DetailPayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PartyPayload<'a> {
    corp_num: String,
    corp_name: &'a str,
    ceo_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    addr: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailPayload<'a> {
    serial_num: u32,
    item_name: &'a str,
    qty: i64,
    unit_cost: i64,
    supply_cost: i64,
    tax: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueReply {
    success: bool,
    #[serde(default, alias = "ntsConfirmNum")]
    approval_number: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl<'a> From<&'a InvoiceParty> for PartyPayload<'a> {
    fn from(party: &'a InvoiceParty) -> Self {
        Self {
            // The API wants the bare 10 digits.
            corp_num: party.business_number.chars().filter(char::is_ascii_digit).collect(),
            corp_name: &party.company_name,
            ceo_name: &party.ceo_name,
            addr: party.address.as_deref(),
            email: party.email.as_deref(),
        }
    }
}

impl<'a> From<&'a InvoiceLineItem> for DetailPayload<'a> {
    fn from(item: &'a InvoiceLineItem) -> Self {
        Self {
            serial_num: item.serial,
            item_name: &item.name,
            qty: item.quantity,
            unit_cost: item.unit_cost,
            supply_cost: item.supply_cost,
            tax: item.tax,
        }
    }
}

impl<'a> From<&'a TaxInvoiceRequest> for IssuePayload<'a> {
    fn from(request: &'a TaxInvoiceRequest) -> Self {
        let supply_cost_total = request.total_supply_cost();
        let tax_total = request.total_tax();
        Self {
            write_date: request.formatted_write_date(),
            invoicer: PartyPayload::from(&request.supplier),
            invoicee: PartyPayload::from(&request.buyer),
            supply_cost_total,
            tax_total,
            total_amount: supply_cost_total.saturating_add(tax_total),
            remark: request.remark.as_deref(),
            detail_list: request.items.iter().map(DetailPayload::from).collect(),
        }
    }
}

pub struct InvoiceApiClient {
    http: HttpClient,
    base_url: String,
}

impl InvoiceApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
                SmartconError::Config("invoice API key is not a valid header".into())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        // Issuing is not idempotent. One attempt; a timeout surfaces as Network.
        let http = HttpClient::builder()
            .timeout(timeout)
            .max_attempts(1)
            .default_headers(headers)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// `None` when no base URL is configured.
    pub fn from_config(config: &InvoiceApiConfig) -> Result<Option<Self>> {
        config
            .base_url
            .as_deref()
            .map(|url| {
                Self::new(url, config.api_key.as_deref(), Duration::from_secs(config.timeout_secs))
            })
            .transpose()
    }
}

#[async_trait]
impl TaxInvoiceGateway for InvoiceApiClient {
    #[instrument(skip_all, fields(buyer = %request.buyer.company_name))]
    async fn issue(&self, request: &TaxInvoiceRequest) -> Result<TaxInvoiceResponse> {
        let url = format!("{}{ISSUE_PATH}", self.base_url);
        let builder = self.http.request(Method::POST, &url).json(&IssuePayload::from(request));
        let reply: IssueReply = self.http.send_json(builder).await?;

        info!(success = reply.success, "tax invoice API replied");
        Ok(TaxInvoiceResponse {
            success: reply.success,
            approval_number: reply.approval_number,
            message: reply.message,
        })
    }
}

/// Stands in for the issuing API when none is configured.
pub struct DisabledInvoiceGateway;

#[async_trait]
impl TaxInvoiceGateway for DisabledInvoiceGateway {
    async fn issue(&self, _request: &TaxInvoiceRequest) -> Result<TaxInvoiceResponse> {
        Err(SmartconError::Config("전자세금계산서 API가 설정되지 않았습니다".into()))
    }
}
