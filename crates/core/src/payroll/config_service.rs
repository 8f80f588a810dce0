//! Payroll settings with read-after-write verification

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use smartcon_common::{RangeValidator, Validator};
use smartcon_domain::constants::MSG_VERIFY_FAILED;
use smartcon_domain::{PayrollConfig, Result, SmartconError};
use tracing::{debug, info, warn};

use super::ports::PayrollConfigStore;
use crate::validation::validation_failed;

/// In-memory view of the shared payroll settings document.
pub struct PayrollConfigService {
    store: Arc<dyn PayrollConfigStore>,
    current: RwLock<PayrollConfig>,
}

impl PayrollConfigService {
    pub fn new(store: Arc<dyn PayrollConfigStore>) -> Self {
        Self { store, current: RwLock::new(PayrollConfig::default()) }
    }

    /// Last loaded or saved settings.
    pub fn current(&self) -> PayrollConfig {
        self.current.read().clone()
    }

    /// Reload from the store; an absent document means defaults.
    pub async fn load(&self) -> Result<PayrollConfig> {
        let config = self.store.load().await?.unwrap_or_default();
        *self.current.write() = config.clone();
        debug!("payroll config loaded");
        Ok(config)
    }

    /// Validate, write, read back and compare. A store that acknowledges the
    /// write but returns other values yields `WriteVerification`, and the
    /// in-memory view is reset to what the store actually holds.
    pub async fn save(&self, config: PayrollConfig) -> Result<PayrollConfig> {
        validate(&config)?;
        self.store.save(&config).await?;

        let stored = self.store.load().await?.unwrap_or_default();
        if stored != config {
            warn!(
                differing = ?differing_fields(&config, &stored),
                "payroll config read-back does not match the saved values"
            );
            *self.current.write() = stored;
            return Err(SmartconError::WriteVerification(MSG_VERIFY_FAILED.to_string()));
        }

        *self.current.write() = stored.clone();
        info!(
            split = stored.split_reporting,
            insurance = stored.insurance_mode,
            deduction_items = stored.deduction_items.len(),
            "payroll config saved"
        );
        Ok(stored)
    }
}

pub fn validate(config: &PayrollConfig) -> Result<()> {
    let percent = RangeValidator::new(0.0, 100.0);
    let days_floor = RangeValidator::new(0.0, f64::MAX);
    let mut v = Validator::new().stop_on_first_error();
    for (field, rate) in [
        ("tax_rate", config.tax_rate),
        ("pension_rate", config.pension_rate),
        ("health_rate", config.health_rate),
        ("care_rate", config.care_rate),
        ("employment_rate", config.employment_rate),
    ] {
        v.validate_field_as(field, &rate, &percent, "요율은 0에서 100 사이여야 합니다");
    }
    for (field, days) in [
        ("split_threshold_days", config.split_threshold_days),
        ("insurance_threshold_days", config.insurance_threshold_days),
    ] {
        v.validate_field_as(field, &days, &days_floor, "기준 공수는 0 이상이어야 합니다");
    }

    let mut keys = HashSet::new();
    for item in &config.deduction_items {
        v.require("deduction_items", &item.key, "공제 항목 키를 입력해주세요")
            .require("deduction_items", &item.label, "공제 항목 이름을 입력해주세요")
            .ensure(
                "deduction_items",
                keys.insert(item.key.as_str()),
                "공제 항목 키가 중복되었습니다",
            );
    }
    v.finalize().map_err(validation_failed)
}

fn differing_fields(expected: &PayrollConfig, actual: &PayrollConfig) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if expected.split_reporting != actual.split_reporting {
        fields.push("split_reporting");
    }
    if expected.split_threshold_days != actual.split_threshold_days {
        fields.push("split_threshold_days");
    }
    if expected.insurance_mode != actual.insurance_mode {
        fields.push("insurance_mode");
    }
    if expected.insurance_threshold_days != actual.insurance_threshold_days {
        fields.push("insurance_threshold_days");
    }
    for (name, a, b) in [
        ("tax_rate", expected.tax_rate, actual.tax_rate),
        ("pension_rate", expected.pension_rate, actual.pension_rate),
        ("health_rate", expected.health_rate, actual.health_rate),
        ("care_rate", expected.care_rate, actual.care_rate),
        ("employment_rate", expected.employment_rate, actual.employment_rate),
    ] {
        if a != b {
            fields.push(name);
        }
    }
    if expected.deduction_items != actual.deduction_items {
        fields.push("deduction_items");
    }
    fields
}
