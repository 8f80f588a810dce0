//! Form rules shared by the master-data services

use once_cell::sync::Lazy;
use smartcon_common::{FieldValidator, PatternValidator, ValidationError};
use smartcon_domain::SmartconError;

static RESIDENT_ID: Lazy<Option<PatternValidator>> =
    Lazy::new(|| PatternValidator::new(r"^\d{6}-\d{7}$", "주민등록번호 형식(######-#######)").ok());

/// Resident registration number in `######-#######` form.
pub fn is_resident_id(value: &str) -> bool {
    RESIDENT_ID.as_ref().is_some_and(|p| p.validate(value.trim()).is_ok())
}

static BUSINESS_NUMBER: Lazy<Option<PatternValidator>> =
    Lazy::new(|| PatternValidator::new(r"^\d{3}-?\d{2}-?\d{5}$", "사업자등록번호 형식").ok());

/// Business registration number, `###-##-#####` with or without dashes.
pub fn is_business_number(value: &str) -> bool {
    BUSINESS_NUMBER.as_ref().is_some_and(|p| p.validate(value.trim()).is_ok())
}

/// Surface the first violated rule as the operator-facing message.
pub fn validation_failed(errors: ValidationError) -> SmartconError {
    let message = errors.first_message().unwrap_or("입력값을 확인해주세요").to_string();
    SmartconError::Validation(message)
}

/// Finite and non-negative.
pub fn is_valid_man_day(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
