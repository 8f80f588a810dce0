// Field Validators - Reusable validation components
use std::fmt::Display;

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Range validator for numeric types
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T> Default for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    /// Create a new range validator with no constraints
    pub fn empty() -> Self {
        Self { min: None, max: None }
    }

    /// Create a new range validator with min and max values
    pub fn new(min: T, max: T) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    /// Set minimum value
    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    /// Set maximum value
    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }
}

impl<T> FieldValidator<T> for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn validate(&self, value: &T) -> Result<(), String> {
        // NaN compares false against everything, so test the accepted side.
        if let Some(ref min) = self.min {
            if !(value >= min) {
                return Err(format!("Value must be at least {}", min));
            }
        }

        if let Some(ref max) = self.max {
            if !(value <= max) {
                return Err(format!("Value must not exceed {}", max));
            }
        }

        Ok(())
    }
}

/// Regex-backed validator for formatted identifiers (resident numbers,
/// business registration numbers, phone numbers).
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: regex::Regex,
    description: &'static str,
}

impl PatternValidator {
    /// Compile a validator; `description` is used in the default message.
    pub fn new(pattern: &str, description: &'static str) -> Result<Self, regex::Error> {
        Ok(Self { pattern: regex::Regex::new(pattern)?, description })
    }

    /// Build from an already compiled regex.
    pub fn from_regex(pattern: regex::Regex, description: &'static str) -> Self {
        Self { pattern, description }
    }

    /// Check a value without producing a message.
    pub fn is_match(&self, value: &str) -> bool {
        self.pattern.is_match(value.trim())
    }
}

impl FieldValidator<str> for PatternValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if self.is_match(value) {
            Ok(())
        } else {
            Err(format!("Value must be a valid {}", self.description))
        }
    }
}

impl FieldValidator<String> for PatternValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validator_min() {
        let validator = RangeValidator::empty().min(0);
        assert!(validator.validate(&0).is_ok());
        assert!(validator.validate(&-1).is_err());
    }

    #[test]
    fn test_range_validator_rejects_nan() {
        let validator = RangeValidator::new(0.0_f64, 100.0);
        assert!(validator.validate(&f64::NAN).is_err());
        assert!(validator.validate(&3.3).is_ok());
    }

    #[test]
    fn test_pattern_validator() {
        let validator = PatternValidator::new(r"^\d{6}-\d{7}$", "resident number").unwrap();
        assert!(validator.validate("900101-1234567").is_ok());
        assert!(validator.validate(" 900101-1234567 ").is_ok());
        let err = validator.validate("9001011234567").unwrap_err();
        assert!(err.contains("resident number"));
    }
}
