// Validation Module - schema-style form validation
//
// Forms are validated field by field into a `ValidationError` that keeps the
// violations in declaration order. Callers usually surface only the first
// message, so rules must be declared in the order the form presents them.
use std::fmt;

mod validators;

pub use validators::{FieldValidator, PatternValidator, RangeValidator};

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with ordered field-level errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Create a new, empty validation error
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get errors for a specific field
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// The first violated rule, which is what a form shows to the user.
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    /// Message of the first violated rule.
    pub fn first_message(&self) -> Option<&str> {
        self.first().map(|e| e.message.as_str())
    }

    /// Merge another validation error into this one
    pub fn merge(&mut self, other: ValidationError) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Validation error with no specific field errors"),
            [only] => write!(f, "{}", only.message),
            [first, rest @ ..] => {
                write!(f, "{} (+{} more)", first.message, rest.len())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Orchestrates validation of one form.
///
/// Each check records at most one error. With `stop_on_first_error` the
/// validator ignores every check after the first failure, which keeps the
/// cost of large bulk forms down when only the first message is shown.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationError,
    stop_on_first: bool,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop on first error
    pub fn stop_on_first_error(mut self) -> Self {
        self.stop_on_first = true;
        self
    }

    fn should_short_circuit(&self) -> bool {
        self.stop_on_first && !self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        if self.should_short_circuit() {
            return;
        }
        self.errors.add_field_error(field, message);
    }

    /// Validate a field with a specific validator, reporting its own message.
    pub fn validate_field<T, V>(&mut self, field: &str, value: &T, validator: &V) -> &mut Self
    where
        T: ?Sized,
        V: FieldValidator<T> + ?Sized,
    {
        if self.should_short_circuit() {
            return self;
        }

        if let Err(msg) = validator.validate(value) {
            self.add_error(field, msg);
        }
        self
    }

    /// Validate a field with a specific validator, replacing its message.
    pub fn validate_field_as<T, V>(
        &mut self,
        field: &str,
        value: &T,
        validator: &V,
        message: &str,
    ) -> &mut Self
    where
        T: ?Sized,
        V: FieldValidator<T> + ?Sized,
    {
        if self.should_short_circuit() {
            return self;
        }

        if validator.validate(value).is_err() {
            self.add_error(field, message);
        }
        self
    }

    /// Require a non-blank string.
    pub fn require(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        self.ensure(field, !value.trim().is_empty(), message)
    }

    /// Require an optional value to be present (and non-blank for strings).
    pub fn require_some<T: AsRef<str>>(
        &mut self,
        field: &str,
        value: Option<T>,
        message: &str,
    ) -> &mut Self {
        let present = value.as_ref().is_some_and(|v| !v.as_ref().trim().is_empty());
        self.ensure(field, present, message)
    }

    /// Record `message` unless `condition` holds.
    pub fn ensure(&mut self, field: &str, condition: bool, message: &str) -> &mut Self {
        if !condition {
            self.add_error(field, message);
        }
        self
    }

    /// Validate a numeric range (inclusive)
    pub fn validate_range<T>(&mut self, field: &str, value: T, min: T, max: T) -> &mut Self
    where
        T: PartialOrd + fmt::Display,
    {
        if value < min || value > max {
            self.add_error(field, format!("{field} must be between {min} and {max}"));
        }
        self
    }

    /// Validate minimum value
    pub fn validate_min<T>(&mut self, field: &str, value: T, min: T) -> &mut Self
    where
        T: PartialOrd + fmt::Display,
    {
        if value < min {
            self.add_error(field, format!("{field} must be at least {min}"));
        }
        self
    }

    /// Check if validation has errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.error_count()
    }

    /// Get errors without consuming validator
    pub fn errors(&self) -> &ValidationError {
        &self.errors
    }

    /// Finalize and return result
    pub fn finalize(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
