//! Shared utilities for the SmartCon crates.
//!
//! Currently this is the form-validation framework used by every write path
//! (quick-register forms, bulk edits, payroll settings, tax invoices).
//!
//! # Safety and Quality
//!
//! No unsafe code, no I/O, no logging. Callers decide how to surface errors.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod validation;

pub use validation::{
    FieldError, FieldValidator, PatternValidator, RangeValidator, ValidationError,
    ValidationResult, Validator,
};
