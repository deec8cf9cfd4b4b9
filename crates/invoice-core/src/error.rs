//! # Error Types
//!
//! Error types for invoice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Calculation (per invoice)                                              │
//! │  └── ValidationError  - one or more Problems, joined with "; "          │
//! │       └── Problem     - a single broken rule (missing id, bad qty...)   │
//! │                         or AmountOverflow while totalling               │
//! │                                                                         │
//! │  Construction (once, at startup)                                        │
//! │  └── ConfigError      - rate file unreadable or rate tables invalid     │
//! │                                                                         │
//! │  Unknown coupons, unlisted countries and high-value orders are NOT      │
//! │  errors: they fall back to defaults or surface as Warnings.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for single-message errors; only the joined list is hand-formatted
//! 2. Include context in error messages (SKU)
//! 3. Problems are enum variants, never ad-hoc strings
//! 4. The joined message is observable by callers, so its wording is fixed

use std::fmt;

use thiserror::Error;

// =============================================================================
// Validation Problems
// =============================================================================

/// A single structural rule an invoice violates.
///
/// The `Display` text of each variant is part of the public contract:
/// callers match on these substrings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    /// No invoice was supplied at all. Reported alone.
    #[error("Invoice is missing")]
    MissingInvoice,

    #[error("Missing invoice_id")]
    MissingInvoiceId,

    #[error("Missing customer_id")]
    MissingCustomerId,

    #[error("Invoice must contain items")]
    NoItems,

    #[error("Item sku is missing")]
    MissingSku,

    /// Quantity is zero or negative.
    #[error("Invalid qty for {sku}")]
    InvalidQuantity { sku: String },

    /// Unit price is negative.
    #[error("Invalid price for {sku}")]
    InvalidPrice { sku: String },

    /// Category is not one of book, food, electronics, other.
    #[error("Unknown category for {sku}")]
    UnknownCategory { sku: String },

    /// The invoice is structurally valid but an amount (line total,
    /// subtotal, discount, total) does not fit in a `Decimal`. Reported alone.
    #[error("Invoice amounts are out of range")]
    AmountOverflow,
}

// =============================================================================
// Validation Error
// =============================================================================

/// The invoice was refused; no total is produced.
///
/// Carries every problem found, in the order the validator encountered them.
///
/// ## User Workflow
/// ```text
/// Invoice { invoice_id: "", items: [{ sku: "A", qty: 0 }] }
///      │
///      ▼
/// ValidationError [MissingInvoiceId, InvalidQuantity { sku: "A" }]
///      │
///      ▼
/// "Missing invoice_id; Invalid qty for A"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    problems: Vec<Problem>,
}

impl ValidationError {
    /// Wraps a non-empty list of problems.
    pub fn new(problems: Vec<Problem>) -> Self {
        ValidationError { problems }
    }

    /// The individual problems, in encounter order.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Consumes the error, returning the problems.
    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.problems.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", problem)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<Problem> for ValidationError {
    fn from(problem: Problem) -> Self {
        ValidationError::new(vec![problem])
    }
}

// =============================================================================
// Config Error
// =============================================================================

/// Rate-table configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Rate tables parsed but break a rule (rate over 100%, fees not descending...).
    #[error("Invalid rate configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the rate file.
    #[error("Failed to load rate config: {0}")]
    LoadFailed(String),

    /// Failed to write the rate file.
    #[error("Failed to save rate config: {0}")]
    SaveFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Convenience type alias for Results with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_messages() {
        assert_eq!(Problem::MissingInvoice.to_string(), "Invoice is missing");
        assert_eq!(Problem::NoItems.to_string(), "Invoice must contain items");
        assert_eq!(
            Problem::AmountOverflow.to_string(),
            "Invoice amounts are out of range"
        );
        assert_eq!(
            Problem::InvalidQuantity {
                sku: "BOOK-1".to_string()
            }
            .to_string(),
            "Invalid qty for BOOK-1"
        );
        assert_eq!(
            Problem::UnknownCategory {
                sku: "X".to_string()
            }
            .to_string(),
            "Unknown category for X"
        );
    }

    #[test]
    fn test_validation_error_joins_in_order() {
        let err = ValidationError::new(vec![
            Problem::MissingInvoiceId,
            Problem::MissingCustomerId,
            Problem::InvalidPrice {
                sku: "A".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Missing invoice_id; Missing customer_id; Invalid price for A"
        );
        assert_eq!(err.problems().len(), 3);
    }

    #[test]
    fn test_single_problem_has_no_separator() {
        let err: ValidationError = Problem::MissingInvoice.into();
        assert_eq!(err.to_string(), "Invoice is missing");
    }

    #[test]
    fn test_config_error_from_toml() {
        let parse_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(matches!(err, ConfigError::LoadFailed(_)));
    }
}
