//! # invoice-core: Invoice Total Calculation
//!
//! This crate computes the payable total of a customer invoice: shipping by
//! country, membership and coupon discounts, tax on the discounted subtotal
//! and a surcharge for fragile goods, with every input validated up front.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Invoice Engine Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Caller (billing service, back office)           │   │
//! │  │        builds Invoice ──► compute_total ──► (total, warnings)   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ invoice-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │calculator │  │ validation│  │   │
//! │  │   │  Invoice  │  │   Money   │  │ shipping  │  │   rules   │  │   │
//! │  │   │ LineItem  │  │   Rate    │  │ discount  │  │  collect  │  │   │
//! │  │   └───────────┘  └───────────┘  │ tax, fees │  │    all    │  │   │
//! │  │                                 └─────┬─────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐        │                        │   │
//! │  │   │  config   │─►│   rates   │◄───────┘                        │   │
//! │  │   │ rates.toml│  │  tables   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O WHILE CALCULATING • NO SHARED MUTABLE STATE           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Invoice, LineItem, Rate, Warning, InvoiceTotal)
//! - [`money`] - Money type with exact decimal arithmetic (no floating point!)
//! - [`rates`] - Shipping, tax, coupon and membership tables
//! - [`validation`] - Structural invoice checks
//! - [`calculator`] - The calculation pipeline
//! - [`config`] - Loading and overriding rate tables
//! - [`error`] - Domain error types
//! - [`telemetry`] - Logging setup for hosts
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same invoice in, same total and warnings out
//! 2. **Refuse Whole**: an invalid invoice yields an error and nothing else
//! 3. **Decimal Money**: all amounts are exact decimals, rates are basis points
//! 4. **Advise, Don't Fail**: unknown coupons and large orders only warn
//!
//! ## Example Usage
//!
//! ```rust
//! use invoice_core::{InvoiceCalculator, Invoice, LineItem, Money, Warning};
//!
//! let calculator = InvoiceCalculator::new();
//! let invoice = Invoice::new("I-006", "C-005", "TH")
//!     .with_coupon("INVALID99")
//!     .with_item(LineItem::new("E", "electronics", Money::from_units(500), 1));
//!
//! let (total, warnings) = calculator.compute_total(&invoice).unwrap().into_parts();
//! // 500 + 0 shipping + 35 tax
//! assert_eq!(total, Money::from_units(535));
//! assert_eq!(warnings, vec![Warning::UnknownCoupon]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod config;
pub mod error;
pub mod money;
pub mod rates;
pub mod telemetry;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use invoice_core::Money` instead of
// `use invoice_core::money::Money`

pub use calculator::InvoiceCalculator;
pub use config::CalculatorConfig;
pub use error::{ConfigError, ConfigResult, Problem, ValidationError, ValidationResult};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Handling surcharge per unit on fragile lines.
pub const FRAGILE_FEE_PER_UNIT: i64 = 5;

/// Flat discount for customers without a discounted membership tier...
pub const NON_MEMBER_FLAT_DISCOUNT: i64 = 20;

/// ...once their subtotal is strictly above this amount.
pub const NON_MEMBER_DISCOUNT_THRESHOLD: i64 = 3000;

/// Subtotals strictly above this suggest a membership upgrade.
///
/// Compared against the pre-discount subtotal, not the final total.
pub const MEMBERSHIP_UPGRADE_THRESHOLD: i64 = 10_000;

/// Tiers that are never advised to upgrade, whatever the membership table holds.
pub const PREMIUM_TIERS: [&str; 2] = ["gold", "platinum"];
