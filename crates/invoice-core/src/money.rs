//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    (1000 - 100) * 0.07 = 63.00000000000001                              │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    (1000 - 100) * 0.0700 = 63.0000 exactly                              │
//! │    Rates are basis points, so applying one never loses precision       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use invoice_core::money::Money;
//! use invoice_core::types::Rate;
//!
//! let price = Money::from_cents(1099);                  // 10.99
//! let line = price.multiply_quantity(3).unwrap();       // 32.97
//! let tax = line.apply_rate(Rate::from_bps(700)).unwrap();
//! assert_eq!(tax.amount(), rust_decimal::Decimal::new(23079, 4)); // 2.3079, unrounded
//! ```
//!
//! ## Overflow
//! `Decimal` panics when an operator overflows. Every step of the invoice
//! pipeline goes through the `checked_*`/`Option` forms below instead, so an
//! absurdly large invoice is refused rather than aborting the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the invoice's (single) currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: Intermediate figures such as `subtotal - discount`
///   may go negative before the final clamp
/// - **No rounding**: Every step is exact; rounding is a display concern
/// - **Transparent serde**: Serializes exactly like the inner `Decimal`
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price × qty ──► subtotal ──┬──► shipping tier lookup
///                                          ├──► discount (membership + coupon)
///                                          └──► tax on (subtotal - discount)
///
/// subtotal + shipping + fragile fee + tax - discount ──► clamp ≥ 0 ──► total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use invoice_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(25).to_string(), "25.00");
    /// ```
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Creates a Money value from hundredths of a unit.
    ///
    /// ## Example
    /// ```rust
    /// use invoice_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Applies a percentage rate: `self × bps / 10 000`, exactly.
    ///
    /// ## Example
    /// ```rust
    /// use invoice_core::money::Money;
    /// use invoice_core::types::Rate;
    ///
    /// let taxable = Money::from_units(900);
    /// let tax = taxable.apply_rate(Rate::from_bps(700)); // 7%
    /// assert_eq!(tax, Some(Money::from_units(63)));
    /// ```
    ///
    /// Returns `None` if the product does not fit in a `Decimal`.
    pub fn apply_rate(&self, rate: Rate) -> Option<Money> {
        self.0.checked_mul(rate.as_fraction()).map(Money)
    }

    /// Multiplies a unit price by a line quantity. `None` on overflow.
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Addition that returns `None` instead of panicking on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtraction that returns `None` instead of panicking on overflow.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Sums amounts, stopping at the first overflow.
    ///
    /// ```rust
    /// use invoice_core::money::Money;
    ///
    /// let lines = [Money::from_cents(1000), Money::from_cents(550)];
    /// assert_eq!(Money::checked_sum(lines), Some(Money::from_cents(1550)));
    /// ```
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// Returns the value, or zero if it is negative.
    ///
    /// ```rust
    /// use invoice_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(-3).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_units(3).clamp_non_negative(), Money::from_units(3));
    /// ```
    #[inline]
    pub fn clamp_non_negative(self) -> Money {
        self.max(Money::zero())
    }

    /// Rounds to two decimal places (banker's rounding), for presentation.
    pub fn round_to_cents(&self) -> Money {
        Money(self.0.round_dp(2))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimal places, no currency symbol (the engine is single-currency).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Plain addition, panicking on overflow like `Decimal`. The calculator
/// uses [`Money::checked_add`].
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
