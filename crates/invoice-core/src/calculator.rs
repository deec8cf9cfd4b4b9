//! # Invoice Calculator
//!
//! Turns a validated invoice into a payable total plus advisories.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      compute_total(invoice)                             │
//! │                                                                         │
//! │  validate ──► refuse with ValidationError (no total, no warnings)      │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  subtotal = Σ unit_price × qty                                          │
//! │     │                                                                   │
//! │     ├──► fragile fee  = Σ 5 × qty over fragile lines                    │
//! │     ├──► shipping     = tier lookup (country, subtotal)                 │
//! │     ├──► discount     = membership part + coupon part                   │
//! │     │                   (may push "Unknown coupon")                     │
//! │     └──► tax          = (subtotal - discount) × country rate            │
//! │                                                                         │
//! │  total = max(0, subtotal + shipping + fragile + tax - discount)         │
//! │                                                                         │
//! │  subtotal > 10000 and membership is neither gold nor platinum           │
//! │     └──► push "Consider membership upgrade"                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step reads only its inputs and the rate tables; nothing is cached or
//! mutated between calls.

use tracing::{debug, warn};

use crate::config::CalculatorConfig;
use crate::error::{ConfigResult, Problem, ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{Invoice, InvoiceTotal, LineItem, Warning};
use crate::validation;
use crate::{
    FRAGILE_FEE_PER_UNIT, MEMBERSHIP_UPGRADE_THRESHOLD, NON_MEMBER_DISCOUNT_THRESHOLD,
    NON_MEMBER_FLAT_DISCOUNT, PREMIUM_TIERS,
};

/// Computes invoice totals against a fixed set of rate tables.
///
/// Holds no per-request state, so one instance can serve every caller,
/// from any number of threads.
///
/// ## Example
/// ```rust
/// use invoice_core::{InvoiceCalculator, Invoice, LineItem, Money};
///
/// let calculator = InvoiceCalculator::new();
/// let invoice = Invoice::new("I-001", "C-001", "TH")
///     .with_item(LineItem::new("A", "book", Money::from_units(100), 2));
///
/// let result = calculator.compute_total(&invoice).unwrap();
/// // 200 + 60 shipping + 14 tax
/// assert_eq!(result.total, Money::from_units(274));
/// assert!(result.warnings.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InvoiceCalculator {
    config: CalculatorConfig,
}

impl InvoiceCalculator {
    /// A calculator using the built-in rate tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// A calculator using custom rate tables. The tables are validated first.
    pub fn from_config(config: CalculatorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(InvoiceCalculator { config })
    }

    /// The rate tables in use (read-only).
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Validates an invoice and computes its total.
    ///
    /// Accepts `&Invoice` or `Option<&Invoice>`; `None` is refused with
    /// "Invoice is missing".
    ///
    /// ## Errors
    /// A [`ValidationError`] listing every problem when the invoice breaks
    /// any structural rule, or holding [`Problem::AmountOverflow`] alone when
    /// a structurally valid invoice is too large to total.
    pub fn compute_total<'a>(
        &self,
        invoice: impl Into<Option<&'a Invoice>>,
    ) -> ValidationResult<InvoiceTotal> {
        let invoice = validation::check(invoice.into()).map_err(|err| {
            debug!(problems = err.problems().len(), error = %err, "Invoice refused");
            err
        })?;

        self.total_for(invoice).map_err(|problem| {
            warn!(invoice_id = %invoice.invoice_id, error = %problem, "Invoice refused");
            ValidationError::from(problem)
        })
    }

    /// The pipeline proper, on an invoice that passed validation.
    fn total_for(&self, invoice: &Invoice) -> Result<InvoiceTotal, Problem> {
        let mut warnings = Vec::new();

        let subtotal = Self::subtotal(&invoice.items)?;
        let fragile_fee = Self::fragile_fee(&invoice.items)?;
        let shipping = self.shipping(&invoice.country, subtotal);
        let discount = self.discount(invoice, subtotal, &mut warnings)?;
        let tax = self.tax(&invoice.country, subtotal, discount)?;

        let total = Money::checked_sum([subtotal, shipping, fragile_fee, tax])
            .and_then(|gross| gross.checked_sub(discount))
            .ok_or(Problem::AmountOverflow)?
            .clamp_non_negative();

        if subtotal > Money::from_units(MEMBERSHIP_UPGRADE_THRESHOLD)
            && !PREMIUM_TIERS.contains(&invoice.membership.as_str())
        {
            warnings.push(Warning::MembershipUpgrade);
        }

        debug!(
            invoice_id = %invoice.invoice_id,
            %subtotal,
            %shipping,
            %discount,
            %tax,
            %fragile_fee,
            %total,
            warnings = warnings.len(),
            "Computed invoice total"
        );

        Ok(InvoiceTotal {
            subtotal,
            shipping,
            discount,
            tax,
            fragile_fee,
            total,
            warnings,
        })
    }

    /// Σ unit_price × qty, before shipping, tax, discount or fees.
    pub fn subtotal(items: &[LineItem]) -> Result<Money, Problem> {
        items
            .iter()
            .try_fold(Money::zero(), |acc, item| {
                item.line_total().and_then(|line| acc.checked_add(line))
            })
            .ok_or(Problem::AmountOverflow)
    }

    /// Shipping fee for the country's tier table (or the fallback tiers).
    pub fn shipping(&self, country: &str, subtotal: Money) -> Money {
        self.config.shipping.fee_for(country, subtotal)
    }

    /// Membership discount plus coupon discount.
    ///
    /// The two parts are independent and always added together:
    /// - membership: the tier's rate of the subtotal; for tiers without a
    ///   rate, a flat 20 once the subtotal exceeds 3000
    /// - coupon: the code's rate of the subtotal; an unknown (non-blank) code
    ///   adds nothing and records [`Warning::UnknownCoupon`]
    pub fn discount(
        &self,
        invoice: &Invoice,
        subtotal: Money,
        warnings: &mut Vec<Warning>,
    ) -> Result<Money, Problem> {
        let membership_part = match self.config.membership.rate_for(&invoice.membership) {
            Some(rate) => subtotal.apply_rate(rate),
            None if subtotal > Money::from_units(NON_MEMBER_DISCOUNT_THRESHOLD) => {
                Some(Money::from_units(NON_MEMBER_FLAT_DISCOUNT))
            }
            None => Some(Money::zero()),
        };

        let coupon_part = match invoice.coupon_code() {
            None => Some(Money::zero()),
            Some(code) => match self.config.coupons.rate_for(code) {
                Some(rate) => subtotal.apply_rate(rate),
                None => {
                    warn!(invoice_id = %invoice.invoice_id, coupon = code, "Unknown coupon code");
                    warnings.push(Warning::UnknownCoupon);
                    Some(Money::zero())
                }
            },
        };

        membership_part
            .zip(coupon_part)
            .and_then(|(membership, coupon)| membership.checked_add(coupon))
            .ok_or(Problem::AmountOverflow)
    }

    /// Tax on the discounted subtotal: `(subtotal - discount) × rate`.
    pub fn tax(&self, country: &str, subtotal: Money, discount: Money) -> Result<Money, Problem> {
        subtotal
            .checked_sub(discount)
            .and_then(|taxable| taxable.apply_rate(self.config.tax.rate_for(country)))
            .ok_or(Problem::AmountOverflow)
    }

    /// 5 per unit on every fragile line.
    pub fn fragile_fee(items: &[LineItem]) -> Result<Money, Problem> {
        let per_unit = Money::from_units(FRAGILE_FEE_PER_UNIT);
        items
            .iter()
            .filter(|item| item.fragile)
            .try_fold(Money::zero(), |acc, item| {
                per_unit
                    .multiply_quantity(item.qty)
                    .and_then(|fee| acc.checked_add(fee))
            })
            .ok_or(Problem::AmountOverflow)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
