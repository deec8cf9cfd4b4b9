//! # Domain Types
//!
//! Core domain types used throughout invoice-core.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │   │    LineItem     │   │  InvoiceTotal   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  invoice_id     │   │  sku            │   │  subtotal       │       │
//! │  │  customer_id    │◄──│  category       │   │  shipping       │       │
//! │  │  country        │   │  unit_price     │   │  discount, tax  │       │
//! │  │  membership     │   │  qty            │   │  total          │       │
//! │  │  coupon         │   │  fragile        │   │  warnings       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │    Category     │   │    Warning      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Book, Food     │   │  UnknownCoupon  │       │
//! │  │  700 = 7%       │   │  Electronics    │   │  Membership-    │       │
//! │  └─────────────────┘   │  Other          │   │   Upgrade       │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Raw Input, Checked Later
//! `Invoice` and `LineItem` hold exactly what the caller sent (strings for
//! category and membership, a signed quantity). Nothing is rejected at
//! construction or deserialization time; the validator reports every problem
//! at once instead.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 700 bps = 7% (Thai VAT), 1000 bps = 10% (WELCOME10 coupon)
///
/// Used for tax rates, coupon rates and membership discounts alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(u32);

impl Rate {
    /// 100%.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact decimal fraction (700 bps → 0.0700).
    #[inline]
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Category
// =============================================================================

/// The fixed set of product categories an invoice line may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Book,
    Food,
    Electronics,
    Other,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 4] = [
        Category::Book,
        Category::Food,
        Category::Electronics,
        Category::Other,
    ];

    /// The wire name of the category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Book => "book",
            Category::Food => "food",
            Category::Electronics => "electronics",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the wire name.
impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("Unknown category: '{}'", s))
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Category wire name; see [`Category`].
    pub category: String,

    /// Price per unit.
    pub unit_price: Money,

    /// Units ordered. Signed so that bad input can be reported, not rejected.
    pub qty: i64,

    /// Fragile lines pay a per-unit handling surcharge.
    #[serde(default)]
    pub fragile: bool,
}

impl LineItem {
    /// Creates a non-fragile line.
    pub fn new(
        sku: impl Into<String>,
        category: impl Into<String>,
        unit_price: Money,
        qty: i64,
    ) -> Self {
        LineItem {
            sku: sku.into(),
            category: category.into(),
            unit_price,
            qty,
            fragile: false,
        }
    }

    /// Marks the line as fragile (or not).
    pub fn with_fragile(mut self, fragile: bool) -> Self {
        self.fragile = fragile;
        self
    }

    /// Parsed category, if it is one of the known ones.
    pub fn category(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    /// unit_price × qty, or `None` if the product overflows.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.multiply_quantity(self.qty)
    }
}

// =============================================================================
// Invoice
// =============================================================================

fn default_membership() -> String {
    "none".to_string()
}

/// A customer invoice awaiting its total.
///
/// Built by the caller per request, read once by the calculator, then dropped.
/// The calculator never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub customer_id: String,

    /// Country code used for shipping and tax lookups (e.g. "TH", "US").
    pub country: String,

    /// Membership tier ("gold", "platinum"); anything else means no membership.
    #[serde(default = "default_membership")]
    pub membership: String,

    /// Coupon code, if the customer entered one.
    #[serde(default)]
    pub coupon: Option<String>,

    pub items: Vec<LineItem>,
}

impl Invoice {
    /// Creates an invoice with no membership, no coupon and no items.
    pub fn new(
        invoice_id: impl Into<String>,
        customer_id: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Invoice {
            invoice_id: invoice_id.into(),
            customer_id: customer_id.into(),
            country: country.into(),
            membership: default_membership(),
            coupon: None,
            items: Vec::new(),
        }
    }

    pub fn with_membership(mut self, membership: impl Into<String>) -> Self {
        self.membership = membership.into();
        self
    }

    pub fn with_coupon(mut self, coupon: impl Into<String>) -> Self {
        self.coupon = Some(coupon.into());
        self
    }

    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    /// The coupon code with surrounding whitespace removed, if any is left.
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

// =============================================================================
// Warnings
// =============================================================================

/// Non-fatal advisory returned next to a computed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Warning {
    /// A coupon was entered but is not in the coupon table.
    UnknownCoupon,
    /// A large order was placed without a discounted membership tier.
    MembershipUpgrade,
}

impl Warning {
    /// The advisory text shown to the caller.
    pub const fn message(&self) -> &'static str {
        match self {
            Warning::UnknownCoupon => "Unknown coupon",
            Warning::MembershipUpgrade => "Consider membership upgrade",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<Warning> for String {
    fn from(warning: Warning) -> Self {
        warning.message().to_string()
    }
}

impl TryFrom<String> for Warning {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "Unknown coupon" => Ok(Warning::UnknownCoupon),
            "Consider membership upgrade" => Ok(Warning::MembershipUpgrade),
            _ => Err(format!("Unknown warning: '{}'", s)),
        }
    }
}

impl PartialEq<str> for Warning {
    fn eq(&self, other: &str) -> bool {
        self.message() == other
    }
}

impl PartialEq<&str> for Warning {
    fn eq(&self, other: &&str) -> bool {
        self.message() == *other
    }
}

// =============================================================================
// Invoice Total
// =============================================================================

/// The outcome of a successful calculation.
///
/// `total = max(0, subtotal + shipping + fragile_fee + tax - discount)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotal {
    pub subtotal: Money,
    pub shipping: Money,
    pub discount: Money,
    pub tax: Money,
    pub fragile_fee: Money,
    pub total: Money,
    /// Advisories in the order they were raised.
    pub warnings: Vec<Warning>,
}

impl InvoiceTotal {
    /// Splits into the `(total, warnings)` pair.
    pub fn into_parts(self) -> (Money, Vec<Warning>) {
        (self.total, self.warnings)
    }

    /// Warning texts, in order.
    pub fn warning_messages(&self) -> Vec<&'static str> {
        self.warnings.iter().map(Warning::message).collect()
    }

    pub fn has_warning(&self, warning: Warning) -> bool {
        self.warnings.contains(&warning)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_from_bps() {
        let rate = Rate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert_eq!(rate.as_fraction(), dec!(0.0825));
        assert_eq!(rate.to_string(), "8.25%");
        assert_eq!(Rate::from_bps(700).to_string(), "7.00%");
    }

    #[test]
    fn test_rate_default_is_zero() {
        assert!(Rate::default().is_zero());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("book".parse::<Category>(), Ok(Category::Book));
        assert_eq!("electronics".parse::<Category>(), Ok(Category::Electronics));
        assert_eq!("other".parse::<Category>(), Ok(Category::Other));
        assert!("Book".parse::<Category>().is_err());
        assert!("toys".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_line_total() {
        let item = LineItem::new("A", "book", Money::from_units(100), 2);
        assert_eq!(item.line_total(), Some(Money::from_units(200)));
        assert_eq!(item.category(), Some(Category::Book));
        assert!(!item.fragile);
        assert!(item.with_fragile(true).fragile);
    }

    #[test]
    fn test_coupon_code_trims() {
        let invoice = Invoice::new("I-1", "C-1", "TH");
        assert_eq!(invoice.coupon_code(), None);

        let invoice = invoice.with_coupon("  WELCOME10 ");
        assert_eq!(invoice.coupon_code(), Some("WELCOME10"));

        let blank = Invoice::new("I-1", "C-1", "TH").with_coupon("   ");
        assert_eq!(blank.coupon_code(), None);
    }

    #[test]
    fn test_invoice_json_defaults() {
        let json = r#"{
            "invoice_id": "I-001",
            "customer_id": "C-001",
            "country": "TH",
            "items": [
                { "sku": "A", "category": "book", "unit_price": "100.00", "qty": 2 }
            ]
        }"#;
        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.membership, "none");
        assert_eq!(invoice.coupon, None);
        assert!(!invoice.items[0].fragile);
        assert_eq!(invoice.items[0].line_total(), Some(Money::from_units(200)));
    }

    #[test]
    fn test_warning_text_and_serde() {
        assert_eq!(Warning::UnknownCoupon.to_string(), "Unknown coupon");
        assert_eq!(Warning::MembershipUpgrade, "Consider membership upgrade");

        let json = serde_json::to_string(&vec![Warning::UnknownCoupon]).unwrap();
        assert_eq!(json, r#"["Unknown coupon"]"#);
        let back: Vec<Warning> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Warning::UnknownCoupon]);
    }
}
