//! # Rate Tables
//!
//! Read-only lookup tables that drive shipping, tax and discounts.
//!
//! ## Built-in Tables
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SHIPPING (first tier whose threshold is above the subtotal wins)      │
//! │    TH  subtotal < 500 → 60                      else free               │
//! │    JP  subtotal < 4000 → 600                    else free               │
//! │    US  subtotal < 200 → 15, < 300 → 8           else free               │
//! │    *   subtotal < 200 → 25                      else free               │
//! │                                                                         │
//! │  TAX           TH 7%   JP 10%   US 8%   * 5%                            │
//! │  COUPONS       WELCOME10 10%   VIP20 20%   STUDENT5 5%                  │
//! │  MEMBERSHIP    gold 3%   platinum 5%                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every table can be replaced wholesale through
//! [`CalculatorConfig`](crate::config::CalculatorConfig). None of them can be
//! changed once a calculator has been built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ConfigError, ConfigResult};
use crate::money::Money;
use crate::types::Rate;

// =============================================================================
// Shipping
// =============================================================================

/// One shipping tier: orders whose subtotal is below `below` pay `fee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingTier {
    pub below: Money,
    pub fee: Money,
}

impl ShippingTier {
    pub fn new(below: Money, fee: Money) -> Self {
        ShippingTier { below, fee }
    }

    fn units(below: i64, fee: i64) -> Self {
        ShippingTier::new(Money::from_units(below), Money::from_units(fee))
    }
}

/// Per-country shipping tiers plus the tiers used for unlisted countries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingTable {
    #[serde(default)]
    pub countries: BTreeMap<String, Vec<ShippingTier>>,

    #[serde(default = "default_shipping_fallback")]
    pub fallback: Vec<ShippingTier>,
}

fn default_shipping_fallback() -> Vec<ShippingTier> {
    vec![ShippingTier::units(200, 25)]
}

impl Default for ShippingTable {
    fn default() -> Self {
        let countries = BTreeMap::from([
            ("TH".to_string(), vec![ShippingTier::units(500, 60)]),
            ("JP".to_string(), vec![ShippingTier::units(4000, 600)]),
            (
                "US".to_string(),
                vec![ShippingTier::units(200, 15), ShippingTier::units(300, 8)],
            ),
        ]);
        ShippingTable {
            countries,
            fallback: default_shipping_fallback(),
        }
    }
}

impl ShippingTable {
    /// Tiers that apply to a country.
    pub fn tiers_for(&self, country: &str) -> &[ShippingTier] {
        self.countries
            .get(country)
            .map(Vec::as_slice)
            .unwrap_or(self.fallback.as_slice())
    }

    /// Shipping fee for a subtotal: the fee of the first tier the subtotal is
    /// strictly below, or zero once every threshold is met.
    pub fn fee_for(&self, country: &str, subtotal: Money) -> Money {
        self.tiers_for(country)
            .iter()
            .find(|tier| subtotal < tier.below)
            .map(|tier| tier.fee)
            .unwrap_or_else(Money::zero)
    }

    /// Thresholds strictly ascending, fees non-negative and non-increasing.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_tiers("fallback", &self.fallback)?;
        for (country, tiers) in &self.countries {
            validate_tiers(country, tiers)?;
        }
        Ok(())
    }
}

fn validate_tiers(name: &str, tiers: &[ShippingTier]) -> ConfigResult<()> {
    for tier in tiers {
        if tier.below.is_negative() || tier.fee.is_negative() {
            return Err(ConfigError::InvalidConfig(format!(
                "shipping tiers for {} must not be negative",
                name
            )));
        }
    }
    for pair in tiers.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if upper.below <= lower.below {
            return Err(ConfigError::InvalidConfig(format!(
                "shipping thresholds for {} must be strictly ascending",
                name
            )));
        }
        if upper.fee > lower.fee {
            return Err(ConfigError::InvalidConfig(format!(
                "shipping fees for {} must not increase with the subtotal",
                name
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Tax
// =============================================================================

/// Flat per-country tax rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    #[serde(default)]
    pub countries: BTreeMap<String, Rate>,

    #[serde(default = "default_tax_fallback")]
    pub fallback: Rate,
}

fn default_tax_fallback() -> Rate {
    Rate::from_bps(500)
}

impl Default for TaxTable {
    fn default() -> Self {
        let countries = BTreeMap::from([
            ("TH".to_string(), Rate::from_bps(700)),
            ("JP".to_string(), Rate::from_bps(1000)),
            ("US".to_string(), Rate::from_bps(800)),
        ]);
        TaxTable {
            countries,
            fallback: default_tax_fallback(),
        }
    }
}

impl TaxTable {
    pub fn rate_for(&self, country: &str) -> Rate {
        self.countries.get(country).copied().unwrap_or(self.fallback)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_rate("tax fallback", self.fallback)?;
        for (country, rate) in &self.countries {
            validate_rate(&format!("tax rate for {}", country), *rate)?;
        }
        Ok(())
    }
}

// =============================================================================
// Coupons
// =============================================================================

/// Coupon code → percentage off the subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponTable(BTreeMap<String, Rate>);

impl Default for CouponTable {
    fn default() -> Self {
        CouponTable(BTreeMap::from([
            ("WELCOME10".to_string(), Rate::from_bps(1000)),
            ("VIP20".to_string(), Rate::from_bps(2000)),
            ("STUDENT5".to_string(), Rate::from_bps(500)),
        ]))
    }
}

impl CouponTable {
    pub fn new(codes: BTreeMap<String, Rate>) -> Self {
        CouponTable(codes)
    }

    /// Exact, case-sensitive lookup. Callers trim the code first.
    pub fn rate_for(&self, code: &str) -> Option<Rate> {
        self.0.get(code).copied()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (code, rate) in &self.0 {
            validate_rate(&format!("coupon {}", code), *rate)?;
        }
        Ok(())
    }
}

// =============================================================================
// Membership
// =============================================================================

/// Membership tier → percentage off the subtotal.
///
/// A tier listed here never receives the flat non-member discount. The
/// membership-upgrade advisory does not consult this table: it is fixed to
/// [`PREMIUM_TIERS`](crate::PREMIUM_TIERS), so overriding the table changes
/// who gets a discount but not who is advised to upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipTable(BTreeMap<String, Rate>);

impl Default for MembershipTable {
    fn default() -> Self {
        MembershipTable(BTreeMap::from([
            ("gold".to_string(), Rate::from_bps(300)),
            ("platinum".to_string(), Rate::from_bps(500)),
        ]))
    }
}

impl MembershipTable {
    pub fn new(tiers: BTreeMap<String, Rate>) -> Self {
        MembershipTable(tiers)
    }

    pub fn rate_for(&self, tier: &str) -> Option<Rate> {
        self.0.get(tier).copied()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (tier, rate) in &self.0 {
            validate_rate(&format!("membership tier {}", tier), *rate)?;
        }
        Ok(())
    }
}

fn validate_rate(name: &str, rate: Rate) -> ConfigResult<()> {
    if rate.bps() > Rate::MAX_BPS {
        return Err(ConfigError::InvalidConfig(format!(
            "{} must be between 0 and {} bps, got {}",
            name,
            Rate::MAX_BPS,
            rate.bps()
        )));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    #[test]
    fn test_shipping_single_tier_country() {
        let table = ShippingTable::default();
        assert_eq!(table.fee_for("TH", units(400)), units(60));
        assert_eq!(table.fee_for("TH", units(500)), Money::zero());
        assert_eq!(table.fee_for("JP", units(3000)), units(600));
        assert_eq!(table.fee_for("JP", units(4000)), Money::zero());
    }

    #[test]
    fn test_shipping_first_matching_tier_wins() {
        let table = ShippingTable::default();
        assert_eq!(table.fee_for("US", units(50)), units(15));
        assert_eq!(table.fee_for("US", units(150)), units(15));
        assert_eq!(table.fee_for("US", units(200)), units(8));
        assert_eq!(table.fee_for("US", units(250)), units(8));
        assert_eq!(table.fee_for("US", units(300)), Money::zero());
    }

    #[test]
    fn test_shipping_fallback_for_unlisted_country() {
        let table = ShippingTable::default();
        assert_eq!(table.fee_for("UK", units(150)), units(25));
        assert_eq!(table.fee_for("UK", units(250)), Money::zero());
        assert_eq!(table.fee_for("", units(199)), units(25));
        // Lookups are case-sensitive: "th" misses the TH table
        assert_eq!(table.fee_for("th", units(150)), units(25));
        assert_eq!(table.fee_for("th", units(400)), Money::zero());
    }

    #[test]
    fn test_shipping_empty_tiers_are_free() {
        let mut table = ShippingTable::default();
        table.countries.insert("SG".to_string(), Vec::new());
        assert_eq!(table.fee_for("SG", Money::zero()), Money::zero());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_shipping_validation_rejects_unordered_tiers() {
        let mut table = ShippingTable::default();
        table.countries.insert(
            "XX".to_string(),
            vec![ShippingTier::units(300, 8), ShippingTier::units(100, 15)],
        );
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_shipping_validation_rejects_increasing_fees() {
        let mut table = ShippingTable::default();
        table.fallback = vec![ShippingTier::units(100, 5), ShippingTier::units(200, 10)];
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_shipping_validation_rejects_negative_fee() {
        let mut table = ShippingTable::default();
        table.fallback = vec![ShippingTier::new(units(100), units(-1))];
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_tax_rates() {
        let table = TaxTable::default();
        assert_eq!(table.rate_for("TH"), Rate::from_bps(700));
        assert_eq!(table.rate_for("JP"), Rate::from_bps(1000));
        assert_eq!(table.rate_for("US"), Rate::from_bps(800));
        assert_eq!(table.rate_for("DE"), Rate::from_bps(500));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_tax_validation_rejects_over_100_percent() {
        let mut table = TaxTable::default();
        table.fallback = Rate::from_bps(10_001);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_coupon_lookup_is_exact() {
        let table = CouponTable::default();
        assert_eq!(table.rate_for("WELCOME10"), Some(Rate::from_bps(1000)));
        assert_eq!(table.rate_for("VIP20"), Some(Rate::from_bps(2000)));
        assert_eq!(table.rate_for("STUDENT5"), Some(Rate::from_bps(500)));
        assert_eq!(table.rate_for("welcome10"), None);
        assert_eq!(table.rate_for("INVALID99"), None);
    }

    #[test]
    fn test_membership_tiers() {
        let table = MembershipTable::default();
        assert_eq!(table.rate_for("gold"), Some(Rate::from_bps(300)));
        assert_eq!(table.rate_for("platinum"), Some(Rate::from_bps(500)));
        assert_eq!(table.rate_for("none"), None);
    }

    #[test]
    fn test_default_tables_are_valid() {
        assert!(ShippingTable::default().validate().is_ok());
        assert!(TaxTable::default().validate().is_ok());
        assert!(CouponTable::default().validate().is_ok());
        assert!(MembershipTable::default().validate().is_ok());
    }
}
