//! # Calculator Configuration
//!
//! The rate tables a calculator is built with.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     INVOICE_DEFAULT_TAX_BPS=600                                        │
//! │                                                                         │
//! │  2. TOML Rate File                                                     │
//! │     explicit path, else $INVOICE_RATES_PATH, else                      │
//! │     ~/.config/invoice-engine/rates.toml (Linux)                        │
//! │     ~/Library/Application Support/com.invoice.invoice-engine/...       │
//! │                                                                         │
//! │  3. Built-in Tables (lowest priority)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A section present in the file replaces the built-in table entirely;
//! an absent section keeps it.
//!
//! ## Rate File Format
//! ```toml
//! [shipping.countries]
//! TH = [{ below = 500, fee = 60 }]
//! US = [{ below = 200, fee = 15 }, { below = 300, fee = 8 }]
//!
//! [shipping]
//! fallback = [{ below = 200, fee = 25 }]
//!
//! [tax]
//! fallback = 500          # basis points
//!
//! [tax.countries]
//! TH = 700
//!
//! [coupons]
//! WELCOME10 = 1000
//!
//! [membership]
//! gold = 300
//! platinum = 500
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::rates::{CouponTable, MembershipTable, ShippingTable, TaxTable};
use crate::types::Rate;

/// Environment variable naming the rate file when no path is passed.
pub const RATES_PATH_ENV: &str = "INVOICE_RATES_PATH";

/// Environment variable overriding the fallback tax rate (basis points).
pub const DEFAULT_TAX_BPS_ENV: &str = "INVOICE_DEFAULT_TAX_BPS";

/// Complete rate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Shipping tiers per country.
    #[serde(default)]
    pub shipping: ShippingTable,

    /// Tax rate per country.
    #[serde(default)]
    pub tax: TaxTable,

    /// Coupon codes.
    #[serde(default)]
    pub coupons: CouponTable,

    /// Membership tier discounts.
    #[serde(default)]
    pub membership: MembershipTable,
}

impl CalculatorConfig {
    /// The built-in tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML rate document and validates it.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: CalculatorConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Built-in tables
    /// 2. Rate file (rates.toml), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading rate tables from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Rate file not found, using built-in tables");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns the built-in tables if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load rate tables: {}. Using built-in tables.", e);
            Self::default()
        })
    }

    /// Writes the tables as pretty TOML.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Rate tables saved");
        Ok(())
    }

    /// Checks every table.
    pub fn validate(&self) -> ConfigResult<()> {
        self.shipping.validate()?;
        self.tax.validate()?;
        self.coupons.validate()?;
        self.membership.validate()?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(bps) = std::env::var(DEFAULT_TAX_BPS_ENV) {
            match bps.trim().parse::<u32>() {
                Ok(bps) => {
                    debug!(bps, "Overriding fallback tax rate from environment");
                    self.tax.fallback = Rate::from_bps(bps);
                }
                Err(_) => warn!(value = %bps, "Ignoring non-numeric {}", DEFAULT_TAX_BPS_ENV),
            }
        }
    }

    /// `$INVOICE_RATES_PATH`, else the platform config directory.
    fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(RATES_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("com", "invoice", "invoice-engine")
            .map(|dirs| dirs.config_dir().join("rates.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::rates::ShippingTier;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("invoice-core-{}-{}", std::process::id(), name))
            .join("rates.toml")
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = CalculatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tax.rate_for("TH"), Rate::from_bps(700));
    }

    #[test]
    fn test_partial_override_keeps_other_tables() {
        let config = CalculatorConfig::from_toml_str(
            r#"
            [coupons]
            SPRING15 = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.coupons.rate_for("SPRING15"), Some(Rate::from_bps(1500)));
        // The coupon table was replaced, not merged
        assert_eq!(config.coupons.rate_for("WELCOME10"), None);
        // Untouched sections keep their defaults
        assert_eq!(config.tax, TaxTable::default());
        assert_eq!(config.shipping, ShippingTable::default());
        assert_eq!(config.membership, MembershipTable::default());
    }

    #[test]
    fn test_shipping_override() {
        let config = CalculatorConfig::from_toml_str(
            r#"
            [shipping]
            fallback = [{ below = 100, fee = 10 }]

            [shipping.countries]
            SG = [{ below = 80, fee = "12.50" }]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.shipping.tiers_for("SG"),
            &[ShippingTier::new(Money::from_units(80), Money::from_cents(1250))]
        );
        assert_eq!(
            config.shipping.fee_for("TH", Money::from_units(50)),
            Money::from_units(10)
        );
    }

    #[test]
    fn test_invalid_rate_is_rejected() {
        let err = CalculatorConfig::from_toml_str(
            r#"
            [membership]
            gold = 20000
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml_is_load_error() {
        let err = CalculatorConfig::from_toml_str("[tax\nfallback = ").unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut config = CalculatorConfig::default();
        config.tax.fallback = Rate::from_bps(650);

        config.save(&path).unwrap();
        let loaded = CalculatorConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.tax.fallback, config.tax.fallback);
        assert_eq!(loaded.shipping, config.shipping);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = temp_path("does-not-exist");
        let config = CalculatorConfig::load_or_default(Some(path));
        assert_eq!(config.coupons, CouponTable::default());
    }

    #[test]
    fn test_example_rate_file_parses() {
        let config =
            CalculatorConfig::from_toml_str(include_str!("../rates.example.toml")).unwrap();
        assert_eq!(config, CalculatorConfig::default());
    }
}
