//! # Validation Module
//!
//! Structural checks an invoice must pass before any money is computed.
//!
//! ## Collect Everything, Then Refuse
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Order                                   │
//! │                                                                         │
//! │  invoice absent?      → [MissingInvoice] and stop                      │
//! │  invoice_id blank?    → MissingInvoiceId                               │
//! │  customer_id blank?   → MissingCustomerId                              │
//! │  no items?            → NoItems                                        │
//! │  for each item:                                                        │
//! │    sku empty?         → MissingSku                                     │
//! │    qty <= 0?          → InvalidQuantity { sku }                        │
//! │    price < 0?         → InvalidPrice { sku }                           │
//! │    category unknown?  → UnknownCategory { sku }                        │
//! │                                                                         │
//! │  Every check runs even after an earlier one fails; the caller sees     │
//! │  the full list, in this order, joined with "; ".                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use invoice_core::validation::check;
//! use invoice_core::{Invoice, LineItem, Money};
//!
//! let invoice = Invoice::new("", "C-1", "TH")
//!     .with_item(LineItem::new("A", "book", Money::from_units(10), 0));
//!
//! let err = check(Some(&invoice)).unwrap_err();
//! assert_eq!(err.to_string(), "Missing invoice_id; Invalid qty for A");
//! ```

use crate::error::{Problem, ValidationError, ValidationResult};
use crate::types::{Category, Invoice, LineItem};

/// Lists every problem with an invoice, in rule order. Empty means valid.
pub fn validate(invoice: Option<&Invoice>) -> Vec<Problem> {
    let Some(invoice) = invoice else {
        return vec![Problem::MissingInvoice];
    };

    let mut problems = Vec::new();

    if is_blank(&invoice.invoice_id) {
        problems.push(Problem::MissingInvoiceId);
    }
    if is_blank(&invoice.customer_id) {
        problems.push(Problem::MissingCustomerId);
    }
    if invoice.items.is_empty() {
        problems.push(Problem::NoItems);
    }
    for item in &invoice.items {
        collect_item_problems(item, &mut problems);
    }

    problems
}

/// Passes a valid invoice through, or refuses it with every problem found.
pub fn check(invoice: Option<&Invoice>) -> ValidationResult<&Invoice> {
    let problems = validate(invoice);
    match invoice {
        Some(invoice) if problems.is_empty() => Ok(invoice),
        _ => Err(ValidationError::new(problems)),
    }
}

/// The four per-item rules. Each runs independently.
fn collect_item_problems(item: &LineItem, problems: &mut Vec<Problem>) {
    // Only the ids are trimmed; a whitespace sku is still a sku
    if item.sku.is_empty() {
        problems.push(Problem::MissingSku);
    }
    if item.qty <= 0 {
        problems.push(Problem::InvalidQuantity {
            sku: item.sku.clone(),
        });
    }
    if item.unit_price.is_negative() {
        problems.push(Problem::InvalidPrice {
            sku: item.sku.clone(),
        });
    }
    if item.category.parse::<Category>().is_err() {
        problems.push(Problem::UnknownCategory {
            sku: item.sku.clone(),
        });
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn book(sku: &str) -> LineItem {
        LineItem::new(sku, "book", Money::from_units(100), 2)
    }

    fn valid_invoice() -> Invoice {
        Invoice::new("I-001", "C-001", "TH").with_item(book("A"))
    }

    #[test]
    fn test_valid_invoice_has_no_problems() {
        let invoice = valid_invoice();
        assert!(validate(Some(&invoice)).is_empty());
        assert!(check(Some(&invoice)).is_ok());
    }

    #[test]
    fn test_missing_invoice_short_circuits() {
        assert_eq!(validate(None), vec![Problem::MissingInvoice]);
        let err = check(None).unwrap_err();
        assert_eq!(err.to_string(), "Invoice is missing");
    }

    #[test]
    fn test_blank_ids() {
        let mut invoice = valid_invoice();
        invoice.invoice_id = String::new();
        invoice.customer_id = "   ".to_string();
        assert_eq!(
            validate(Some(&invoice)),
            vec![Problem::MissingInvoiceId, Problem::MissingCustomerId]
        );
    }

    #[test]
    fn test_empty_items() {
        let invoice = Invoice::new("I-001", "C-001", "TH");
        assert_eq!(validate(Some(&invoice)), vec![Problem::NoItems]);
    }

    #[test]
    fn test_item_rules_all_run() {
        let invoice = Invoice::new("I-001", "C-001", "TH").with_item(LineItem::new(
            "",
            "toys",
            Money::from_units(-1),
            0,
        ));
        let err = check(Some(&invoice)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Item sku is missing; Invalid qty for ; Invalid price for ; Unknown category for "
        );
    }

    #[test]
    fn test_problems_follow_item_order() {
        let invoice = Invoice::new("I-001", "C-001", "TH")
            .with_item(LineItem::new("A", "book", Money::from_units(1), -3))
            .with_item(LineItem::new("B", "gadgets", Money::from_units(1), 1))
            .with_item(LineItem::new("C", "food", Money::from_cents(-1), 1));

        assert_eq!(
            validate(Some(&invoice)),
            vec![
                Problem::InvalidQuantity {
                    sku: "A".to_string()
                },
                Problem::UnknownCategory {
                    sku: "B".to_string()
                },
                Problem::InvalidPrice {
                    sku: "C".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_header_problems_precede_item_problems() {
        let invoice = Invoice::new("", "", "TH")
            .with_item(LineItem::new("A", "book", Money::from_units(1), 0));
        let err = check(Some(&invoice)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing invoice_id; Missing customer_id; Invalid qty for A"
        );
    }

    #[test]
    fn test_whitespace_sku_is_not_missing() {
        let invoice = Invoice::new("I-001", "C-001", "TH")
            .with_item(LineItem::new("  ", "book", Money::from_units(10), 1));
        assert!(validate(Some(&invoice)).is_empty());
        assert!(check(Some(&invoice)).is_ok());
    }

    #[test]
    fn test_zero_price_is_allowed() {
        let invoice = Invoice::new("I-001", "C-001", "TH")
            .with_item(LineItem::new("FREE", "other", Money::zero(), 1));
        assert!(check(Some(&invoice)).is_ok());
    }
}
