//! Cart summary and checkout availability policies.

use std::str::FromStr;

use minicart_core::{Qty, Quote};

use crate::sections::SectionError;

/// Computes the number shown on the mini-cart badge.
pub trait CartSummary: Send + Sync {
    /// # Errors
    ///
    /// Returns `SectionError` if the quote's quantities cannot be read.
    fn summary_qty(&self, quote: &Quote) -> Result<Qty, SectionError>;
}

/// Whether the storefront offers one-page checkout.
pub trait CheckoutPolicy: Send + Sync {
    fn can_onepage_checkout(&self) -> bool;
}

/// What the cart summary counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryMode {
    /// Total quantity across visible lines.
    #[default]
    ItemsQty,
    /// Number of visible lines.
    ItemsCount,
}

impl CartSummary for SummaryMode {
    fn summary_qty(&self, quote: &Quote) -> Result<Qty, SectionError> {
        match self {
            Self::ItemsQty => Ok(quote.items_qty()?),
            Self::ItemsCount => {
                let count = i64::try_from(quote.items_count()).unwrap_or(i64::MAX);
                Ok(Qty::from(count))
            }
        }
    }
}

impl FromStr for SummaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qty" => Ok(Self::ItemsQty),
            "count" => Ok(Self::ItemsCount),
            other => Err(format!("expected 'qty' or 'count', got '{other}'")),
        }
    }
}

/// Checkout policy read from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredCheckout {
    pub onepage_enabled: bool,
}

impl CheckoutPolicy for ConfiguredCheckout {
    fn can_onepage_checkout(&self) -> bool {
        self.onepage_enabled
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minicart_core::{CurrencyCode, StoreId};

    use super::*;

    fn quote_with_lines() -> Quote {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        let catalog = crate::catalog::Catalog::from_json_str(
            r#"{ "products": [
                { "id": 1, "sku": "A", "name": "A", "visibility": 4, "price": "5.00" },
                { "id": 2, "sku": "B", "name": "B", "visibility": 4, "price": "7.00" }
            ] }"#,
        )
        .unwrap();
        for (id, qty) in [(1, 2_i64), (2, 3_i64)] {
            let product = catalog
                .product(minicart_core::ProductId::new(id))
                .cloned()
                .unwrap();
            quote.add_product(product, Qty::from(qty)).unwrap();
        }
        quote
    }

    #[test]
    fn test_items_qty_sums_quantities() {
        let quote = quote_with_lines();
        assert_eq!(
            SummaryMode::ItemsQty.summary_qty(&quote).unwrap(),
            Qty::from(5_i64)
        );
    }

    #[test]
    fn test_items_count_counts_lines() {
        let quote = quote_with_lines();
        assert_eq!(
            SummaryMode::ItemsCount.summary_qty(&quote).unwrap(),
            Qty::from(2_i64)
        );
    }

    #[test]
    fn test_summary_mode_from_str() {
        assert_eq!("QTY".parse::<SummaryMode>().unwrap(), SummaryMode::ItemsQty);
        assert_eq!(
            "count".parse::<SummaryMode>().unwrap(),
            SummaryMode::ItemsCount
        );
        assert!("lines".parse::<SummaryMode>().is_err());
    }
}
