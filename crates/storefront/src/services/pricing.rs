//! Price formatting.

use rust_decimal::Decimal;

use minicart_core::{CurrencyCode, Price};

use crate::sections::SectionError;

/// Renders amounts for display.
pub trait PriceFormatter: Send + Sync {
    /// # Errors
    ///
    /// Returns `SectionError` if the amount cannot be formatted.
    fn format_price(&self, amount: Decimal) -> Result<String, SectionError>;
}

/// Formats amounts in the store currency, wrapped in a price container span.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyFormatter {
    currency: CurrencyCode,
}

impl CurrencyFormatter {
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self { currency }
    }
}

impl PriceFormatter for CurrencyFormatter {
    fn format_price(&self, amount: Decimal) -> Result<String, SectionError> {
        Ok(format!(
            "<span class=\"price\">{}</span>",
            Price::new(amount, self.currency).display()
        ))
    }
}
