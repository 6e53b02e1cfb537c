//! Manufacturer's suggested retail price (MSRP) display policy.

use minicart_core::{MsrpDisplay, Product};

/// Decides whether the real price hides behind the MSRP.
pub trait MsrpPolicy: Send + Sync {
    /// The product's price is only revealed at order confirmation.
    fn is_show_before_order_confirm(&self, product: &Product) -> bool;

    /// The lowest sellable price is strictly below the MSRP.
    fn is_minimal_price_less_msrp(&self, product: &Product) -> bool;
}

/// MSRP policy backed by store configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredMsrp {
    pub enabled: bool,
    /// Applied to products whose display type is `UseConfig`.
    pub default_display: MsrpDisplay,
}

impl ConfiguredMsrp {
    fn display_for(&self, product: &Product) -> MsrpDisplay {
        match product.msrp_display {
            MsrpDisplay::UseConfig => self.default_display,
            display => display,
        }
    }
}

impl MsrpPolicy for ConfiguredMsrp {
    fn is_show_before_order_confirm(&self, product: &Product) -> bool {
        self.enabled && self.display_for(product) == MsrpDisplay::BeforeOrderConfirm
    }

    fn is_minimal_price_less_msrp(&self, product: &Product) -> bool {
        let Some(msrp) = product.msrp.filter(|msrp| msrp.is_sign_positive() && !msrp.is_zero())
        else {
            return false;
        };
        product.minimal_price.unwrap_or(product.price) < msrp
    }
}

#[cfg(test)]
mod tests {
    use minicart_core::{ProductType, Visibility};
    use rust_decimal::Decimal;

    use super::*;

    fn product(msrp: Option<i64>, minimal: Option<i64>, display: MsrpDisplay) -> Product {
        Product {
            id: 1.into(),
            sku: "WJ01".to_string(),
            name: "Stellar Solar Jacket".to_string(),
            url_key: None,
            visibility: Visibility::Both,
            type_id: ProductType::Simple,
            price: Decimal::new(75, 0),
            image: None,
            msrp: msrp.map(|m| Decimal::new(m, 0)),
            msrp_display: display,
            minimal_price: minimal.map(|m| Decimal::new(m, 0)),
        }
    }

    const POLICY: ConfiguredMsrp = ConfiguredMsrp {
        enabled: true,
        default_display: MsrpDisplay::BeforeOrderConfirm,
    };

    #[test]
    fn test_use_config_inherits_default_display() {
        assert!(POLICY.is_show_before_order_confirm(&product(None, None, MsrpDisplay::UseConfig)));
        assert!(!POLICY.is_show_before_order_confirm(&product(None, None, MsrpDisplay::InCart)));
    }

    #[test]
    fn test_disabled_never_shows() {
        let policy = ConfiguredMsrp {
            enabled: false,
            ..POLICY
        };
        assert!(!policy.is_show_before_order_confirm(&product(
            Some(100),
            None,
            MsrpDisplay::BeforeOrderConfirm
        )));
    }

    #[test]
    fn test_minimal_price_less_msrp() {
        assert!(POLICY.is_minimal_price_less_msrp(&product(Some(100), Some(60), MsrpDisplay::UseConfig)));
        // Falls back to the regular price when no minimal price is known.
        assert!(POLICY.is_minimal_price_less_msrp(&product(Some(100), None, MsrpDisplay::UseConfig)));
        assert!(!POLICY.is_minimal_price_less_msrp(&product(Some(60), Some(60), MsrpDisplay::UseConfig)));
        assert!(!POLICY.is_minimal_price_less_msrp(&product(None, Some(60), MsrpDisplay::UseConfig)));
        assert!(!POLICY.is_minimal_price_less_msrp(&product(Some(0), Some(0), MsrpDisplay::UseConfig)));
    }
}
