//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::sections::{CartSectionSource, SectionPool};
use crate::services::{
    Collaborators, ConfiguredCheckout, ConfiguredMsrp, CurrencyFormatter, MediaImageResolver,
    RouteUrlBuilder,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, configuration and registered sections.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    cart: CartSectionSource,
    sections: SectionPool,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product catalog, also used for URL rewrite lookups
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Arc<Catalog>) -> Self {
        let services = collaborators(&config, Arc::clone(&catalog));
        let cart = CartSectionSource::new(services, config.store_id, config.currency_code);
        let sections = SectionPool::new().with_source(Arc::new(cart.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
                sections,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the cart section source.
    #[must_use]
    pub fn cart(&self) -> &CartSectionSource {
        &self.inner.cart
    }

    /// Get the registered customer-data sections.
    #[must_use]
    pub fn sections(&self) -> &SectionPool {
        &self.inner.sections
    }
}

/// Wire the default collaborators from configuration.
#[must_use]
pub fn collaborators(config: &StorefrontConfig, catalog: Arc<Catalog>) -> Collaborators {
    let urls = Arc::new(RouteUrlBuilder::new(config.base_url.clone()));

    Collaborators {
        summary: Arc::new(config.cart.summary_mode),
        checkout: Arc::new(ConfiguredCheckout {
            onepage_enabled: config.cart.onepage_checkout_enabled,
        }),
        prices: Arc::new(CurrencyFormatter::new(config.currency_code)),
        rewrites: catalog,
        images: Arc::new(MediaImageResolver::new(config.media_url.clone())),
        msrp: Arc::new(ConfiguredMsrp {
            enabled: config.cart.msrp_enabled,
            default_display: config.cart.msrp_display,
        }),
        urls: urls.clone(),
        product_urls: urls,
    }
}
