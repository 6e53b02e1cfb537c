//! Cart section: the mini-cart snapshot.
//!
//! The snapshot carries the cart badge count, the formatted subtotal, whether
//! one-page checkout may start, and the visible line items newest first. Its
//! field names are consumed verbatim by client-side widgets.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tokio::sync::OnceCell;
use tower_sessions::Session;
use tracing::instrument;

use minicart_core::{
    CurrencyCode, ItemId, LineItem, ProductId, ProductType, Qty, Quote, RewriteRecord, StoreId,
};

use super::{SectionError, SectionSource};
use crate::services::{Collaborators, ImageContext, ImageDescriptor, QuoteSource, SessionQuoteSource};

/// Route of the item configuration page.
pub const CONFIGURE_ROUTE: &str = "checkout/cart/configure";

// =============================================================================
// Snapshot Types
// =============================================================================

/// Formatted subtotal, or `0` when totals have not been collected yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subtotal {
    Formatted(String),
    NotCollected,
}

impl Serialize for Subtotal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Formatted(price) => serializer.serialize_str(price),
            Self::NotCollected => serializer.serialize_u8(0),
        }
    }
}

/// One mini-cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSectionItem {
    pub product_type: ProductType,
    pub qty: Qty,
    pub item_id: ItemId,
    pub configure_url: String,
    pub is_visible_in_site_visibility: bool,
    pub name: String,
    pub url: String,
    pub has_url: bool,
    pub price: String,
    pub image: ImageDescriptor,
    #[serde(rename = "canApplyMsrp")]
    pub can_apply_msrp: bool,
}

/// The rendered cart section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSection {
    pub summary_count: Qty,
    pub subtotal: Subtotal,
    /// Always empty; the rendering layer supplies the message.
    pub cart_empty_message: String,
    pub possible_onepage_checkout: bool,
    pub items: Vec<CartSectionItem>,
}

// =============================================================================
// Builder
// =============================================================================

/// Per-build overrides.
#[derive(Debug, Clone, Default)]
pub struct CartSectionOptions {
    /// Badge count to show instead of the policy-computed one. Zero is
    /// treated as unset.
    pub summary_qty: Option<Qty>,
    /// Quote to list items from instead of the active one (multi-address
    /// checkout renders one section per address quote).
    pub custom_quote: Option<Quote>,
}

/// The active quote, fetched on first use and reused for the rest of a build.
struct ActiveQuote<'a> {
    source: &'a dyn QuoteSource,
    cell: OnceCell<Quote>,
}

impl<'a> ActiveQuote<'a> {
    fn new(source: &'a dyn QuoteSource) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    async fn get(&self) -> Result<&Quote, SectionError> {
        self.cell
            .get_or_try_init(|| self.source.active_quote())
            .await
    }
}

/// Assembles a [`CartSection`] from a quote and read-only collaborators.
///
/// Holds no per-request state; one instance may serve many builds.
#[derive(Debug)]
pub struct CartSectionBuilder<'a> {
    services: &'a Collaborators,
    options: CartSectionOptions,
}

impl<'a> CartSectionBuilder<'a> {
    #[must_use]
    pub const fn new(services: &'a Collaborators, options: CartSectionOptions) -> Self {
        Self { services, options }
    }

    /// Build the cart section for the session's active quote.
    ///
    /// # Errors
    ///
    /// Returns `SectionError` if the quote cannot be resolved or any
    /// collaborator fails. Items whose hidden product has no URL rewrite are
    /// dropped rather than reported.
    #[instrument(skip_all)]
    pub async fn build(&self, quotes: &dyn QuoteSource) -> Result<CartSection, SectionError> {
        let active = ActiveQuote::new(quotes);

        let summary_count = self.summary_count(&active).await?;
        let items = if summary_count.is_zero() {
            Vec::new()
        } else {
            let source = match &self.options.custom_quote {
                Some(quote) => quote,
                None => active.get().await?,
            };
            self.recent_items(source)?
        };

        let quote = active.get().await?;
        let subtotal = match quote.totals.subtotal() {
            Some(amount) => Subtotal::Formatted(self.services.prices.format_price(amount)?),
            None => Subtotal::NotCollected,
        };
        let possible_onepage_checkout =
            self.services.checkout.can_onepage_checkout() && !quote.has_error;

        tracing::debug!(
            quote_id = %quote.id,
            %summary_count,
            items = items.len(),
            "Built cart section"
        );

        Ok(CartSection {
            summary_count,
            subtotal,
            cart_empty_message: String::new(),
            possible_onepage_checkout,
            items,
        })
    }

    async fn summary_count(&self, active: &ActiveQuote<'_>) -> Result<Qty, SectionError> {
        match self.options.summary_qty.filter(|qty| !qty.is_zero()) {
            Some(qty) => Ok(qty),
            None => self.services.summary.summary_qty(active.get().await?),
        }
    }

    /// Visible items, newest first, minus hidden products nobody can link to.
    fn recent_items(&self, quote: &Quote) -> Result<Vec<CartSectionItem>, SectionError> {
        let hidden: HashSet<(ProductId, StoreId)> = quote
            .all_visible_items()
            .filter(|item| !item.product.is_visible_in_site_visibility())
            .map(|item| (item.product.id, item.store_id))
            .collect();
        let rewrites = if hidden.is_empty() {
            HashMap::new()
        } else {
            self.services.rewrites.rewrites_by_product_store(&hidden)?
        };

        let mut items = Vec::new();
        for item in quote.all_visible_items().rev() {
            let rewrite = if item.product.is_visible_in_site_visibility() {
                None
            } else if let Some(rewrite) = rewrites.get(&(item.product.id, item.store_id)) {
                Some(rewrite)
            } else {
                tracing::debug!(
                    item_id = %item.id,
                    product_id = %item.product.id,
                    store_id = %item.store_id,
                    "Skipping hidden product without URL rewrite"
                );
                continue;
            };
            items.push(self.item_record(item, rewrite)?);
        }

        Ok(items)
    }

    fn item_record(
        &self,
        item: &LineItem,
        rewrite: Option<&RewriteRecord>,
    ) -> Result<CartSectionItem, SectionError> {
        let services = self.services;
        let product = &item.product;
        let image = services
            .images
            .resolve(product, ImageContext::MiniCartThumbnail)?;

        // The rewrite belongs to the item's own product; a linked parent
        // product resolves its URL without it.
        let effective = item.effective_product();
        let attached = rewrite.filter(|rewrite| rewrite.product_id == effective.id);

        let redirect_url = item.redirect_url();
        let has_url = redirect_url.is_some()
            || effective.is_visible_in_site_visibility()
            || attached.is_some_and(RewriteRecord::is_visible_in_site);
        let url = match redirect_url {
            Some(url) => url.to_string(),
            None => services.product_urls.product_url(effective, attached)?,
        };

        let configure_url = services.urls.build_url(
            CONFIGURE_ROUTE,
            &[("id", item.id.to_string()), ("product_id", product.id.to_string())],
        )?;

        Ok(CartSectionItem {
            product_type: item.product_type,
            qty: item.qty()?,
            item_id: item.id,
            configure_url,
            is_visible_in_site_visibility: product.is_visible_in_site_visibility(),
            name: product.name.clone(),
            url,
            has_url,
            price: services.prices.format_price(item.calculation_price)?,
            image,
            can_apply_msrp: services.msrp.is_show_before_order_confirm(product)
                && services.msrp.is_minimal_price_less_msrp(product),
        })
    }
}

// =============================================================================
// Section Source
// =============================================================================

/// Registers the cart snapshot as the `cart` section.
#[derive(Debug, Clone)]
pub struct CartSectionSource {
    services: Collaborators,
    store_id: StoreId,
    currency: CurrencyCode,
}

impl CartSectionSource {
    pub const NAME: &'static str = "cart";

    #[must_use]
    pub const fn new(services: Collaborators, store_id: StoreId, currency: CurrencyCode) -> Self {
        Self {
            services,
            store_id,
            currency,
        }
    }
}

#[async_trait]
impl SectionSource for CartSectionSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn section_data(&self, session: &Session) -> Result<Value, SectionError> {
        let quotes = SessionQuoteSource::new(session.clone(), self.store_id, self.currency);
        let section = CartSectionBuilder::new(&self.services, CartSectionOptions::default())
            .build(&quotes)
            .await?;
        Ok(serde_json::to_value(section)?)
    }
}
