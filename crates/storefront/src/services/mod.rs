//! Read-only collaborators consumed by section builders.
//!
//! Each concern sits behind a narrow trait so builders can be exercised with
//! fakes; the default implementations here are configured from
//! [`StorefrontConfig`](crate::config::StorefrontConfig).
//!
//! # Services
//!
//! - [`checkout`] - Cart summary count and one-page checkout policy
//! - [`image`] - Product image descriptors per presentation context
//! - [`msrp`] - Manufacturer's suggested retail price display policy
//! - [`pricing`] - Price formatting
//! - [`quote`] - Active quote resolution from the session
//! - [`url`] - Route and product URL building

pub mod checkout;
pub mod image;
pub mod msrp;
pub mod pricing;
pub mod quote;
pub mod url;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use minicart_core::{ProductId, RewriteRecord, StoreId};

use crate::sections::SectionError;

pub use checkout::{CartSummary, CheckoutPolicy, ConfiguredCheckout, SummaryMode};
pub use image::{ImageContext, ImageDescriptor, ImageResolver, MediaImageResolver};
pub use msrp::{ConfiguredMsrp, MsrpPolicy};
pub use pricing::{CurrencyFormatter, PriceFormatter};
pub use quote::{LoadedQuote, QuoteSource, SessionQuoteSource};
pub use url::{ProductUrlResolver, RouteUrlBuilder, UrlBuilder};

/// Lookup of historical URL rewrites.
pub trait RewriteLookup: Send + Sync {
    /// Resolve rewrites for the given product and store pairs.
    ///
    /// The same product may be requested in several stores; each pair is
    /// answered independently. Pairs without a rewrite are absent from the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns `SectionError` if the rewrite backend fails.
    fn rewrites_by_product_store(
        &self,
        requests: &HashSet<(ProductId, StoreId)>,
    ) -> Result<HashMap<(ProductId, StoreId), RewriteRecord>, SectionError>;
}

/// The set of collaborators a cart section build needs.
///
/// Cheap to clone; every service is shared and immutable.
#[derive(Clone)]
pub struct Collaborators {
    pub summary: Arc<dyn CartSummary>,
    pub checkout: Arc<dyn CheckoutPolicy>,
    pub prices: Arc<dyn PriceFormatter>,
    pub rewrites: Arc<dyn RewriteLookup>,
    pub images: Arc<dyn ImageResolver>,
    pub msrp: Arc<dyn MsrpPolicy>,
    pub urls: Arc<dyn UrlBuilder>,
    pub product_urls: Arc<dyn ProductUrlResolver>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
