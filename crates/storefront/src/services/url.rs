//! Route and product URL building.

use url::Url;

use minicart_core::{Product, RewriteRecord};

use crate::sections::SectionError;

/// Suffix appended to product URL keys.
pub const PRODUCT_URL_SUFFIX: &str = ".html";

/// Route of the product page used when a product has no URL key.
const PRODUCT_VIEW_ROUTE: &str = "catalog/product/view";

/// Builds storefront URLs from a route and path parameters.
pub trait UrlBuilder: Send + Sync {
    /// # Errors
    ///
    /// Returns `SectionError` if the URL cannot be assembled.
    fn build_url(&self, route: &str, params: &[(&str, String)]) -> Result<String, SectionError>;
}

/// Resolves the canonical URL of a product page.
pub trait ProductUrlResolver: Send + Sync {
    /// `rewrite` is the historical rewrite attached to the product, if any;
    /// its request path takes precedence over the product's own URL key.
    ///
    /// # Errors
    ///
    /// Returns `SectionError` if the URL cannot be assembled.
    fn product_url(
        &self,
        product: &Product,
        rewrite: Option<&RewriteRecord>,
    ) -> Result<String, SectionError>;
}

/// URL builder rooted at the storefront base URL.
///
/// Parameters are rendered as path segments:
/// `checkout/cart/configure` + `[("id", "5")]` → `{base}/checkout/cart/configure/id/5/`.
#[derive(Debug, Clone)]
pub struct RouteUrlBuilder {
    base_url: Url,
}

impl RouteUrlBuilder {
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }
}

impl UrlBuilder for RouteUrlBuilder {
    fn build_url(&self, route: &str, params: &[(&str, String)]) -> Result<String, SectionError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| SectionError::CannotBeABase(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .extend(route.split('/').filter(|segment| !segment.is_empty()));
            for (key, value) in params {
                segments.push(key).push(value);
            }
            segments.push("");
        }
        Ok(url.into())
    }
}

impl ProductUrlResolver for RouteUrlBuilder {
    fn product_url(
        &self,
        product: &Product,
        rewrite: Option<&RewriteRecord>,
    ) -> Result<String, SectionError> {
        if let Some(rewrite) = rewrite {
            let url = self
                .base_url
                .join(rewrite.request_path.trim_start_matches('/'))?;
            return Ok(url.into());
        }

        match product.url_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => Ok(self
                .base_url
                .join(&format!("{key}{PRODUCT_URL_SUFFIX}"))?
                .into()),
            None => self.build_url(PRODUCT_VIEW_ROUTE, &[("id", product.id.to_string())]),
        }
    }
}
