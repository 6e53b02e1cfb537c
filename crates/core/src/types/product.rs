//! Catalog product types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, StoreId};

/// Where a product may be shown in the storefront.
///
/// Serialized as the integer codes used by catalog storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Visibility {
    NotVisible = 1,
    InCatalog = 2,
    InSearch = 3,
    Both = 4,
}

impl Visibility {
    /// Visibilities under which a product is listed somewhere in the site.
    pub const VISIBLE_IN_SITE: [Self; 3] = [Self::InCatalog, Self::InSearch, Self::Both];

    #[must_use]
    pub fn is_visible_in_site(self) -> bool {
        Self::VISIBLE_IN_SITE.contains(&self)
    }
}

impl TryFrom<u8> for Visibility {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::NotVisible),
            2 => Ok(Self::InCatalog),
            3 => Ok(Self::InSearch),
            4 => Ok(Self::Both),
            other => Err(format!("unknown visibility code {other}")),
        }
    }
}

impl From<Visibility> for u8 {
    fn from(value: Visibility) -> Self {
        value as Self
    }
}

/// Product type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[default]
    Simple,
    Virtual,
    Downloadable,
    Configurable,
    Bundle,
    Grouped,
}

/// When the manufacturer's suggested retail price hides the real price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsrpDisplay {
    /// Defer to the store-wide setting.
    #[default]
    UseConfig,
    OnGesture,
    InCart,
    BeforeOrderConfirm,
}

/// Base image of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Path relative to the media base URL (e.g. `/m/b/mb01-blue.jpg`).
    pub path: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// A catalog product as referenced by cart line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub url_key: Option<String>,
    pub visibility: Visibility,
    #[serde(default)]
    pub type_id: ProductType,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<ProductImage>,
    #[serde(default)]
    pub msrp: Option<Decimal>,
    #[serde(default)]
    pub msrp_display: MsrpDisplay,
    /// Lowest price the product can sell for (tier/special/catalog rules applied).
    #[serde(default)]
    pub minimal_price: Option<Decimal>,
}

impl Product {
    #[must_use]
    pub fn is_visible_in_site_visibility(&self) -> bool {
        self.visibility.is_visible_in_site()
    }
}

/// A stored URL rewrite that keeps a product linkable after it stopped
/// being visible in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRecord {
    pub product_id: ProductId,
    pub store_id: StoreId,
    pub request_path: String,
    pub visibility: Visibility,
}

impl RewriteRecord {
    #[must_use]
    pub fn is_visible_in_site(&self) -> bool {
        self.visibility.is_visible_in_site()
    }
}
