//! In-memory product catalog and URL rewrite index.
//!
//! The catalog is loaded once at startup from a JSON document:
//!
//! ```json
//! {
//!   "products": [{ "id": 1, "sku": "MB01", "name": "Joust Duffle Bag", "visibility": 4, "price": "34.00" }],
//!   "rewrites": [{ "product_id": 7, "store_id": 1, "request_path": "old-bag.html", "visibility": 4 }]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use minicart_core::{Product, ProductId, RewriteRecord, StoreId};

use crate::sections::SectionError;
use crate::services::RewriteLookup;

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    rewrites: Vec<RewriteRecord>,
}

/// Read-only product catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    products: HashMap<ProductId, Product>,
    rewrites: HashMap<(ProductId, StoreId), RewriteRecord>,
}

impl Catalog {
    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed, or if a
    /// product ID appears twice.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on malformed JSON or duplicate product IDs.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;

        let mut products = HashMap::with_capacity(document.products.len());
        for product in document.products {
            let id = product.id;
            if products.insert(id, product).is_some() {
                return Err(CatalogError::DuplicateProduct(id));
            }
        }

        // Later rows win, matching how rewrite tables are re-indexed.
        let rewrites = document
            .rewrites
            .into_iter()
            .map(|rewrite| ((rewrite.product_id, rewrite.store_id), rewrite))
            .collect();

        Ok(Self { products, rewrites })
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl RewriteLookup for Catalog {
    fn rewrites_by_product_store(
        &self,
        requests: &HashSet<(ProductId, StoreId)>,
    ) -> Result<HashMap<(ProductId, StoreId), RewriteRecord>, SectionError> {
        Ok(requests
            .iter()
            .filter_map(|key| self.rewrites.get(key).map(|rewrite| (*key, rewrite.clone())))
            .collect())
    }
}
