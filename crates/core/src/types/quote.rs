//! Quote (shopping cart) aggregate and its line items.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ItemId, QuoteId, StoreId};
use super::price::CurrencyCode;
use super::product::{Product, ProductType};
use super::qty::{Qty, QtyError, StoredQty};

// =============================================================================
// Totals
// =============================================================================

/// Computed total lines of a quote, keyed by total code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Totals(BTreeMap<String, Decimal>);

impl Totals {
    pub const SUBTOTAL: &'static str = "subtotal";

    #[must_use]
    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.0.get(code).copied()
    }

    pub fn set(&mut self, code: impl Into<String>, value: Decimal) {
        self.0.insert(code.into(), value);
    }

    /// The subtotal line, if totals have been collected.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.get(Self::SUBTOTAL)
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// How a line item relates to the product it should link to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItemKind {
    /// The item's own product is the one shown and linked.
    #[default]
    Simple,
    /// The item was added through a composite product (grouped, bundle,
    /// configurable); links go to `linked_product` instead.
    Composite { linked_product: Box<Product> },
}

/// A product entry within a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ItemId,
    pub product: Product,
    pub qty: StoredQty,
    pub calculation_price: Decimal,
    pub product_type: ProductType,
    pub store_id: StoreId,
    #[serde(default)]
    pub redirect_url: Option<String>,
    /// Set on child rows of composite products; such rows are not shown.
    #[serde(default)]
    pub parent_item_id: Option<ItemId>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub kind: LineItemKind,
}

impl LineItem {
    /// Product that links and URLs resolve against.
    #[must_use]
    pub fn effective_product(&self) -> &Product {
        match &self.kind {
            LineItemKind::Simple => &self.product,
            LineItemKind::Composite { linked_product } => linked_product,
        }
    }

    /// Explicit redirect URL, ignoring empty values.
    #[must_use]
    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref().filter(|url| !url.is_empty())
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.is_deleted && self.parent_item_id.is_none()
    }

    /// Parsed quantity.
    ///
    /// # Errors
    ///
    /// Returns `QtyError` if the stored quantity is not numeric.
    pub fn qty(&self) -> Result<Qty, QtyError> {
        self.qty.parse()
    }
}

// =============================================================================
// Quote
// =============================================================================

/// A shopping cart owned by a customer or guest session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub store_id: StoreId,
    #[serde(default)]
    pub currency_code: CurrencyCode,
    /// Line items in insertion order.
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub has_error: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    /// Create an empty quote for a store.
    #[must_use]
    pub fn new(store_id: StoreId, currency_code: CurrencyCode) -> Self {
        let now = Utc::now();
        Self {
            id: QuoteId::generate(),
            store_id,
            currency_code,
            items: Vec::new(),
            totals: Totals::default(),
            has_error: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Items shown to the customer, in insertion order.
    pub fn all_visible_items(&self) -> impl DoubleEndedIterator<Item = &LineItem> {
        self.items.iter().filter(|item| item.is_visible())
    }

    /// Number of visible lines.
    #[must_use]
    pub fn items_count(&self) -> usize {
        self.all_visible_items().count()
    }

    /// Sum of visible line quantities.
    ///
    /// # Errors
    ///
    /// Returns `QtyError` if any stored quantity is not numeric or the sum
    /// overflows.
    pub fn items_qty(&self) -> Result<Qty, QtyError> {
        self.all_visible_items()
            .try_fold(Qty::ZERO, |total, item| total.checked_add(item.qty()?))
    }

    /// Recompute the subtotal from visible lines.
    ///
    /// # Errors
    ///
    /// Returns `QtyError` if any stored quantity is not numeric or a total
    /// overflows.
    pub fn collect_totals(&mut self) -> Result<(), QtyError> {
        let mut subtotal = Decimal::ZERO;
        for item in self.all_visible_items() {
            let line_total = item.qty()?.times(item.calculation_price)?;
            subtotal = subtotal
                .checked_add(line_total)
                .ok_or(QtyError::Overflow)?;
        }
        self.totals.set(Totals::SUBTOTAL, subtotal);
        Ok(())
    }

    /// Add a product, merging into an existing simple line for the same product.
    ///
    /// Returns the ID of the line that received the quantity.
    ///
    /// # Errors
    ///
    /// Returns `QtyError` if the existing line's stored quantity is not
    /// numeric, or if the merged quantity or the subtotal overflows. The
    /// quote should be discarded after an error.
    pub fn add_product(&mut self, product: Product, qty: Qty) -> Result<ItemId, QtyError> {
        let existing = self.items.iter_mut().find(|item| {
            item.is_visible()
                && item.kind == LineItemKind::Simple
                && item.product.id == product.id
        });

        let item_id = if let Some(item) = existing {
            item.qty = StoredQty::from(item.qty()?.checked_add(qty)?);
            item.id
        } else {
            let id = self
                .items
                .iter()
                .map(|item| item.id)
                .max()
                .map_or(ItemId::new(1), ItemId::next);
            self.items.push(LineItem {
                id,
                calculation_price: product.price,
                product_type: product.type_id,
                store_id: self.store_id,
                qty: StoredQty::from(qty),
                redirect_url: None,
                parent_item_id: None,
                is_deleted: false,
                kind: LineItemKind::Simple,
                product,
            });
            id
        };

        self.updated_at = Utc::now();
        self.collect_totals()?;
        Ok(item_id)
    }

    /// Remove a line and any child rows attached to it.
    ///
    /// Returns `false` if no line had that ID.
    ///
    /// # Errors
    ///
    /// Returns `QtyError` if totals cannot be recollected.
    pub fn remove_item(&mut self, item_id: ItemId) -> Result<bool, QtyError> {
        let before = self.items.len();
        self.items
            .retain(|item| item.id != item_id && item.parent_item_id != Some(item_id));
        let removed = self.items.len() != before;
        if removed {
            self.updated_at = Utc::now();
            self.collect_totals()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::id::ProductId;
    use crate::types::product::{MsrpDisplay, Visibility};

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            sku: format!("SKU-{id}"),
            name: format!("Product {id}"),
            url_key: Some(format!("product-{id}")),
            visibility: Visibility::Both,
            type_id: ProductType::Simple,
            price: Decimal::new(price, 2),
            image: None,
            msrp: None,
            msrp_display: MsrpDisplay::UseConfig,
            minimal_price: None,
        }
    }

    #[test]
    fn test_add_product_appends_lines_in_order() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        let a = quote.add_product(product(1, 1000), Qty::from(1_i64)).unwrap();
        let b = quote.add_product(product(2, 250), Qty::from(2_i64)).unwrap();

        assert_eq!(a, ItemId::new(1));
        assert_eq!(b, ItemId::new(2));
        assert_eq!(quote.items_count(), 2);
        assert_eq!(quote.totals.subtotal(), Some(Decimal::new(1500, 2)));
    }

    #[test]
    fn test_add_product_merges_same_product() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        quote.add_product(product(1, 1000), Qty::from(1_i64)).unwrap();
        quote.add_product(product(1, 1000), Qty::from(2_i64)).unwrap();

        assert_eq!(quote.items_count(), 1);
        assert_eq!(quote.items_qty().unwrap(), Qty::from(3_i64));
    }

    #[test]
    fn test_visible_items_skip_children_and_deleted() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        quote.add_product(product(1, 1000), Qty::from(1_i64)).unwrap();
        quote.add_product(product(2, 1000), Qty::from(1_i64)).unwrap();
        quote.add_product(product(3, 1000), Qty::from(1_i64)).unwrap();
        quote.items[1].parent_item_id = Some(ItemId::new(1));
        quote.items[2].is_deleted = true;

        let ids: Vec<_> = quote.all_visible_items().map(|i| i.id).collect();
        assert_eq!(ids, vec![ItemId::new(1)]);
    }

    #[test]
    fn test_remove_item_drops_children() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        quote.add_product(product(1, 1000), Qty::from(1_i64)).unwrap();
        quote.add_product(product(2, 500), Qty::from(1_i64)).unwrap();
        quote.items[1].parent_item_id = Some(ItemId::new(1));

        assert!(quote.remove_item(ItemId::new(1)).unwrap());
        assert!(quote.items.is_empty());
        assert_eq!(quote.totals.subtotal(), Some(Decimal::ZERO));
        assert!(!quote.remove_item(ItemId::new(1)).unwrap());
    }

    #[test]
    fn test_effective_product_prefers_linked_product() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        quote.add_product(product(1, 1000), Qty::from(1_i64)).unwrap();
        let parent = product(9, 0);
        quote.items[0].kind = LineItemKind::Composite {
            linked_product: Box::new(parent.clone()),
        };

        assert_eq!(quote.items[0].effective_product(), &parent);
    }

    #[test]
    fn test_empty_redirect_url_is_ignored() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        quote.add_product(product(1, 1000), Qty::from(1_i64)).unwrap();
        quote.items[0].redirect_url = Some(String::new());
        assert_eq!(quote.items[0].redirect_url(), None);
    }

    #[test]
    fn test_quote_round_trips_through_session_json() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        quote.add_product(product(1, 1000), Qty::from(2_i64)).unwrap();
        let value = serde_json::to_value(&quote).unwrap();
        let back: Quote = serde_json::from_value(value).unwrap();
        assert_eq!(back, quote);
    }

    #[test]
    fn test_add_product_rejects_overflowing_line_total() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        let huge: Qty = "79228162514264337593543950335".parse().unwrap();

        assert_eq!(
            quote.add_product(product(1, 3400), huge),
            Err(QtyError::Overflow)
        );
    }

    #[test]
    fn test_add_product_rejects_overflowing_merge() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        quote.add_product(product(1, 0), Qty::new(Decimal::MAX)).unwrap();

        assert_eq!(
            quote.add_product(product(1, 0), Qty::from(1_i64)),
            Err(QtyError::Overflow)
        );
    }

    #[test]
    fn test_items_qty_reports_overflow() {
        let mut quote = Quote::new(StoreId::new(1), CurrencyCode::USD);
        quote.add_product(product(1, 0), Qty::from(1_i64)).unwrap();
        quote.add_product(product(2, 0), Qty::from(1_i64)).unwrap();
        for item in &mut quote.items {
            item.qty = StoredQty::Text(Decimal::MAX.to_string());
        }

        assert_eq!(quote.items_qty(), Err(QtyError::Overflow));
        assert_eq!(quote.collect_totals(), Ok(()));
    }
}
