//! Core types for Minicart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod qty;
pub mod quote;

pub use id::*;
pub use price::{CurrencyCode, CurrencyCodeError, Price};
pub use product::{MsrpDisplay, Product, ProductImage, ProductType, RewriteRecord, Visibility};
pub use qty::{Qty, QtyError, StoredQty};
pub use quote::{LineItem, LineItemKind, Quote, Totals};
