//! Minicart Core - Shared types library.
//!
//! This crate provides the domain types used across Minicart components:
//! - `storefront` - Section-load HTTP service and the cart snapshot builder
//! - `integration-tests` - End-to-end tests against the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no session
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, quantities, catalog products and quotes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
