//! Errors raised while building section data.

use thiserror::Error;

use minicart_core::QtyError;

/// Errors that can occur while assembling a customer-data section.
///
/// A missing URL rewrite is not an error: the affected item is dropped.
/// Everything here aborts the whole section.
#[derive(Debug, Error)]
pub enum SectionError {
    /// Reading the quote from the session failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A stored line quantity is not numeric.
    #[error("Quote error: {0}")]
    Quantity(#[from] QtyError),

    /// URL could not be built.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Base URL cannot carry path segments.
    #[error("URL cannot be a base: {0}")]
    CannotBeABase(String),

    /// Section output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested section is not registered.
    #[error("Unknown section: {0}")]
    UnknownSection(String),
}
