//! Active quote resolution.
//!
//! Guest and customer quotes live in the session under [`keys::QUOTE`].

use async_trait::async_trait;
use tower_sessions::Session;
use tracing::instrument;

use minicart_core::{CurrencyCode, Quote, StoreId};

use crate::sections::SectionError;
use crate::session::keys;

/// Supplies the quote of the current session.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `SectionError` if the backing store cannot be read.
    async fn active_quote(&self) -> Result<Quote, SectionError>;
}

/// Reads the quote from a tower-sessions session.
///
/// A session without a quote gets a fresh empty one; it is not written back
/// until something is added to it.
#[derive(Debug, Clone)]
pub struct SessionQuoteSource {
    session: Session,
    store_id: StoreId,
    currency: CurrencyCode,
}

impl SessionQuoteSource {
    #[must_use]
    pub const fn new(session: Session, store_id: StoreId, currency: CurrencyCode) -> Self {
        Self {
            session,
            store_id,
            currency,
        }
    }

    /// Persist a quote into the session.
    ///
    /// # Errors
    ///
    /// Returns `SectionError` if the session cannot be written.
    pub async fn save(&self, quote: &Quote) -> Result<(), SectionError> {
        self.session.insert(keys::QUOTE, quote).await?;
        Ok(())
    }
}

#[async_trait]
impl QuoteSource for SessionQuoteSource {
    #[instrument(skip(self))]
    async fn active_quote(&self) -> Result<Quote, SectionError> {
        match self.session.get::<Quote>(keys::QUOTE).await? {
            Some(quote) => Ok(quote),
            None => {
                tracing::debug!("No quote in session, starting an empty one");
                Ok(Quote::new(self.store_id, self.currency))
            }
        }
    }
}

/// A quote that has already been resolved.
#[derive(Debug, Clone)]
pub struct LoadedQuote(pub Quote);

#[async_trait]
impl QuoteSource for LoadedQuote {
    async fn active_quote(&self) -> Result<Quote, SectionError> {
        Ok(self.0.clone())
    }
}
