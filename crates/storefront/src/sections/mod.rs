//! Customer-data sections.
//!
//! A section is a named JSON fragment the browser loads asynchronously and
//! caches client-side (mini-cart, customer name, ...). Sources register in a
//! [`SectionPool`]; the section-load endpoint asks the pool for a subset.

pub mod cart;
pub mod error;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tower_sessions::Session;

pub use cart::{
    CartSection, CartSectionBuilder, CartSectionItem, CartSectionOptions, CartSectionSource,
    Subtotal,
};
pub use error::SectionError;

/// A producer of one named section.
#[async_trait]
pub trait SectionSource: Send + Sync {
    /// Name the browser requests the section by.
    fn name(&self) -> &'static str;

    /// Render the section for the current session.
    ///
    /// # Errors
    ///
    /// Returns `SectionError` if any collaborator fails.
    async fn section_data(&self, session: &Session) -> Result<Value, SectionError>;
}

/// Registry of section sources.
#[derive(Clone, Default)]
pub struct SectionPool {
    sources: BTreeMap<&'static str, Arc<dyn SectionSource>>,
}

impl SectionPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source, replacing any source with the same name.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn SectionSource>) -> Self {
        self.sources.insert(source.name(), source);
        self
    }

    /// Names of all registered sections.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sources.keys().copied()
    }

    /// Render the requested sections, or every section when `names` is `None`.
    ///
    /// All names are validated before anything is rendered.
    ///
    /// # Errors
    ///
    /// Returns `SectionError::UnknownSection` for an unregistered name, or
    /// the first error raised by a source.
    pub async fn load(
        &self,
        names: Option<&[String]>,
        session: &Session,
    ) -> Result<Map<String, Value>, SectionError> {
        let selected: Vec<&Arc<dyn SectionSource>> = match names {
            None => self.sources.values().collect(),
            Some(names) => names
                .iter()
                .map(|name| {
                    self.sources
                        .get(name.as_str())
                        .ok_or_else(|| SectionError::UnknownSection(name.clone()))
                })
                .collect::<Result<_, _>>()?,
        };

        let mut sections = Map::new();
        for source in selected {
            let data = source.section_data(session).await?;
            sections.insert(source.name().to_string(), data);
        }
        Ok(sections)
    }
}

impl std::fmt::Debug for SectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionPool")
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::MemoryStore;

    use super::*;

    struct Static(&'static str);

    #[async_trait]
    impl SectionSource for Static {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn section_data(&self, _session: &Session) -> Result<Value, SectionError> {
            Ok(Value::String(self.0.to_uppercase()))
        }
    }

    fn pool() -> SectionPool {
        SectionPool::new()
            .with_source(Arc::new(Static("cart")))
            .with_source(Arc::new(Static("customer")))
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_load_all_sections() {
        let sections = pool().load(None, &session()).await.unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections["cart"], Value::String("CART".to_string()));
    }

    #[tokio::test]
    async fn test_load_selected_sections() {
        let names = vec!["customer".to_string()];
        let sections = pool().load(Some(&names), &session()).await.unwrap();
        assert_eq!(sections.len(), 1);
        assert!(sections.contains_key("customer"));
    }

    #[tokio::test]
    async fn test_unknown_section_rejected() {
        let names = vec!["cart".to_string(), "wishlist".to_string()];
        let err = pool().load(Some(&names), &session()).await.unwrap_err();
        assert!(matches!(err, SectionError::UnknownSection(name) if name == "wishlist"));
    }

    #[test]
    fn test_names_are_sorted() {
        assert_eq!(pool().names().collect::<Vec<_>>(), vec!["cart", "customer"]);
    }
}
