//! Pluggable session persistence.
//!
//! [`SaveHandler`] is the store handed to the tower-sessions layer. It covers
//! the usual save-handler lifecycle: read (`load`), write (`create`/`save`),
//! destroy (`delete`) and garbage collection (`delete_expired`). Files are the
//! default backend.

pub mod file_store;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tower_sessions::MemoryStore;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};

pub use file_store::FileSessionStore;

/// Session keys.
pub mod keys {
    /// Key for the active quote.
    pub const QUOTE: &str = "quote";
}

/// Which backend sessions are saved to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveHandlerKind {
    #[default]
    Files,
    Memory,
}

impl FromStr for SaveHandlerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "files" => Ok(Self::Files),
            "memory" => Ok(Self::Memory),
            other => Err(format!("expected 'files' or 'memory', got '{other}'")),
        }
    }
}

/// Session store selected by configuration.
#[derive(Debug, Clone)]
pub enum SaveHandler {
    Files(FileSessionStore),
    Memory(MemoryStore),
}

impl SaveHandler {
    /// Name of the default backend.
    pub const DEFAULT: &'static str = "files";

    /// Open the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file store directory cannot be created.
    pub async fn open(kind: SaveHandlerKind, save_path: &std::path::Path) -> std::io::Result<Self> {
        Ok(match kind {
            SaveHandlerKind::Files => Self::Files(FileSessionStore::open(save_path).await?),
            SaveHandlerKind::Memory => Self::Memory(MemoryStore::default()),
        })
    }

    #[must_use]
    pub const fn kind(&self) -> SaveHandlerKind {
        match self {
            Self::Files(_) => SaveHandlerKind::Files,
            Self::Memory(_) => SaveHandlerKind::Memory,
        }
    }
}

#[async_trait]
impl SessionStore for SaveHandler {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        match self {
            Self::Files(store) => store.create(record).await,
            Self::Memory(store) => store.create(record).await,
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        match self {
            Self::Files(store) => store.save(record).await,
            Self::Memory(store) => store.save(record).await,
        }
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        match self {
            Self::Files(store) => store.load(session_id).await,
            Self::Memory(store) => store.load(session_id).await,
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        match self {
            Self::Files(store) => store.delete(session_id).await,
            Self::Memory(store) => store.delete(session_id).await,
        }
    }
}

#[async_trait]
impl ExpiredDeletion for SaveHandler {
    async fn delete_expired(&self) -> session_store::Result<()> {
        match self {
            Self::Files(store) => store.delete_expired().await,
            // The memory store drops expired records when they are loaded.
            Self::Memory(_) => Ok(()),
        }
    }
}

/// Run session garbage collection every `period` in the background.
pub fn spawn_gc(store: SaveHandler, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = store.delete_expired().await {
                tracing::warn!(error = %e, "Session garbage collection failed");
            }
        }
    })
}
