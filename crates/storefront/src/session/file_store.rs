//! File-backed session store.
//!
//! One JSON file per session (`sess_<id>`) in a single directory. Writes go to
//! a temporary file first and are renamed into place, so a reader never sees
//! a partially written record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};

const FILE_PREFIX: &str = "sess_";

/// Session store keeping each record in its own file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &Id) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{id}"))
    }

    async fn read_record(path: &Path) -> session_store::Result<Option<Record>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(backend(&e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| session_store::Error::Decode(e.to_string()))
    }

    async fn remove(path: &Path) -> session_store::Result<()> {
        match tokio::fs::remove_file(path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(backend(&e)),
            _ => Ok(()),
        }
    }
}

fn backend(err: &std::io::Error) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

fn is_expired(record: &Record) -> bool {
    record.expiry_date <= OffsetDateTime::now_utc()
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while tokio::fs::try_exists(self.path_for(&record.id))
            .await
            .map_err(|e| backend(&e))?
        {
            record.id = Id::default();
        }
        self.save(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let bytes =
            serde_json::to_vec(record).map_err(|e| session_store::Error::Encode(e.to_string()))?;
        let path = self.path_for(&record.id);
        let tmp = self.dir.join(format!(".{FILE_PREFIX}{}.tmp", record.id));

        tokio::fs::write(&tmp, bytes).await.map_err(|e| backend(&e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| backend(&e))
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let path = self.path_for(session_id);
        match Self::read_record(&path).await? {
            Some(record) if is_expired(&record) => {
                Self::remove(&path).await?;
                Ok(None)
            }
            record => Ok(record),
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        Self::remove(&self.path_for(session_id)).await
    }
}

#[async_trait]
impl ExpiredDeletion for FileSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| backend(&e))?;
        let mut removed = 0_usize;

        while let Some(entry) = entries.next_entry().await.map_err(|e| backend(&e))? {
            if !entry.file_name().to_string_lossy().starts_with(FILE_PREFIX) {
                continue;
            }
            let path = entry.path();
            match Self::read_record(&path).await {
                Ok(Some(record)) if is_expired(&record) => {
                    Self::remove(&path).await?;
                    removed += 1;
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Unreadable session file"),
            }
        }

        tracing::debug!(removed, "Expired sessions deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::cookie::time::Duration;

    use super::*;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::from([("quote".to_string(), serde_json::json!({"items": []}))]),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    async fn store() -> (tempfile::TempDir, FileSessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(dir.path().join("sessions"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (_dir, store) = store().await;
        let mut rec = record(Duration::hours(1));
        store.create(&mut rec).await.unwrap();

        let loaded = store.load(&rec.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, rec.id);
        assert_eq!(loaded.data, rec.data);
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let (_dir, store) = store().await;
        assert!(store.load(&Id::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_record_is_not_loaded() {
        let (_dir, store) = store().await;
        let rec = record(Duration::seconds(-5));
        store.save(&rec).await.unwrap();

        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert!(!store.path_for(&rec.id).exists());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, store) = store().await;
        let rec = record(Duration::hours(1));
        store.save(&rec).await.unwrap();

        store.delete(&rec.id).await.unwrap();
        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_expired_keeps_live_sessions() {
        let (_dir, store) = store().await;
        let live = record(Duration::hours(1));
        let stale = record(Duration::seconds(-1));
        store.save(&live).await.unwrap();
        store.save(&stale).await.unwrap();
        std::fs::write(store.dir().join("README"), "not a session").unwrap();

        store.delete_expired().await.unwrap();

        assert!(store.path_for(&live.id).exists());
        assert!(!store.path_for(&stale.id).exists());
        assert!(store.dir().join("README").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_decode_error() {
        let (_dir, store) = store().await;
        let id = Id::default();
        std::fs::write(store.path_for(&id), b"{not json").unwrap();

        let err = store.load(&id).await.unwrap_err();
        assert!(matches!(err, session_store::Error::Decode(_)));
    }
}
