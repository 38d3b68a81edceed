//! JSON-file record store for the marketing calendar and agency book.
//!
//! Each collection lives in `<store_dir>/<collection>.json` as a JSON array.
//! Every mutation is read-modify-write under one async mutex per store, and
//! the new file is written to a temp sibling then renamed over the old one.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

pub mod agency;
pub mod calendar;
pub mod models;

pub use agency::{
    create_agency, create_project, delete_agency, get_agency, list_agencies, list_projects,
    update_agency,
};
pub use calendar::{
    calendar_view, create_event, delete_event, events_in_range, get_event, list_events,
    update_event, CalendarView, ViewWindow,
};
pub use models::{
    Agency, AgencyPatch, CalendarEvent, CalendarEventPatch, EventStatus, NewAgency,
    NewCalendarEvent, NewProject, Project, ProjectStatus,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("invalid record: {0}")]
    Validation(String),
    #[error("store I/O error at {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("collection file {path} is corrupt")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize collection {collection}")]
    Serialize {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A record kept in one named collection file.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// File stem under the store directory.
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// Handle to a store directory. Cheap to clone; clones share the write lock.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.display().to_string(),
                source,
            })?;
        Ok(Self {
            dir,
            lock: Arc::new(Mutex::new(())),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    /// Hold the store lock across a read-modify-write sequence.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Read a whole collection. A missing file is an empty collection.
    pub(crate) async fn read_all<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let path = self.collection_path(T::COLLECTION);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: path.display().to_string(),
            source,
        })
    }

    /// Replace a whole collection via temp file and rename.
    pub(crate) async fn write_all<T: Record>(&self, records: &[T]) -> Result<(), StoreError> {
        let path = self.collection_path(T::COLLECTION);
        let tmp = self.dir.join(format!(".{}.json.tmp", T::COLLECTION));
        let body =
            serde_json::to_vec_pretty(records).map_err(|source| StoreError::Serialize {
                collection: T::COLLECTION,
                source,
            })?;

        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.display().to_string(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!(
            collection = T::COLLECTION,
            records = records.len(),
            "collection written"
        );
        Ok(())
    }

    /// All records in a collection, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the collection file cannot be read or parsed.
    pub async fn list<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock().await;
        self.read_all().await
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has `id`.
    pub async fn get<T: Record>(&self, id: Uuid) -> Result<T, StoreError> {
        let _guard = self.lock().await;
        self.read_all::<T>()
            .await?
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound)
    }

    /// Append a record. No uniqueness checks beyond the generated id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the collection cannot be read or written.
    pub async fn insert<T: Record>(&self, record: T) -> Result<T, StoreError> {
        let _guard = self.lock().await;
        let mut all = self.read_all::<T>().await?;
        all.push(record.clone());
        self.write_all(&all).await?;
        Ok(record)
    }

    /// Apply `change` to the record with `id` and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has `id`, or whatever
    /// error `change` returns; the file is untouched in both cases.
    pub async fn modify<T, F>(&self, id: Uuid, change: F) -> Result<T, StoreError>
    where
        T: Record,
        F: FnOnce(&mut T) -> Result<(), StoreError>,
    {
        let _guard = self.lock().await;
        let mut all = self.read_all::<T>().await?;
        let record = all
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound)?;
        change(record)?;
        let updated = record.clone();
        self.write_all(&all).await?;
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has `id`.
    pub async fn remove<T: Record>(&self, id: Uuid) -> Result<T, StoreError> {
        let _guard = self.lock().await;
        self.remove_locked(id).await
    }

    pub(crate) async fn remove_locked<T: Record>(&self, id: Uuid) -> Result<T, StoreError> {
        let mut all = self.read_all::<T>().await?;
        let idx = all
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound)?;
        let removed = all.remove(idx);
        self.write_all(&all).await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Agency, NewAgency};

    #[tokio::test]
    async fn missing_collection_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        let all: Vec<Agency> = store.list().await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonStore::open(&nested).await.unwrap();
        assert!(store.dir().is_dir());
    }

    #[tokio::test]
    async fn corrupt_collection_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("agencies.json"), "{ not an array").unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        let err = store.list::<Agency>().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn blank_collection_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("agencies.json"), "\n").unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        assert!(store.list::<Agency>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_leave_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        let agency = Agency::from_new(NewAgency {
            name: "Northside PR".into(),
            ..NewAgency::default()
        })
        .unwrap();
        store.insert(agency).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["agencies.json".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_inserts_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let agency = Agency::from_new(NewAgency {
                    name: format!("Agency {i}"),
                    ..NewAgency::default()
                })
                .unwrap();
                store.insert(agency).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list::<Agency>().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn modify_and_remove_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        let id = Uuid::new_v4();

        let err = store
            .modify::<Agency, _>(id, |_| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(matches!(
            store.remove::<Agency>(id).await.unwrap_err(),
            StoreError::NotFound
        ));
    }
}
