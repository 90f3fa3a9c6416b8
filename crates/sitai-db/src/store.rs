//! [`PointStore`]: the handle callers hold instead of a global database path.
//!
//! Each operation borrows one pooled connection for the duration of a
//! single statement (or an existence check followed by a mutation) and
//! hands it back before returning. Store faults are logged here at error
//! level and returned as [`sitai_core::Error::Database`]; "not found" is
//! always `Ok(None)` / `Ok(false)`.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use sitai_core::{ExcavationPoint, PointId, Result};

use crate::models::{PointRecord, SearchField};
use crate::pool::{get_conn, init_memory_pool, init_pool, DbPool};
use crate::queries::points;
use crate::schema;

/// Handle to the excavation point table.
#[derive(Clone)]
pub struct PointStore {
    pool: DbPool,
    path: Option<PathBuf>,
}

impl PointStore {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pool = init_pool(path).inspect_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to open store");
        })?;
        tracing::info!(path = %path.display(), "Opened excavation point store");

        Ok(Self {
            pool,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            pool: init_memory_pool()?,
            path: None,
        })
    }

    /// Location of the backing file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Create the table if it is missing. Safe to call any number of times.
    pub fn init(&self) -> Result<()> {
        self.with_conn("init", schema::ensure_schema)
    }

    /// Insert `point` and return its new id.
    pub fn create(&self, point: &ExcavationPoint) -> Result<PointId> {
        self.with_conn("create", |conn| points::create_point(conn, point))
    }

    pub fn get_by_id(&self, id: PointId) -> Result<Option<ExcavationPoint>> {
        self.with_conn("get_by_id", |conn| points::get_point(conn, id))
    }

    pub fn get_all(&self) -> Result<Vec<ExcavationPoint>> {
        self.with_conn("get_all", points::list_points)
    }

    pub fn count(&self) -> Result<u64> {
        self.with_conn("count", points::count_points)
    }

    /// Overwrite a stored point. See [`points::update_point`].
    pub fn update(&self, point: &ExcavationPoint) -> Result<bool> {
        self.with_conn("update", |conn| points::update_point(conn, point))
    }

    pub fn delete(&self, id: PointId) -> Result<bool> {
        self.with_conn("delete", |conn| points::delete_point(conn, id))
    }

    /// Substring search. See [`points::search_points`].
    pub fn search(&self, query: &str, field: Option<SearchField>) -> Result<Vec<PointRecord>> {
        self.with_conn("search", |conn| points::search_points(conn, query, field))
    }

    fn with_conn<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let result = get_conn(&self.pool).and_then(|conn| f(&conn));
        if let Err(e) = &result {
            if e.is_fault() {
                tracing::error!(op, error = %e, "Excavation point store failed");
            }
        }
        result
    }
}

impl std::fmt::Debug for PointStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointStore")
            .field("path", &self.path)
            .field("max_connections", &self.pool.max_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitai_core::{Error, PointDraft};

    fn sample() -> ExcavationPoint {
        ExcavationPoint::new(PointDraft {
            point_type: "Restos mortais".into(),
            latitude: -2.5,
            longitude: -54.7,
            altitude: 12.0,
            description: "Sepultamento em urna".into(),
            responsible: "Equipe Tapajós".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn in_memory_round_trip() {
        let store = PointStore::open_in_memory().unwrap();
        assert!(store.path().is_none());

        let id = store.create(&sample()).unwrap();
        let back = store.get_by_id(id).unwrap().unwrap();
        assert!(back.same_content(&sample()));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn init_is_repeatable() {
        let store = PointStore::open_in_memory().unwrap();
        store.create(&sample()).unwrap();
        store.init().unwrap();
        store.init().unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("database.db");

        let id = {
            let store = PointStore::open(&path).unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
            store.create(&sample()).unwrap()
        };

        let store = PointStore::open(&path).unwrap();
        let back = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(back.responsible(), "Equipe Tapajós");
    }

    #[test]
    fn missing_table_is_a_fault_not_a_miss() {
        let store = PointStore::open_in_memory().unwrap();
        get_conn(store.pool())
            .unwrap()
            .execute_batch("DROP TABLE excavation_points")
            .unwrap();

        let err = store.delete(PointId::new(1)).unwrap_err();
        assert!(matches!(err, Error::Database { .. }));
        assert!(store.search("x", None).unwrap_err().is_fault());
        assert!(store.get_by_id(PointId::new(1)).unwrap_err().is_fault());

        // Lazy re-initialization brings the store back.
        store.init().unwrap();
        assert!(!store.delete(PointId::new(1)).unwrap());
    }
}
