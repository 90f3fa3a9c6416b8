//! Excavation point CRUD and search.

use rusqlite::{Connection, OptionalExtension};
use sitai_core::{timestamp, Error, ExcavationPoint, PointId, Result};

use crate::models::{point_from_row, PointRecord, SearchField, COLS};
use crate::schema::TABLE;

/// Insert a new point and return the id SQLite assigned to it.
///
/// Any id already set on `point` is ignored. Coordinates were checked when
/// the point was built, so nothing is re-validated here.
pub fn create_point(conn: &Connection, point: &ExcavationPoint) -> Result<PointId> {
    conn.execute(
        "INSERT INTO excavation_points
            (point_type, latitude, longitude, altitude, description, discovery_date, responsible, srid)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            point.point_type(),
            point.latitude(),
            point.longitude(),
            point.altitude(),
            point.description(),
            timestamp::format(&point.discovery_date()),
            point.responsible(),
            point.srid(),
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let id = PointId::new(conn.last_insert_rowid());
    tracing::info!(%id, "Created excavation point");
    Ok(id)
}

/// Get a point by ID.
pub fn get_point(conn: &Connection, id: PointId) -> Result<Option<ExcavationPoint>> {
    let result = conn.query_row(
        &format!("SELECT {COLS} FROM {TABLE} WHERE id = ?1"),
        [id.get()],
        point_from_row,
    );
    match result {
        Ok(p) => {
            tracing::debug!(%id, "Found excavation point");
            Ok(Some(p))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            tracing::warn!(%id, "Excavation point not found");
            Ok(None)
        }
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List every point. The store imposes no order.
pub fn list_points(conn: &Connection) -> Result<Vec<ExcavationPoint>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {COLS} FROM {TABLE}"))
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], point_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    tracing::info!(count = rows.len(), "Listed excavation points");
    Ok(rows)
}

/// Count stored points.
pub fn count_points(conn: &Connection) -> Result<u64> {
    let n: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {TABLE}"), [], |row| {
            row.get(0)
        })
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n.max(0) as u64)
}

/// Overwrite every column of an existing point except its id.
///
/// Returns `Err(Error::MissingId)` if the point was never persisted and
/// `Ok(false)` if no row has that id.
pub fn update_point(conn: &Connection, point: &ExcavationPoint) -> Result<bool> {
    let Some(id) = point.id() else {
        tracing::error!("Attempted to update an excavation point without an id");
        return Err(Error::MissingId);
    };

    let exists = conn
        .query_row(
            &format!("SELECT 1 FROM {TABLE} WHERE id = ?1"),
            [id.get()],
            |_| Ok(()),
        )
        .optional()
        .map_err(|e| Error::database(e.to_string()))?
        .is_some();

    if !exists {
        tracing::warn!(%id, "Attempted to update a nonexistent excavation point");
        return Ok(false);
    }

    let n = conn
        .execute(
            "UPDATE excavation_points
             SET point_type = ?1, latitude = ?2, longitude = ?3, altitude = ?4,
                 description = ?5, discovery_date = ?6, responsible = ?7, srid = ?8
             WHERE id = ?9",
            rusqlite::params![
                point.point_type(),
                point.latitude(),
                point.longitude(),
                point.altitude(),
                point.description(),
                timestamp::format(&point.discovery_date()),
                point.responsible(),
                point.srid(),
                id.get(),
            ],
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if n > 0 {
        tracing::info!(%id, "Updated excavation point");
    } else {
        tracing::warn!(%id, "Update affected no rows");
    }
    Ok(n > 0)
}

/// Delete a point. Returns `Ok(false)` if there was nothing to delete.
pub fn delete_point(conn: &Connection, id: PointId) -> Result<bool> {
    let n = conn
        .execute(&format!("DELETE FROM {TABLE} WHERE id = ?1"), [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;

    if n > 0 {
        tracing::info!(%id, "Deleted excavation point");
    } else {
        tracing::warn!(%id, "No excavation point to delete");
    }
    Ok(n > 0)
}

/// Substring search using SQLite `LIKE`.
///
/// - empty `query`: every row, whatever `field` is;
/// - `field` given: `field LIKE '%query%'`;
/// - no `field`: the same match against point type, description, or
///   responsible.
///
/// `LIKE` is case-insensitive for ASCII letters only, so "Cerâmica" finds
/// "cerâmica" but "Â" does not find "â".
pub fn search_points(
    conn: &Connection,
    query: &str,
    field: Option<SearchField>,
) -> Result<Vec<PointRecord>> {
    let pattern = format!("%{query}%");

    let (sql, params): (String, Vec<&str>) = if query.is_empty() {
        (format!("SELECT {COLS} FROM {TABLE}"), Vec::new())
    } else {
        let columns: &[SearchField] = match &field {
            Some(f) => std::slice::from_ref(f),
            None => &SearchField::DEFAULT_SET,
        };
        let clause = columns
            .iter()
            .map(|f| format!("{} LIKE ?1", f.column()))
            .collect::<Vec<_>>()
            .join(" OR ");
        (
            format!("SELECT {COLS} FROM {TABLE} WHERE {clause}"),
            vec![pattern.as_str()],
        )
    };

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), PointRecord::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    if rows.is_empty() {
        tracing::info!(query, "No excavation points matched search");
    } else {
        tracing::info!(query, count = rows.len(), "Search matched excavation points");
    }
    Ok(rows)
}
