//! Table definition for excavation points.
//!
//! There is a single table and no versioned migrations; creating it is
//! idempotent and safe to repeat on every open.

use rusqlite::Connection;
use sitai_core::{Error, Result};

/// Name of the one table owned by the store.
pub const TABLE: &str = "excavation_points";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS excavation_points (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    point_type     TEXT NOT NULL,
    latitude       REAL NOT NULL,
    longitude      REAL NOT NULL,
    altitude       REAL NOT NULL,
    description    TEXT,
    discovery_date TEXT NOT NULL,
    responsible    TEXT NOT NULL,
    srid           TEXT NOT NULL
);
"#;

/// Create the points table if it does not exist yet.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE)
        .map_err(|e| Error::database(format!("Failed to create {TABLE}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [TABLE],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_columns() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        let mut stmt = conn
            .prepare("SELECT name, \"notnull\" FROM pragma_table_info('excavation_points') ORDER BY cid")
            .unwrap();
        let cols: Vec<(String, bool)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        let names: Vec<&str> = cols.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            [
                "id",
                "point_type",
                "latitude",
                "longitude",
                "altitude",
                "description",
                "discovery_date",
                "responsible",
                "srid"
            ]
        );
        let description_nullable = cols.iter().any(|(n, nn)| n == "description" && !nn);
        assert!(description_nullable);
    }

    #[test]
    fn test_existing_rows_survive() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO excavation_points (point_type, latitude, longitude, altitude,
                description, discovery_date, responsible, srid)
             VALUES ('a', 0, 0, 0, 'b', '2024-01-01T00:00:00', 'c', 'WGS84')",
            [],
        )
        .unwrap();

        ensure_schema(&conn).unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM excavation_points", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
    }
}
