//! Row models for the `excavation_points` table.
//!
//! [`point_from_row`] rehydrates a validated [`ExcavationPoint`];
//! [`PointRecord`] is the raw, unvalidated row returned by search.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::Type;
use serde::{Deserialize, Serialize};
use sitai_core::{timestamp, ExcavationPoint, PointDraft, PointId};

/// Column list used in SELECT statements, in `from_row` order.
pub(crate) const COLS: &str =
    "id, point_type, latitude, longitude, altitude, description, discovery_date, responsible, srid";

fn conversion_failure(
    idx: usize,
    ty: Type,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

/// Build a validated point from a row selected with [`COLS`].
pub fn point_from_row(row: &rusqlite::Row) -> rusqlite::Result<ExcavationPoint> {
    let raw_date: String = row.get(6)?;
    let discovery_date =
        timestamp::parse(&raw_date).map_err(|e| conversion_failure(6, Type::Text, e))?;

    let draft = PointDraft {
        id: Some(PointId::new(row.get(0)?)),
        point_type: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        altitude: row.get(4)?,
        description: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        discovery_date: Some(discovery_date),
        responsible: row.get(7)?,
        srid: Some(row.get(8)?),
    };

    ExcavationPoint::new(draft).map_err(|e| {
        let idx = match &e {
            sitai_core::Error::Validation(v) => column_index(v.field()),
            _ => 0,
        };
        conversion_failure(idx, Type::Real, e)
    })
}

/// Position of `column` in [`COLS`].
fn column_index(column: &str) -> usize {
    COLS.split(", ").position(|c| c == column).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// PointRecord
// ---------------------------------------------------------------------------

/// A row exactly as stored, with no range checks and the date left as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: i64,
    pub point_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub description: Option<String>,
    pub discovery_date: String,
    pub responsible: String,
    pub srid: String,
}

impl PointRecord {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            point_type: row.get(1)?,
            latitude: row.get(2)?,
            longitude: row.get(3)?,
            altitude: row.get(4)?,
            description: row.get(5)?,
            discovery_date: row.get(6)?,
            responsible: row.get(7)?,
            srid: row.get(8)?,
        })
    }

    pub fn point_id(&self) -> PointId {
        PointId::new(self.id)
    }

    /// Validate this row into a full point, if it is well formed.
    pub fn into_point(self) -> sitai_core::Result<ExcavationPoint> {
        let discovery_date =
            timestamp::parse(&self.discovery_date).map_err(sitai_core::Error::database)?;
        ExcavationPoint::new(PointDraft {
            id: Some(PointId::new(self.id)),
            point_type: self.point_type,
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
            description: self.description.unwrap_or_default(),
            discovery_date: Some(discovery_date),
            responsible: self.responsible,
            srid: Some(self.srid),
        })
    }
}

// ---------------------------------------------------------------------------
// SearchField
// ---------------------------------------------------------------------------

/// Text column a search can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    PointType,
    Description,
    Responsible,
    Srid,
}

impl SearchField {
    /// Columns matched when no field is given.
    pub const DEFAULT_SET: [SearchField; 3] = [
        SearchField::PointType,
        SearchField::Description,
        SearchField::Responsible,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Self::PointType => "point_type",
            Self::Description => "description",
            Self::Responsible => "responsible",
            Self::Srid => "srid",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point_type" => Ok(Self::PointType),
            "description" => Ok(Self::Description),
            "responsible" => Ok(Self::Responsible),
            "srid" => Ok(Self::Srid),
            _ => Err(format!("Invalid search field: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_field_parse_and_display() {
        for field in [
            SearchField::PointType,
            SearchField::Description,
            SearchField::Responsible,
            SearchField::Srid,
        ] {
            assert_eq!(field.to_string().parse::<SearchField>().unwrap(), field);
        }
        assert!("latitude".parse::<SearchField>().is_err());
        assert!("id; DROP TABLE excavation_points".parse::<SearchField>().is_err());
    }

    #[test]
    fn validated_columns_map_to_their_index() {
        assert_eq!(column_index("latitude"), 2);
        assert_eq!(column_index("longitude"), 3);
        assert_eq!(column_index("altitude"), 4);
    }

    #[test]
    fn record_into_point_validates() {
        let record = PointRecord {
            id: 5,
            point_type: "Outro".into(),
            latitude: 120.0,
            longitude: 0.0,
            altitude: 0.0,
            description: None,
            discovery_date: "2024-01-01T00:00:00".into(),
            responsible: "r".into(),
            srid: "WGS84".into(),
        };
        assert!(matches!(
            record.clone().into_point(),
            Err(sitai_core::Error::Validation(_))
        ));

        let ok = PointRecord {
            latitude: 12.0,
            ..record
        }
        .into_point()
        .unwrap();
        assert_eq!(ok.id(), Some(PointId::new(5)));
        assert_eq!(ok.description(), "");
    }

    #[test]
    fn record_serializes_raw_date() {
        let record = PointRecord {
            id: 1,
            point_type: "t".into(),
            latitude: 1.0,
            longitude: 2.0,
            altitude: 3.0,
            description: Some("d".into()),
            discovery_date: "2024-01-01T00:00:00".into(),
            responsible: "r".into(),
            srid: "WGS84".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["discovery_date"], "2024-01-01T00:00:00");
    }
}
