//! The excavation point record and its construction-time validation.
//!
//! An [`ExcavationPoint`] can only be obtained from a [`PointDraft`] whose
//! coordinates are in range and whose altitude is finite. The numeric
//! setters re-run the same checks, so every value of the type can be stored.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::ids::PointId;
use crate::timestamp;
use crate::Error;

/// Spatial reference system assumed when none is given.
pub const DEFAULT_SRID: &str = "WGS84";

const LATITUDE: (&str, f64, f64) = ("latitude", -90.0, 90.0);
const LONGITUDE: (&str, f64, f64) = ("longitude", -180.0, 180.0);

fn check_range((field, min, max): (&'static str, f64, f64), value: f64) -> Result<f64> {
    // NaN fails `contains`, which is what we want.
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Error::Validation(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        }))
    }
}

// SQLite stores NaN as NULL, which the NOT NULL altitude column rejects.
fn check_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Validation(ValidationError::NotFinite { field, value }))
    }
}

/// Unvalidated input for building an [`ExcavationPoint`].
///
/// `discovery_date` and `srid` are optional and fall back to the current
/// local time and [`DEFAULT_SRID`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PointId>,
    pub point_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub description: String,
    #[serde(default)]
    pub discovery_date: Option<NaiveDateTime>,
    pub responsible: String,
    #[serde(default)]
    pub srid: Option<String>,
}

/// One catalogued archaeological find or feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointDraft")]
pub struct ExcavationPoint {
    id: Option<PointId>,
    point_type: String,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    description: String,
    discovery_date: NaiveDateTime,
    responsible: String,
    srid: String,
}

impl ExcavationPoint {
    /// Build a point from a draft, rejecting out-of-range coordinates and a
    /// non-finite altitude.
    pub fn new(draft: PointDraft) -> Result<Self> {
        let latitude = check_range(LATITUDE, draft.latitude)?;
        let longitude = check_range(LONGITUDE, draft.longitude)?;
        let altitude = check_finite("altitude", draft.altitude)?;

        Ok(Self {
            id: draft.id,
            point_type: draft.point_type,
            latitude,
            longitude,
            altitude,
            description: draft.description,
            discovery_date: draft.discovery_date.unwrap_or_else(timestamp::now),
            responsible: draft.responsible,
            srid: draft.srid.unwrap_or_else(|| DEFAULT_SRID.to_string()),
        })
    }

    /// Attach the identifier assigned by the store.
    #[must_use]
    pub fn with_id(mut self, id: PointId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<PointId> {
        self.id
    }

    pub fn point_type(&self) -> &str {
        &self.point_type
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn discovery_date(&self) -> NaiveDateTime {
        self.discovery_date
    }

    pub fn responsible(&self) -> &str {
        &self.responsible
    }

    pub fn srid(&self) -> &str {
        &self.srid
    }

    pub fn set_point_type(&mut self, point_type: impl Into<String>) {
        self.point_type = point_type.into();
    }

    /// Replace the latitude; the point is left unchanged on error.
    pub fn set_latitude(&mut self, latitude: f64) -> Result<()> {
        self.latitude = check_range(LATITUDE, latitude)?;
        Ok(())
    }

    /// Replace the longitude; the point is left unchanged on error.
    pub fn set_longitude(&mut self, longitude: f64) -> Result<()> {
        self.longitude = check_range(LONGITUDE, longitude)?;
        Ok(())
    }

    /// Replace the altitude; the point is left unchanged on error.
    pub fn set_altitude(&mut self, altitude: f64) -> Result<()> {
        self.altitude = check_finite("altitude", altitude)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_discovery_date(&mut self, discovery_date: NaiveDateTime) {
        self.discovery_date = discovery_date;
    }

    pub fn set_responsible(&mut self, responsible: impl Into<String>) {
        self.responsible = responsible.into();
    }

    pub fn set_srid(&mut self, srid: impl Into<String>) {
        self.srid = srid.into();
    }

    /// Compare every field except `id`.
    pub fn same_content(&self, other: &Self) -> bool {
        self.point_type == other.point_type
            && self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.altitude == other.altitude
            && self.description == other.description
            && self.discovery_date == other.discovery_date
            && self.responsible == other.responsible
            && self.srid == other.srid
    }

    /// Turn the point back into an editable draft.
    pub fn into_draft(self) -> PointDraft {
        PointDraft {
            id: self.id,
            point_type: self.point_type,
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
            description: self.description,
            discovery_date: Some(self.discovery_date),
            responsible: self.responsible,
            srid: Some(self.srid),
        }
    }
}

impl TryFrom<PointDraft> for ExcavationPoint {
    type Error = Error;

    fn try_from(draft: PointDraft) -> Result<Self> {
        Self::new(draft)
    }
}
