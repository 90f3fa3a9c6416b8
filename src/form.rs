//! Field input shared by `create` and `update`.
//!
//! `create` needs every required field; `update` loads the stored point
//! and overlays only the fields that were given, then rebuilds the point so
//! coordinates are validated again.

use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use clap::Args;
use sitai_core::{timestamp, ExcavationPoint, PointDraft};

/// Point type suggestions listed by the `vocabulary` command.
pub const KNOWN_POINT_TYPES: &[&str] = &[
    "Antiga cabana indígena",
    "Utensílio indígena",
    "Artefato indígena",
    "Restos mortais",
    "Armas de caça",
    "Possível vestimenta",
];

#[derive(Debug, Clone, Default, Args)]
pub struct PointFields {
    /// Point type, e.g. "Artefato indígena" or any other label
    #[arg(long = "type")]
    pub point_type: Option<String>,

    /// Latitude in degrees, -90 to 90
    #[arg(long = "lat", allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude in degrees, -180 to 180
    #[arg(long = "lon", allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Altitude in meters
    #[arg(long = "alt", allow_negative_numbers = true)]
    pub altitude: Option<f64>,

    /// Detailed description
    #[arg(long)]
    pub description: Option<String>,

    /// Person responsible for the record
    #[arg(long)]
    pub responsible: Option<String>,

    /// Discovery date (YYYY-MM-DD or full ISO-8601 timestamp)
    #[arg(long, value_parser = parse_date_input)]
    pub date: Option<NaiveDateTime>,

    /// Spatial reference system (WGS84, SIRGAS2000, SAD69, ...)
    #[arg(long)]
    pub srid: Option<String>,
}

/// Parse a discovery date typed on the command line. A bare date means
/// midnight of that day.
pub fn parse_date_input(s: &str) -> std::result::Result<NaiveDateTime, String> {
    timestamp::parse(s).map_err(|e| e.to_string())
}

fn non_empty(flag: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{flag} cannot be empty");
    }
    Ok(trimmed.to_string())
}

impl PointFields {
    /// Whether no field was given at all.
    pub fn is_empty(&self) -> bool {
        self.point_type.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.altitude.is_none()
            && self.description.is_none()
            && self.responsible.is_none()
            && self.date.is_none()
            && self.srid.is_none()
    }

    /// Build a brand new point. All fields except date and SRID are
    /// required; `default_srid` fills in a missing SRID.
    pub fn into_new_point(self, default_srid: &str) -> Result<ExcavationPoint> {
        let mut missing = Vec::new();
        if self.point_type.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("--type");
        }
        if self.latitude.is_none() {
            missing.push("--lat");
        }
        if self.longitude.is_none() {
            missing.push("--lon");
        }
        if self.altitude.is_none() {
            missing.push("--alt");
        }
        if self.description.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("--description");
        }
        if self.responsible.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("--responsible");
        }
        if !missing.is_empty() {
            bail!("Fill in all required fields: {}", missing.join(", "));
        }

        let srid = match self.srid {
            Some(s) => non_empty("--srid", &s)?,
            None => default_srid.to_string(),
        };

        let point = ExcavationPoint::new(PointDraft {
            id: None,
            point_type: self.point_type.unwrap_or_default().trim().to_string(),
            latitude: self.latitude.unwrap_or_default(),
            longitude: self.longitude.unwrap_or_default(),
            altitude: self.altitude.unwrap_or_default(),
            description: self.description.unwrap_or_default().trim().to_string(),
            discovery_date: self.date,
            responsible: self.responsible.unwrap_or_default().trim().to_string(),
            srid: Some(srid),
        })?;
        Ok(point)
    }

    /// Overlay the given fields on a loaded point and rebuild it.
    pub fn apply_to(self, point: ExcavationPoint) -> Result<ExcavationPoint> {
        let mut draft = point.into_draft();

        if let Some(v) = self.point_type {
            draft.point_type = non_empty("--type", &v)?;
        }
        if let Some(v) = self.latitude {
            draft.latitude = v;
        }
        if let Some(v) = self.longitude {
            draft.longitude = v;
        }
        if let Some(v) = self.altitude {
            draft.altitude = v;
        }
        if let Some(v) = self.description {
            draft.description = non_empty("--description", &v)?;
        }
        if let Some(v) = self.responsible {
            draft.responsible = non_empty("--responsible", &v)?;
        }
        if let Some(v) = self.date {
            draft.discovery_date = Some(v);
        }
        if let Some(v) = self.srid {
            draft.srid = Some(non_empty("--srid", &v)?);
        }

        Ok(ExcavationPoint::new(draft)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sitai_core::PointId;

    fn full() -> PointFields {
        PointFields {
            point_type: Some("Artefato indígena".into()),
            latitude: Some(-3.119),
            longitude: Some(-60.0217),
            altitude: Some(92.0),
            description: Some("Cerâmica com desenhos geométricos".into()),
            responsible: Some(" Dr. Ana Silva ".into()),
            date: None,
            srid: None,
        }
    }

    #[test]
    fn new_point_uses_default_srid() {
        let point = full().into_new_point("SIRGAS2000").unwrap();
        assert_eq!(point.srid(), "SIRGAS2000");
        assert_eq!(point.responsible(), "Dr. Ana Silva");
        assert!(point.id().is_none());
    }

    #[test]
    fn new_point_lists_missing_fields() {
        let fields = PointFields {
            description: Some("   ".into()),
            latitude: None,
            ..full()
        };
        let err = fields.into_new_point("WGS84").unwrap_err().to_string();
        assert!(err.contains("--lat"));
        assert!(err.contains("--description"));
        assert!(!err.contains("--type"));
    }

    #[test]
    fn new_point_rejects_out_of_range() {
        let fields = PointFields {
            longitude: Some(200.0),
            ..full()
        };
        let err = fields.into_new_point("WGS84").unwrap_err();
        let core = err.downcast_ref::<sitai_core::Error>().unwrap();
        assert!(matches!(core, sitai_core::Error::Validation(v) if v.field() == "longitude"));
    }

    #[test]
    fn apply_overlays_only_given_fields() {
        let stored = full()
            .into_new_point("WGS84")
            .unwrap()
            .with_id(PointId::new(4));
        let edits = PointFields {
            description: Some("Descrição atualizada".into()),
            date: parse_date_input("2023-07-14").ok(),
            ..Default::default()
        };

        let edited = edits.apply_to(stored.clone()).unwrap();
        assert_eq!(edited.id(), Some(PointId::new(4)));
        assert_eq!(edited.description(), "Descrição atualizada");
        assert_eq!(edited.point_type(), stored.point_type());
        assert_eq!(
            edited.discovery_date(),
            NaiveDate::from_ymd_opt(2023, 7, 14)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn apply_revalidates_coordinates() {
        let stored = full().into_new_point("WGS84").unwrap();
        let edits = PointFields {
            latitude: Some(-91.0),
            ..Default::default()
        };
        assert!(edits.apply_to(stored).is_err());
    }

    #[test]
    fn nan_altitude_is_a_validation_error() {
        let fields = PointFields {
            altitude: Some(f64::NAN),
            ..full()
        };
        let err = fields.into_new_point("WGS84").unwrap_err();
        let core = err.downcast_ref::<sitai_core::Error>().unwrap();
        assert!(matches!(core, sitai_core::Error::Validation(v) if v.field() == "altitude"));

        let stored = full().into_new_point("WGS84").unwrap();
        let edits = PointFields {
            altitude: Some(f64::NAN),
            ..Default::default()
        };
        assert!(edits.apply_to(stored).is_err());
    }

    #[test]
    fn apply_rejects_blank_text() {
        let stored = full().into_new_point("WGS84").unwrap();
        let edits = PointFields {
            responsible: Some("".into()),
            ..Default::default()
        };
        let err = edits.apply_to(stored).unwrap_err().to_string();
        assert_eq!(err, "--responsible cannot be empty");
    }

    #[test]
    fn emptiness() {
        assert!(PointFields::default().is_empty());
        assert!(!full().is_empty());
    }
}
