//! Text rendering for listings, search results, and detail views.
//!
//! The store returns rows in no particular order; ordering for display is
//! decided here by [`SortKey`].

use std::cmp::Ordering;
use std::fmt::Write as _;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use sitai_core::{timestamp, ExcavationPoint};
use sitai_db::PointRecord;

/// Column a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    Id,
    #[value(name = "type")]
    PointType,
    Date,
    Responsible,
}

/// One line of a listing, built from either a validated point or a raw
/// search row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: i64,
    pub point_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub discovery_date: Option<NaiveDateTime>,
    raw_date: String,
    pub responsible: String,
    pub srid: String,
}

impl From<&ExcavationPoint> for TableRow {
    fn from(p: &ExcavationPoint) -> Self {
        Self {
            id: p.id().map(i64::from).unwrap_or_default(),
            point_type: p.point_type().to_string(),
            latitude: p.latitude(),
            longitude: p.longitude(),
            altitude: p.altitude(),
            discovery_date: Some(p.discovery_date()),
            raw_date: timestamp::format(&p.discovery_date()),
            responsible: p.responsible().to_string(),
            srid: p.srid().to_string(),
        }
    }
}

impl From<&PointRecord> for TableRow {
    fn from(r: &PointRecord) -> Self {
        Self {
            id: r.id,
            point_type: r.point_type.clone(),
            latitude: r.latitude,
            longitude: r.longitude,
            altitude: r.altitude,
            discovery_date: timestamp::parse(&r.discovery_date).ok(),
            raw_date: r.discovery_date.clone(),
            responsible: r.responsible.clone(),
            srid: r.srid.clone(),
        }
    }
}

fn compare(a: &TableRow, b: &TableRow, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Id => Ordering::Equal,
        SortKey::PointType => a.point_type.cmp(&b.point_type),
        SortKey::Date => a.discovery_date.cmp(&b.discovery_date),
        SortKey::Responsible => a.responsible.cmp(&b.responsible),
    };
    primary.then(a.id.cmp(&b.id))
}

/// Order points or raw records by `key`; ties keep id order.
pub fn sort_items<T>(items: Vec<T>, key: SortKey) -> Vec<T>
where
    for<'a> TableRow: From<&'a T>,
{
    let mut keyed: Vec<(TableRow, T)> = items
        .into_iter()
        .map(|item| (TableRow::from(&item), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare(a, b, key));
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Render a date with a user-supplied strftime pattern, falling back to
/// ISO-8601 if the pattern is invalid.
pub fn format_date(dt: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", dt.format(pattern)).is_err() {
        return timestamp::format(dt);
    }
    out
}

/// Cut `text` to at most `max` characters, appending "..." when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

/// Render rows as an aligned text table.
pub fn render_table(rows: &[TableRow], date_pattern: &str) -> String {
    let dates: Vec<String> = rows
        .iter()
        .map(|r| match &r.discovery_date {
            Some(dt) => format_date(dt, date_pattern),
            None => r.raw_date.clone(),
        })
        .collect();

    let type_w = rows
        .iter()
        .map(|r| r.point_type.chars().count())
        .chain(["Type".len()])
        .max()
        .unwrap_or(4);
    let date_w = dates
        .iter()
        .map(|d| d.chars().count())
        .chain(["Discovered".len()])
        .max()
        .unwrap_or(10);
    let resp_w = rows
        .iter()
        .map(|r| r.responsible.chars().count())
        .chain(["Responsible".len()])
        .max()
        .unwrap_or(11);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<type_w$}  {:>11}  {:>11}  {:>9}  {:<date_w$}  {:<resp_w$}  SRID",
        "ID", "Type", "Latitude", "Longitude", "Altitude", "Discovered", "Responsible",
    );
    for (row, date) in rows.iter().zip(&dates) {
        let _ = writeln!(
            out,
            "{:>5}  {:<type_w$}  {:>11.6}  {:>11.6}  {:>9.1}  {:<date_w$}  {:<resp_w$}  {}",
            row.id,
            row.point_type,
            row.latitude,
            row.longitude,
            row.altitude,
            date,
            row.responsible,
            row.srid,
        );
    }
    out
}

/// Multi-line detail view of one point.
pub fn render_detail(point: &ExcavationPoint, date_pattern: &str) -> String {
    let mut out = String::new();
    match point.id() {
        Some(id) => {
            let _ = writeln!(out, "Point #{id}");
        }
        None => {
            let _ = writeln!(out, "Point (not saved)");
        }
    }
    let _ = writeln!(out, "Type:        {}", point.point_type());
    let _ = writeln!(out, "Latitude:    {}", point.latitude());
    let _ = writeln!(out, "Longitude:   {}", point.longitude());
    let _ = writeln!(out, "Altitude:    {} m", point.altitude());
    let _ = writeln!(out, "SRID:        {}", point.srid());
    let _ = writeln!(
        out,
        "Discovered:  {}",
        format_date(&point.discovery_date(), date_pattern)
    );
    let _ = writeln!(out, "Responsible: {}", point.responsible());
    let _ = writeln!(out, "Description:");
    let _ = writeln!(out, "{}", point.description());
    out
}

/// Short summary shown before asking to confirm a deletion.
pub fn render_delete_summary(point: &ExcavationPoint, preview: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "About to remove point: {} (ID: {})",
        point.point_type(),
        point.id().map(|id| id.to_string()).unwrap_or_default()
    );
    let _ = writeln!(
        out,
        "Latitude: {}, Longitude: {}",
        point.latitude(),
        point.longitude()
    );
    let _ = writeln!(out, "Responsible: {}", point.responsible());
    let _ = writeln!(out, "Description: {}", truncate(point.description(), preview));
    out
}
