//! Typed identifier for persisted excavation points.
//!
//! SQLite assigns the value (`INTEGER PRIMARY KEY AUTOINCREMENT`). A
//! `PointId` comes from the store or from user input naming an existing row.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row identifier of an excavation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(i64);

impl PointId {
    /// Wrap a raw row id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Return the raw row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PointId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for PointId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<PointId> for i64 {
    fn from(id: PointId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse() {
        let id: PointId = " 17 ".parse().unwrap();
        assert_eq!(id, PointId::new(17));
        assert_eq!(id.to_string(), "17");
        assert!("abc".parse::<PointId>().is_err());
    }

    #[test]
    fn serde_transparent() {
        let json = serde_json::to_string(&PointId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: PointId = serde_json::from_str(&json).unwrap();
        assert_eq!(i64::from(back), 3);
    }
}
