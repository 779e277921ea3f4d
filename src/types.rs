//! Shared types used across s2ndvi.
//! Includes the query inputs `AreaOfInterest` and `DateRange`, and the
//! exportable `Product` selector.
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expr::Geometry;

/// Point or polygon bounding the remote queries.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AreaOfInterest {
    Point { lon: f64, lat: f64 },
    /// Single outer ring of lon/lat vertices.
    Polygon { coordinates: Vec<[f64; 2]> },
    Rectangle {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },
}

impl AreaOfInterest {
    pub fn to_geometry(&self) -> Geometry {
        match self {
            AreaOfInterest::Point { lon, lat } => Geometry::point(*lon, *lat),
            AreaOfInterest::Polygon { coordinates } => Geometry::polygon(coordinates),
            AreaOfInterest::Rectangle {
                west,
                south,
                east,
                north,
            } => Geometry::rectangle(*west, *south, *east, *north),
        }
    }
}

impl Default for AreaOfInterest {
    fn default() -> Self {
        AreaOfInterest::Point {
            lon: -122.269,
            lat: 45.701,
        }
    }
}

impl std::fmt::Display for AreaOfInterest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaOfInterest::Point { lon, lat } => write!(f, "Point({}, {})", lon, lat),
            AreaOfInterest::Polygon { coordinates } => {
                write!(f, "Polygon({} vertices)", coordinates.len())
            }
            AreaOfInterest::Rectangle {
                west,
                south,
                east,
                north,
            } => write!(f, "Rectangle({}, {}, {}, {})", west, south, east, north),
        }
    }
}

/// Start/end acquisition dates. Ordering is not checked here; the service
/// rejects malformed ranges.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse two `YYYY-MM-DD` dates.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: NaiveDate::parse_from_str(start, "%Y-%m-%d")?,
            end: NaiveDate::parse_from_str(end, "%Y-%m-%d")?,
        })
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2020, 6, 2).unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Which raster the export produces.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Serialize, Deserialize)]
pub enum Product {
    /// Single-band vegetation index of the cloud-masked composite
    Ndvi,
    /// Cloud-masked median composite of all reflectance bands
    Composite,
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Product::Ndvi => write!(f, "NDVI"),
            Product::Composite => write!(f, "Composite"),
        }
    }
}
