use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A position in decimal degrees, latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a point from a `[longitude, latitude]` pair as returned by ORS.
    pub fn from_lon_lat(coords: [f64; 2]) -> Self {
        Self::new(coords[1], coords[0])
    }

    /// The `[longitude, latitude]` pair expected by ORS request bodies.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateParseError {
    #[error("expected \"lat,lon\" but found {0} part(s)")]
    WrongArity(usize),

    #[error("\"{0}\" is not a finite number")]
    NotANumber(String),

    #[error("coordinate {0} is out of range")]
    OutOfRange(GeoPoint),
}

impl FromStr for GeoPoint {
    type Err = CoordinateParseError;

    /// Parses a literal `"lat,lon"` pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(CoordinateParseError::WrongArity(parts.len()));
        }

        let parse = |part: &str| -> Result<f64, CoordinateParseError> {
            let trimmed = part.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| CoordinateParseError::NotANumber(trimmed.to_string()))
        };

        let point = GeoPoint::new(parse(parts[0])?, parse(parts[1])?);
        if !point.is_valid() {
            return Err(CoordinateParseError::OutOfRange(point));
        }
        Ok(point)
    }
}

/// An ordered route geometry in traversal order. Vertices are never reordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Converts a longitude-first geometry (as received from the router).
    pub fn from_lon_lat(coords: &[[f64; 2]]) -> Self {
        Self::new(coords.iter().copied().map(GeoPoint::from_lon_lat).collect())
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    /// Consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

impl From<Vec<GeoPoint>> for Polyline {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}
