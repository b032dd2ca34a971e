//! Cable Atlas Library
//!
//! Submarine telecommunication cable geometry: the cable polyline model,
//! the planar geodesy helpers used by impact scoring, and GeoJSON loading
//! for the public cable-route feed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod loader;

#[derive(Error, Debug)]
pub enum CableError {
    #[error("Cable has no coordinates: {0}")]
    EmptyGeometry(String),
    #[error("Invalid geometry: {0}")]
    BadGeometry(String),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CableError>;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Planar angular separation in degrees: `sqrt(dlon^2 + dlat^2)`.
///
/// Deliberately not a great-circle distance. Scores only ever compare
/// separations against each other and against the 180-degree decay scale,
/// so the cheap planar metric is enough.
pub fn angular_separation(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlon = a.lon - b.lon;
    let dlat = a.lat - b.lat;
    (dlon * dlon + dlat * dlat).sqrt()
}

/// A submarine cable route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cable {
    pub id: String,
    pub name: String,
    /// Ordered route coordinates. Endpoints matter for arc rendering; the
    /// midpoint element stands in for "cable location" in scoring.
    pub coordinates: Vec<GeoPoint>,
    #[serde(default)]
    pub owners: Vec<String>,
    /// Ready-for-service date as reported by the upstream feed (free-form).
    #[serde(default = "unknown_rfs")]
    pub rfs: String,
}

fn unknown_rfs() -> String {
    "Unknown".to_string()
}

impl Cable {
    /// The coordinate at index `floor(n/2)` of the route polyline.
    ///
    /// Order-dependent by contract: this is the element the scoring engines
    /// treat as the cable's location, not a geometric centroid.
    pub fn midpoint(&self) -> Result<GeoPoint> {
        self.coordinates
            .get(self.coordinates.len() / 2)
            .copied()
            .ok_or_else(|| CableError::EmptyGeometry(self.id.clone()))
    }
}
