//! Subsolar point calculator
//!
//! Closed-form approximation of the point where the sun is directly
//! overhead: solar declination from a sine fit of the orbital year,
//! longitude from a linear sweep of the UTC day. Good enough to anchor
//! the globe's day/night context; not an ephemeris.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Earth's axial tilt (degrees)
const AXIAL_TILT_DEG: f64 = 23.44;
/// Day-of-year of the spring equinox in the sine fit
const EQUINOX_DAY: f64 = 81.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubsolarPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// The subsolar point at `now`. Pure function of wall-clock time.
///
/// Longitude sweeps from -180 at UTC midnight toward +180 at the end of
/// the UTC day.
pub fn subsolar_point(now: DateTime<Utc>) -> SubsolarPoint {
    let day_of_year = now.ordinal() as f64;
    let latitude = AXIAL_TILT_DEG * (2.0 * PI / 365.0 * (day_of_year - EQUINOX_DAY)).sin();

    let hours_from_midnight = f64::from(now.hour()) + f64::from(now.minute()) / 60.0;
    let longitude = hours_from_midnight / 24.0 * 360.0 - 180.0;

    SubsolarPoint {
        latitude,
        longitude,
    }
}
