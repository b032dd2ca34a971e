//! CME simulation engine
//!
//! The "what-if" view: projects a hypothetical CME's Earth arrival time
//! and scores every cable by launch speed and planar proximity of its
//! midpoint to the launch direction. Fully deterministic, unlike the
//! real-time engine: identical inputs yield identical outcomes.

use crate::{classify, CmeParameters, Prediction, Result, SimulationOutcome};
use cable_atlas::{angular_separation, Cable, GeoPoint};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Sun-Earth distance, 1 AU approximation (km)
pub const SUN_EARTH_DISTANCE_KM: f64 = 150_000_000.0;
/// Slow-CME floor: speeds at or below contribute zero speed factor (km/s)
pub const SLOW_CME_KM_S: f64 = 400.0;
/// Fast-CME ceiling: the speed factor reaches 1 here (km/s)
pub const FAST_CME_KM_S: f64 = 3000.0;
/// Weight of launch speed
pub const W_SPEED: f64 = 0.6;
/// Weight of directional proximity
pub const W_PROXIMITY: f64 = 0.4;
/// Proximity decays linearly to zero at this planar separation (degrees)
pub const PROXIMITY_DECAY_DEG: f64 = 180.0;
/// Scores above this inherit the computed arrival time.
/// Intentionally lower than the real-time engine's 0.5 threshold.
pub const IMPACT_TIME_THRESHOLD: f64 = 0.3;

/// Project the CME's Earth arrival from its launch time and speed.
///
/// Ballistic at constant speed over 1 AU; millisecond precision.
pub fn project_arrival(params: &CmeParameters) -> Result<DateTime<Utc>> {
    params.validate()?;
    let travel_hours = SUN_EARTH_DISTANCE_KM / params.speed / 3600.0;
    Ok(params.start_time + Duration::milliseconds((travel_hours * 3_600_000.0).round() as i64))
}

/// Score every cable against the hypothetical CME.
///
/// Predictions come back sorted descending by impact score; the stable
/// sort keeps input cable order for ties.
pub fn run_simulation(params: &CmeParameters, cables: &[Cable]) -> Result<SimulationOutcome> {
    let arrival_time = project_arrival(params)?;
    let direction = GeoPoint::new(params.direction_longitude, params.direction_latitude);

    // Linear ramp between the slow floor and fast ceiling, clamped
    let speed_factor =
        ((params.speed - SLOW_CME_KM_S) / (FAST_CME_KM_S - SLOW_CME_KM_S)).clamp(0.0, 1.0);

    let mut predictions = Vec::with_capacity(cables.len());
    for cable in cables {
        let midpoint = cable.midpoint()?;
        let separation = angular_separation(midpoint, direction);
        let proximity_factor = (1.0 - separation / PROXIMITY_DECAY_DEG).max(0.0);

        let impact_score = (W_SPEED * speed_factor + W_PROXIMITY * proximity_factor).min(1.0);
        let risk_level = classify(impact_score);

        debug!(
            "Simulated {}: {:.3} at {:.1} deg separation",
            cable.name, impact_score, separation
        );

        predictions.push(Prediction {
            cable_id: cable.id.clone(),
            cable_name: cable.name.clone(),
            impact_score,
            risk_level,
            estimated_impact_time: (impact_score > IMPACT_TIME_THRESHOLD).then_some(arrival_time),
        });
    }

    predictions.sort_by(|a, b| {
        b.impact_score
            .partial_cmp(&a.impact_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(SimulationOutcome {
        arrival_time,
        predictions,
    })
}
