//! Impact Scoring Library
//!
//! The scoring core of the solarwatch dashboard: converts solar-wind
//! telemetry (or hypothetical CME parameters) plus cable geometry into
//! per-cable impact scores, risk tiers, and estimated impact times.
//!
//! # Risk tiers
//!
//! ```text
//! score > 0.7 -> critical
//! score > 0.5 -> high
//! score > 0.3 -> medium
//! otherwise   -> low
//! ```
//!
//! Strict greater-than at every boundary, shared verbatim by the
//! real-time and simulation engines so the two views never disagree on a
//! tier for the same score.
//!
//! This is an explainable heuristic for a dashboard, not a validated
//! space-weather model.

use cable_atlas::CableError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod entropy;
pub mod realtime;
pub mod simulation;
pub mod subsolar;

pub use entropy::{EntropySource, FixedEntropy, SystemEntropy};
pub use realtime::score_cables;
pub use simulation::{project_arrival, run_simulation};
pub use subsolar::{subsolar_point, SubsolarPoint};

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("CME speed must be positive and finite, got {0} km/s")]
    InvalidCmeSpeed(f64),
    #[error("CME direction {axis} out of range: {value}")]
    DirectionOutOfRange { axis: &'static str, value: f64 },
    #[error("Cable geometry error: {0}")]
    Geometry(#[from] CableError),
}

pub type Result<T> = std::result::Result<T, ScoringError>;

/// Classifier thresholds (strict greater-than)
pub const CRITICAL_THRESHOLD: f64 = 0.7;
pub const HIGH_THRESHOLD: f64 = 0.5;
pub const MEDIUM_THRESHOLD: f64 = 0.3;

/// Risk tier, totally ordered by ascending severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

/// Classify a [0,1] impact score into a risk tier.
///
/// Total and deterministic; boundary values (exactly 0.7, 0.5, 0.3)
/// classify into the lower tier.
pub fn classify(score: f64) -> RiskTier {
    match score {
        s if s > CRITICAL_THRESHOLD => RiskTier::Critical,
        s if s > HIGH_THRESHOLD => RiskTier::High,
        s if s > MEDIUM_THRESHOLD => RiskTier::Medium,
        _ => RiskTier::Low,
    }
}

/// Hypothetical CME launch parameters, validated at the boundary.
///
/// Field names match the dashboard wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmeParameters {
    pub start_time: DateTime<Utc>,
    /// km/s; expected range 400-3000, must be positive
    #[serde(rename = "cme_speed")]
    pub speed: f64,
    pub direction_longitude: f64,
    pub direction_latitude: f64,
}

impl CmeParameters {
    /// Reject inputs that would propagate non-finite values into the
    /// arrival-time division or the proximity metric.
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ScoringError::InvalidCmeSpeed(self.speed));
        }
        if !(-180.0..=180.0).contains(&self.direction_longitude)
            || !self.direction_longitude.is_finite()
        {
            return Err(ScoringError::DirectionOutOfRange {
                axis: "longitude",
                value: self.direction_longitude,
            });
        }
        if !(-90.0..=90.0).contains(&self.direction_latitude)
            || !self.direction_latitude.is_finite()
        {
            return Err(ScoringError::DirectionOutOfRange {
                axis: "latitude",
                value: self.direction_latitude,
            });
        }
        Ok(())
    }
}

/// One scoring result per cable per run.
///
/// Derived view of the inputs at the moment of computation; never
/// persisted or mutated. Score and tier always agree under [`classify`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub cable_id: String,
    pub cable_name: String,
    /// Synthetic [0,1] severity proxy, not a physical unit
    pub impact_score: f64,
    pub risk_level: RiskTier,
    /// Present iff the score crossed the engine's impact-time threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_impact_time: Option<DateTime<Utc>>,
}

/// Result of a CME what-if run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub arrival_time: DateTime<Utc>,
    /// Sorted descending by impact score; ties keep input cable order
    pub predictions: Vec<Prediction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_boundaries_fall_into_lower_tier() {
        assert_eq!(classify(0.7), RiskTier::High);
        assert_eq!(classify(0.5), RiskTier::Medium);
        assert_eq!(classify(0.3), RiskTier::Low);
    }

    #[test]
    fn test_classify_interior_values() {
        assert_eq!(classify(0.0), RiskTier::Low);
        assert_eq!(classify(0.31), RiskTier::Medium);
        assert_eq!(classify(0.51), RiskTier::High);
        assert_eq!(classify(0.71), RiskTier::Critical);
        assert_eq!(classify(1.0), RiskTier::Critical);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
        assert!(RiskTier::High < RiskTier::Critical);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskTier::Critical).unwrap(), "\"critical\"");
        let tier: RiskTier = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(tier, RiskTier::Medium);
    }

    #[test]
    fn test_cme_validation() {
        let mut params = CmeParameters {
            start_time: Utc::now(),
            speed: 1200.0,
            direction_longitude: -30.0,
            direction_latitude: 45.0,
        };
        assert!(params.validate().is_ok());

        params.speed = 0.0;
        assert!(matches!(params.validate(), Err(ScoringError::InvalidCmeSpeed(_))));
        params.speed = f64::NAN;
        assert!(matches!(params.validate(), Err(ScoringError::InvalidCmeSpeed(_))));
        params.speed = 1200.0;

        params.direction_longitude = 181.0;
        assert!(matches!(
            params.validate(),
            Err(ScoringError::DirectionOutOfRange { axis: "longitude", .. })
        ));
        params.direction_longitude = -30.0;

        params.direction_latitude = -90.5;
        assert!(matches!(
            params.validate(),
            Err(ScoringError::DirectionOutOfRange { axis: "latitude", .. })
        ));
    }

    proptest! {
        #[test]
        fn classify_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(lo) <= classify(hi));
        }

        #[test]
        fn classify_is_total_over_the_unit_interval(s in 0.0f64..=1.0) {
            // Exercises every branch without panicking
            let _ = classify(s);
        }
    }
}
