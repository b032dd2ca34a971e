//! Real-time scoring engine
//!
//! Converts the current solar-wind snapshot into one prediction per
//! cable. Two deliberate quirks of the reference heuristic are preserved:
//!
//! - Cable geometry is unused. The "current conditions" view applies one
//!   global solar-wind-derived score to every cable, differentiated only
//!   by per-cable jitter.
//! - Results keep the input cable order; only the simulation view sorts.

use crate::entropy::EntropySource;
use crate::{classify, Prediction};
use cable_atlas::Cable;
use chrono::{DateTime, Duration, Utc};
use solar_telemetry::SolarWind;
use tracing::debug;

/// Kp scale top; the kp factor saturates here
pub const KP_SATURATION: f64 = 9.0;
/// Southward-Bz reference scale (nT). Unsaturated: extreme Bz can push the
/// factor past 1, and the capped weighted sum absorbs it.
pub const BZ_REFERENCE_NT: f64 = 20.0;
/// Weight of geomagnetic activity (kp)
pub const W_KP: f64 = 0.6;
/// Weight of magnetospheric coupling (southward Bz)
pub const W_BZ: f64 = 0.3;
/// Upper bound of the uniform per-cable score jitter
pub const SCORE_JITTER_MAX: f64 = 0.2;
/// Scores above this get an estimated impact time
pub const IMPACT_TIME_THRESHOLD: f64 = 0.5;
/// Estimated impact falls within this many hours of "now"
pub const IMPACT_WINDOW_HOURS: f64 = 2.0;

/// Score every cable against the current solar wind.
///
/// `now` anchors the randomized impact-time estimates; production callers
/// pass `Utc::now()`.
pub fn score_cables<E: EntropySource>(
    wind: &SolarWind,
    cables: &[Cable],
    entropy: &mut E,
    now: DateTime<Utc>,
) -> Vec<Prediction> {
    let kp_factor = (wind.kp / KP_SATURATION).min(1.0);
    // Only southward (negative) Bz couples; northward contributes nothing
    let bz_factor = wind.bz.min(0.0).abs() / BZ_REFERENCE_NT;

    cables
        .iter()
        .map(|cable| {
            let jitter = entropy.unit() * SCORE_JITTER_MAX;
            let impact_score = (W_KP * kp_factor + W_BZ * bz_factor + jitter).min(1.0);
            let risk_level = classify(impact_score);

            let estimated_impact_time = if impact_score > IMPACT_TIME_THRESHOLD {
                let offset_ms = (entropy.unit() * IMPACT_WINDOW_HOURS * 3_600_000.0) as i64;
                Some(now + Duration::milliseconds(offset_ms))
            } else {
                None
            };

            debug!(
                "Scored {}: {:.3} ({:?})",
                cable.name, impact_score, risk_level
            );

            Prediction {
                cable_id: cable.id.clone(),
                cable_name: cable.name.clone(),
                impact_score,
                risk_level,
                estimated_impact_time,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedEntropy, RiskTier};
    use cable_atlas::GeoPoint;

    fn make_cable(id: &str) -> Cable {
        Cable {
            id: id.to_string(),
            name: format!("Cable {}", id),
            coordinates: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(10.0, 10.0)],
            owners: vec![],
            rfs: "2020".to_string(),
        }
    }

    fn make_wind(kp: f64, bz: f64) -> SolarWind {
        SolarWind {
            speed: 450.0,
            density: 6.0,
            bz,
            kp,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_quiet_conditions_score_zero_with_pinned_entropy() {
        let cables = vec![make_cable("a"), make_cable("b")];
        let wind = make_wind(0.0, 0.0);

        let predictions = score_cables(&wind, &cables, &mut FixedEntropy(0.0), Utc::now());
        assert_eq!(predictions.len(), 2);
        for p in &predictions {
            assert_eq!(p.impact_score, 0.0);
            assert_eq!(p.risk_level, RiskTier::Low);
            assert!(p.estimated_impact_time.is_none());
        }
    }

    #[test]
    fn test_severe_storm_scores_point_nine() {
        let cables = vec![make_cable("a")];
        let wind = make_wind(9.0, -20.0);
        let now = Utc::now();

        let predictions = score_cables(&wind, &cables, &mut FixedEntropy(0.0), now);
        let p = &predictions[0];
        assert!((p.impact_score - 0.9).abs() < 1e-12);
        assert_eq!(p.risk_level, RiskTier::Critical);
        // With entropy pinned to 0 the impact time is exactly "now"
        assert_eq!(p.estimated_impact_time, Some(now));
    }

    #[test]
    fn test_northward_bz_contributes_nothing() {
        let cables = vec![make_cable("a")];
        let southward = score_cables(
            &make_wind(3.0, -10.0),
            &cables,
            &mut FixedEntropy(0.0),
            Utc::now(),
        );
        let northward = score_cables(
            &make_wind(3.0, 10.0),
            &cables,
            &mut FixedEntropy(0.0),
            Utc::now(),
        );

        // kp contribution only: 0.6 * 3/9
        assert!((northward[0].impact_score - 0.2).abs() < 1e-12);
        assert!(southward[0].impact_score > northward[0].impact_score);
    }

    #[test]
    fn test_score_saturates_at_one() {
        let cables = vec![make_cable("a")];
        // Extreme southward Bz pushes the bz factor past 1; the sum caps
        let wind = make_wind(9.0, -60.0);

        let predictions = score_cables(&wind, &cables, &mut FixedEntropy(0.999), Utc::now());
        assert_eq!(predictions[0].impact_score, 1.0);
    }

    #[test]
    fn test_jitter_respects_upper_bound() {
        let cables = vec![make_cable("a")];
        let wind = make_wind(0.0, 0.0);

        let predictions = score_cables(&wind, &cables, &mut FixedEntropy(0.999), Utc::now());
        assert!(predictions[0].impact_score < SCORE_JITTER_MAX);
    }

    #[test]
    fn test_impact_time_inside_two_hour_window() {
        let cables = vec![make_cable("a")];
        let wind = make_wind(9.0, -20.0);
        let now = Utc::now();

        let predictions = score_cables(&wind, &cables, &mut FixedEntropy(0.999), now);
        let impact = predictions[0].estimated_impact_time.unwrap();
        assert!(impact >= now);
        assert!(impact < now + Duration::hours(2));
    }

    #[test]
    fn test_input_cable_order_is_preserved() {
        let cables = vec![make_cable("z"), make_cable("a"), make_cable("m")];
        let wind = make_wind(5.0, -5.0);

        let predictions = score_cables(&wind, &cables, &mut SystemEntropyForTest, Utc::now());
        let ids: Vec<&str> = predictions.iter().map(|p| p.cable_id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    // Deterministic varied source: 0.0, 0.1, 0.2, ...
    struct SystemEntropyForTest;
    impl EntropySource for SystemEntropyForTest {
        fn unit(&mut self) -> f64 {
            use std::cell::Cell;
            thread_local!(static N: Cell<u32> = const { Cell::new(0) });
            N.with(|n| {
                let v = n.get();
                n.set(v + 1);
                f64::from(v % 10) / 10.0
            })
        }
    }

    #[test]
    fn test_score_and_tier_agree() {
        let cables: Vec<Cable> = (0..20).map(|i| make_cable(&i.to_string())).collect();
        let wind = make_wind(6.0, -12.0);

        let predictions = score_cables(&wind, &cables, &mut SystemEntropyForTest, Utc::now());
        for p in predictions {
            assert_eq!(p.risk_level, classify(p.impact_score));
            assert!((0.0..=1.0).contains(&p.impact_score));
        }
    }
}
