//! Impact Advisor Library
//!
//! Contract for the optional external AI impact-zone predictor: an opaque
//! request/response collaborator that enriches the dashboard with auroral
//! impact-zone overlays and narrative cable-risk reasons.
//!
//! The advisor is decorative, never load-bearing: callers catch every
//! error and substitute [`fallback_report`], a deterministic
//! physics-flavored approximation built from the same Kp/Bz factors the
//! scoring core uses. Nothing here may block or fail the core scoring
//! path.

use cable_atlas::Cable;
use chrono::{DateTime, Utc};
use impact_scoring::{classify, CmeParameters, RiskTier};
use serde::{Deserialize, Serialize};
use solar_telemetry::SolarWind;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Advisor request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Advisor returned an unusable payload: {0}")]
    BadResponse(String),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Quiet-time auroral oval edge (degrees latitude)
const AURORAL_BASE_LAT: f64 = 60.0;
/// Equatorward expansion of the oval at kp 9 (degrees)
const AURORAL_EXPANSION_DEG: f64 = 20.0;
/// Impact-zone overlay radius (km)
const ZONE_RADIUS_KM: f64 = 1500.0;
/// The fallback reports at most this many cable risks
const TOP_CABLE_RISKS: usize = 20;
/// Fixed confidence attached to fallback reports
pub const FALLBACK_CONFIDENCE: f64 = 0.75;

// ---- Wire contract (field names fixed by the external service) ----

/// Cable digest sent to the advisor: the service reasons about midpoints,
/// not full polylines.
#[derive(Debug, Clone, Serialize)]
pub struct CableSummary {
    pub id: String,
    pub name: String,
    pub midpoint: Midpoint,
}

#[derive(Debug, Clone, Serialize)]
pub struct Midpoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CmeSummary {
    pub speed: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub arrival_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorRequest {
    pub solar_data: SolarWind,
    pub cables: Vec<CableSummary>,
    pub cme_data: Option<CmeSummary>,
}

impl AdvisorRequest {
    /// Digest the in-memory state into the advisor's wire shape. Cables
    /// with empty geometry are silently omitted; they cannot be placed.
    pub fn assemble(wind: &SolarWind, cables: &[Cable], cme: Option<&CmeParameters>) -> Self {
        let cables = cables
            .iter()
            .filter_map(|cable| {
                let mid = cable.midpoint().ok()?;
                Some(CableSummary {
                    id: cable.id.clone(),
                    name: cable.name.clone(),
                    midpoint: Midpoint {
                        lat: mid.lat,
                        lng: mid.lon,
                    },
                })
            })
            .collect();

        Self {
            solar_data: wind.clone(),
            cables,
            cme_data: cme.map(|p| CmeSummary {
                speed: p.speed,
                longitude: p.direction_longitude,
                latitude: p.direction_latitude,
                arrival_time: p.start_time,
            }),
        }
    }
}

/// A geographic region the advisor expects geomagnetic impact in; drives
/// ring overlays on the globe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactZone {
    pub lat: f64,
    pub lng: f64,
    pub severity: RiskTier,
    /// Overlay radius in km
    pub radius: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableRisk {
    pub cable_id: String,
    pub cable_name: String,
    pub risk_score: f64,
    pub risk_level: RiskTier,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StormAnalysis {
    pub auroral_zone_extent: String,
    pub primary_impact_region: String,
    pub estimated_storm_duration_hours: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorReport {
    pub impact_zones: Vec<ImpactZone>,
    pub cable_risks: Vec<CableRisk>,
    pub analysis: StormAnalysis,
}

// ---- Client ----

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub endpoint: String,
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_sec: u64,
}

impl AdvisorConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout_sec: 30,
        }
    }
}

/// HTTP client for the external predictor.
pub struct AdvisorClient {
    config: AdvisorConfig,
    client: reqwest::Client,
}

impl AdvisorClient {
    pub fn new(config: AdvisorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Ask the external service for a report.
    ///
    /// Errors are expected and recoverable; callers substitute
    /// [`fallback_report`].
    pub async fn predict(
        &self,
        wind: &SolarWind,
        cables: &[Cable],
        cme: Option<&CmeParameters>,
    ) -> Result<AdvisorReport> {
        let request = AdvisorRequest::assemble(wind, cables, cme);
        debug!(
            "Requesting advisor report for {} cables (cme: {})",
            request.cables.len(),
            request.cme_data.is_some()
        );

        let value: serde_json::Value = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        serde_json::from_value(value).map_err(|e| AdvisorError::BadResponse(e.to_string()))
    }
}

// ---- Physics-flavored fallback ----

/// Deterministic stand-in report when the external advisor is down or
/// unconfigured: auroral-zone overlays from Kp expansion and
/// latitude-weighted cable risks.
pub fn fallback_report(wind: &SolarWind, cables: &[Cable]) -> AdvisorReport {
    let kp_factor = wind.kp / 9.0;
    let bz_factor = wind.bz.min(0.0).abs() / 20.0;

    // The oval expands equatorward as activity rises
    let auroral_latitude = AURORAL_BASE_LAT + kp_factor * AURORAL_EXPANSION_DEG;

    let band_severity = if kp_factor > 0.7 {
        RiskTier::Critical
    } else if kp_factor > 0.5 {
        RiskTier::High
    } else {
        RiskTier::Medium
    };
    let southern_severity = if kp_factor > 0.6 {
        RiskTier::High
    } else {
        RiskTier::Medium
    };

    let impact_zones = vec![
        ImpactZone {
            lat: auroral_latitude,
            lng: -100.0,
            severity: band_severity,
            radius: ZONE_RADIUS_KM,
            description: "North American auroral zone".to_string(),
        },
        ImpactZone {
            lat: auroral_latitude,
            lng: 60.0,
            severity: band_severity,
            radius: ZONE_RADIUS_KM,
            description: "European auroral zone".to_string(),
        },
        ImpactZone {
            lat: -auroral_latitude,
            lng: 140.0,
            severity: southern_severity,
            radius: ZONE_RADIUS_KM,
            description: "Southern auroral zone".to_string(),
        },
    ];

    let mut cable_risks: Vec<CableRisk> = cables
        .iter()
        .filter_map(|cable| {
            let mid = cable.midpoint().ok()?;
            let lat = mid.lat.abs();

            // Higher latitude means closer to the oval during storms
            let lat_risk = (lat / 90.0).min(1.0);
            let storm_risk = kp_factor * 0.6 + bz_factor * 0.4;
            let risk_score = (lat_risk * 0.5 + storm_risk * 0.5).min(1.0);

            let reason = format!(
                "Located at {:.1}° latitude. {}",
                lat,
                if risk_score > 0.5 {
                    "High geomagnetic activity expected."
                } else {
                    "Moderate conditions."
                }
            );

            Some(CableRisk {
                cable_id: cable.id.clone(),
                cable_name: cable.name.clone(),
                risk_score,
                risk_level: classify(risk_score),
                reason,
            })
        })
        .collect();

    cable_risks.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    cable_risks.truncate(TOP_CABLE_RISKS);

    AdvisorReport {
        impact_zones,
        cable_risks,
        analysis: StormAnalysis {
            auroral_zone_extent: format!("Expanded to {:.1}° latitude", auroral_latitude),
            primary_impact_region: "High-latitude regions".to_string(),
            estimated_storm_duration_hours: (6.0 + kp_factor * 12.0).round(),
            confidence: FALLBACK_CONFIDENCE,
        },
    }
}
