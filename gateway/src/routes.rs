//! Dashboard API handlers
//!
//! Every response is JSON. Scoring endpoints read the shared snapshots;
//! they never touch the upstream feeds directly, so a feed outage only
//! ever means stale data, not failed requests.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::AppState;
use cable_atlas::Cable;
use impact_advisor::{fallback_report, AdvisorReport};
use impact_scoring::{
    run_simulation, score_cables, subsolar_point, CmeParameters, Prediction, SimulationOutcome,
    SubsolarPoint, SystemEntropy,
};
use solar_telemetry::SolarWind;
use tracing::warn;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Advisor request body; the CME context is optional.
#[derive(Deserialize, Default)]
pub struct AdvisorRequestBody {
    pub cme: Option<CmeParameters>,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "solarwatch-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Latest solar-wind snapshot (NOAA or synthetic fallback).
pub async fn current_solar_wind(State(state): State<AppState>) -> Json<SolarWind> {
    Json(state.wind.read().await.clone())
}

/// The full cable registry, geometry included.
pub async fn list_cables(State(state): State<AppState>) -> Json<Vec<Cable>> {
    Json(state.cables.read().await.clone())
}

/// Score every cable against current conditions.
pub async fn realtime_predictions(State(state): State<AppState>) -> Json<Vec<Prediction>> {
    let wind = state.wind.read().await.clone();
    let cables = state.cables.read().await;

    Json(score_cables(&wind, &cables, &mut SystemEntropy, Utc::now()))
}

/// Run a what-if CME simulation over the cable registry.
pub async fn simulate_cme(
    State(state): State<AppState>,
    Json(params): Json<CmeParameters>,
) -> Result<Json<SimulationOutcome>, (StatusCode, Json<ErrorResponse>)> {
    let cables = state.cables.read().await;

    match run_simulation(&params, &cables) {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// The current subsolar point, for the globe's day/night shading.
pub async fn current_subsolar_point() -> Json<SubsolarPoint> {
    Json(subsolar_point(Utc::now()))
}

/// Impact-zone report from the external advisor, or the built-in
/// fallback when it is unconfigured or unavailable. Never fails.
pub async fn advisor_report(
    State(state): State<AppState>,
    body: Option<Json<AdvisorRequestBody>>,
) -> Json<AdvisorReport> {
    let cme = body.and_then(|Json(b)| b.cme);
    let wind = state.wind.read().await.clone();
    let cables = state.cables.read().await.clone();

    if let Some(advisor) = &state.advisor {
        match advisor.predict(&wind, &cables, cme.as_ref()).await {
            Ok(report) => return Json(report),
            Err(e) => warn!("Advisor unavailable, substituting fallback report: {}", e),
        }
    }

    Json(fallback_report(&wind, &cables))
}
