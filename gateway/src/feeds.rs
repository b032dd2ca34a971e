//! Upstream feeds and background refresh
//!
//! Solar wind refreshes every minute, cable geometry every 12 hours.
//! A failed refresh keeps the previous snapshot; readers never observe
//! a partially-updated state.

use anyhow::{Context, Result};
use cable_atlas::{loader, Cable};
use tracing::{error, info};

use crate::AppState;

/// Public submarine-cable route registry (GeoJSON)
const CABLES_URL: &str =
    "https://raw.githubusercontent.com/opengeos/leafmap/master/examples/data/cable_geo.geojson";

/// Solar-wind refresh cadence (seconds)
const WIND_REFRESH_SEC: u64 = 60;
/// Cable-registry refresh cadence (seconds)
const CABLE_REFRESH_SEC: u64 = 12 * 3600;

pub async fn fetch_cables(client: &reqwest::Client) -> Result<Vec<Cable>> {
    let raw = client
        .get(CABLES_URL)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    loader::cables_from_geojson_str(&raw).context("cable feed returned unusable GeoJSON")
}

/// Spawn the refresh tasks. Both run for the life of the process.
pub fn start_background_refresh(state: AppState) {
    let wind_state = state.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(WIND_REFRESH_SEC));
        // First tick fires immediately; startup already fetched
        interval.tick().await;
        loop {
            interval.tick().await;
            let wind = wind_state.noaa.fetch_or_fallback().await;
            *wind_state.wind.write().await = wind;
        }
    });

    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(CABLE_REFRESH_SEC));
        interval.tick().await;
        loop {
            interval.tick().await;
            match fetch_cables(&state.http).await {
                Ok(cables) => {
                    info!("Refreshed cable registry: {} cables", cables.len());
                    *state.cables.write().await = cables;
                }
                Err(e) => error!("Cable refresh failed, keeping previous registry: {}", e),
            }
        }
    });
}
