//! NOAA SWPC feed client
//!
//! Pulls the three product summaries the dashboard relies on:
//! - solar-wind-mag-field (Bz, timestamp)
//! - solar-wind-speed (speed, density)
//! - planetary K-index (latest kp)
//!
//! Product values arrive as strings and are parsed leniently with
//! per-field defaults, so a partially degraded product still yields a
//! usable snapshot. A hard feed failure is absorbed by
//! [`NoaaClient::fetch_or_fallback`] which substitutes synthetic quiet
//! conditions rather than propagating the error into scoring.

use crate::{FeedError, Result, SolarWind};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

const MAG_FIELD_URL: &str =
    "https://services.swpc.noaa.gov/products/summary/solar-wind-mag-field.json";
const WIND_SPEED_URL: &str =
    "https://services.swpc.noaa.gov/products/summary/solar-wind-speed.json";
const KP_INDEX_URL: &str = "https://services.swpc.noaa.gov/products/noaa-planetary-k-index.json";

/// Feed client configuration
#[derive(Debug, Clone)]
pub struct NoaaConfig {
    /// Request timeout in seconds
    pub timeout_sec: u64,
}

impl Default for NoaaConfig {
    fn default() -> Self {
        Self { timeout_sec: 10 }
    }
}

/// NOAA SWPC client (free, no API key)
pub struct NoaaClient {
    client: reqwest::Client,
}

impl NoaaClient {
    pub fn new() -> Self {
        Self::with_config(NoaaConfig::default())
    }

    pub fn with_config(config: NoaaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the current solar-wind snapshot from the three SWPC products.
    pub async fn fetch_current(&self) -> Result<SolarWind> {
        let (mag, speed, kp) = tokio::try_join!(
            self.fetch_json(MAG_FIELD_URL),
            self.fetch_json(WIND_SPEED_URL),
            self.fetch_json(KP_INDEX_URL),
        )?;

        let wind = parse_feed(&mag, &speed, &kp)?;
        debug!(
            "SWPC snapshot: speed={:.0} km/s, bz={:.1} nT, kp={:.1}",
            wind.speed, wind.bz, wind.kp
        );
        Ok(wind)
    }

    /// Never fails: substitutes synthetic quiet conditions on any feed
    /// error, so callers always hold a well-formed snapshot.
    pub async fn fetch_or_fallback(&self) -> SolarWind {
        match self.fetch_current().await {
            Ok(wind) => wind,
            Err(e) => {
                warn!("Solar-wind feed unavailable, substituting synthetic conditions: {}", e);
                SolarWind::synthetic(&mut rand::thread_rng())
            }
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }
}

impl Default for NoaaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// NOAA product numbers arrive as strings; parse either representation.
fn lenient_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Kp rows appear either as objects (`{"kp_index": ...}`) or as
/// `[time_tag, kp, ...]` arrays depending on the product revision.
fn kp_from_row(row: &Value) -> Option<f64> {
    match row {
        Value::Object(_) => lenient_f64(row.get("kp_index")),
        Value::Array(cols) => lenient_f64(cols.get(1)),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    // Summary products use "YYYY-MM-DD HH:MM:SS.fff"
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|n| n.and_utc())
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).map(|d| d.with_timezone(&Utc)).ok())
}

/// Assemble a snapshot from the three raw products.
pub(crate) fn parse_feed(mag: &Value, speed: &Value, kp: &Value) -> Result<SolarWind> {
    if !mag.is_object() || !speed.is_object() {
        return Err(FeedError::Malformed(
            "summary product is not a JSON object".to_string(),
        ));
    }
    let kp_rows = kp
        .as_array()
        .ok_or_else(|| FeedError::Malformed("K-index product is not an array".to_string()))?;

    Ok(SolarWind {
        speed: lenient_f64(speed.get("WindSpeed")).unwrap_or(400.0),
        density: lenient_f64(speed.get("Density")).unwrap_or(5.0),
        bz: lenient_f64(mag.get("Bz")).unwrap_or(0.0),
        kp: kp_rows.last().and_then(kp_from_row).unwrap_or(2.0),
        timestamp: mag
            .get("TimeStamp")
            .and_then(|v| v.as_str())
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    #[test]
    fn test_parse_feed_stringly_numbers() {
        let mag = json!({"TimeStamp": "2026-03-14 06:30:00.000", "Bt": "9.41", "Bz": "-6.20"});
        let speed = json!({"WindSpeed": "534.1", "Density": "7.3"});
        let kp = json!([{"time_tag": "2026-03-14T06:00:00", "kp_index": "5.33"}]);

        let wind = parse_feed(&mag, &speed, &kp).unwrap();
        assert!((wind.speed - 534.1).abs() < 1e-9);
        assert!((wind.density - 7.3).abs() < 1e-9);
        assert!((wind.bz + 6.2).abs() < 1e-9);
        assert!((wind.kp - 5.33).abs() < 1e-9);
        assert_eq!(wind.timestamp.hour(), 6);
    }

    #[test]
    fn test_parse_feed_array_style_kp_rows() {
        let mag = json!({"TimeStamp": "2026-03-14 06:30:00.000", "Bz": "1.0"});
        let speed = json!({"WindSpeed": "410"});
        let kp = json!([
            ["time_tag", "Kp", "a_running", "station_count"],
            ["2026-03-14 03:00:00", "2.67", "12", "8"],
            ["2026-03-14 06:00:00", "4.00", "27", "8"]
        ]);

        let wind = parse_feed(&mag, &speed, &kp).unwrap();
        assert!((wind.kp - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_feed_missing_fields_use_defaults() {
        let mag = json!({});
        let speed = json!({});
        let kp = json!([]);

        let wind = parse_feed(&mag, &speed, &kp).unwrap();
        assert_eq!(wind.speed, 400.0);
        assert_eq!(wind.density, 5.0);
        assert_eq!(wind.bz, 0.0);
        assert_eq!(wind.kp, 2.0);
    }

    #[test]
    fn test_parse_feed_rejects_wrong_container_shape() {
        let bad = json!("not an object");
        let speed = json!({"WindSpeed": "400"});
        let kp = json!([]);

        assert!(matches!(
            parse_feed(&bad, &speed, &kp),
            Err(FeedError::Malformed(_))
        ));
        assert!(matches!(
            parse_feed(&speed, &speed, &json!({})),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2026-03-14 06:30:00.000").is_some());
        assert!(parse_timestamp("2026-03-14T06:30:00Z").is_some());
        assert!(parse_timestamp("last tuesday").is_none());
    }
}
