//! Cable loading from GeoJSON
//!
//! Parses the public submarine-cable FeatureCollection (LineString or
//! MultiLineString routes). Features with unusable geometry are skipped
//! and counted rather than failing the whole load.

use crate::{Cable, CableError, GeoPoint, Result};
use geojson::{GeoJson, Value};
use std::path::Path;
use tracing::info;

/// Validate latitude is in valid range
fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

fn prop_string(props: &geojson::JsonObject, key: &str) -> Option<String> {
    props.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

fn prop_owners(props: &geojson::JsonObject) -> Vec<String> {
    match props.get("owners") {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        Some(serde_json::Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Parse cables from a GeoJSON FeatureCollection string.
pub fn cables_from_geojson_str(raw: &str) -> Result<Vec<Cable>> {
    let geojson: GeoJson = raw
        .parse()
        .map_err(|e: geojson::Error| CableError::BadGeometry(e.to_string()))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(CableError::BadGeometry(
                "expected a FeatureCollection".to_string(),
            ))
        }
    };

    let mut cables = Vec::new();
    let mut skipped = 0;

    for (i, feature) in collection.features.into_iter().enumerate() {
        let line = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::LineString(line)) => line.clone(),
            // Upstream feed represents a few routes as MultiLineString;
            // the first segment carries the cable's main run.
            Some(Value::MultiLineString(lines)) => match lines.first() {
                Some(l) => l.clone(),
                None => {
                    skipped += 1;
                    continue;
                }
            },
            _ => {
                skipped += 1;
                continue;
            }
        };

        let coordinates: Vec<GeoPoint> = line
            .iter()
            .filter_map(|pos| match pos.as_slice() {
                [lon, lat, ..] if is_valid_longitude(*lon) && is_valid_latitude(*lat) => {
                    Some(GeoPoint::new(*lon, *lat))
                }
                _ => None,
            })
            .collect();

        if coordinates.is_empty() {
            skipped += 1;
            continue;
        }

        let props = feature.properties.unwrap_or_default();
        let id = prop_string(&props, "id").unwrap_or_else(|| format!("cable-{}", i));
        let name = prop_string(&props, "name").unwrap_or_else(|| format!("Cable {}", i + 1));
        let owners = prop_owners(&props);
        let rfs = prop_string(&props, "rfs").unwrap_or_else(|| "Unknown".to_string());

        cables.push(Cable {
            id,
            name,
            coordinates,
            owners,
            rfs,
        });
    }

    info!(
        "Loaded {} cables ({} features skipped for unusable geometry)",
        cables.len(),
        skipped
    );

    Ok(cables)
}

/// Load cables from a GeoJSON file on disk.
pub fn load_cables_from_file(path: impl AsRef<Path>) -> Result<Vec<Cable>> {
    let path = path.as_ref();
    info!("Loading cables from {:?}", path);
    let raw = std::fs::read_to_string(path)?;
    cables_from_geojson_str(&raw)
}
