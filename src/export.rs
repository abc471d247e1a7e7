use crate::land::LandPoint;
use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Land dots as a GeoJSON FeatureCollection of Points, phase kept as a property
pub fn to_geojson(points: &[LandPoint]) -> GeoJson {
    let features = points
        .iter()
        .map(|p| {
            let mut properties = JsonObject::new();
            properties.insert("phase".to_string(), serde_json::json!(p.phase));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![p.lon, p.lat]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

pub fn write_geojson(path: &Path, points: &[LandPoint]) -> Result<()> {
    let body = to_geojson(points).to_string();
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), points = points.len(), "exported land points");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::land::lonlat_to_position;

    fn point(lon: f64, lat: f64) -> LandPoint {
        LandPoint { lon, lat, position: lonlat_to_position(lon, lat, 20.0), phase: 1.5 }
    }

    #[test]
    fn test_feature_per_point() {
        let points = [point(-10.0, 20.0), point(30.0, -40.0)];
        let GeoJson::FeatureCollection(fc) = to_geojson(&points) else {
            panic!("expected a feature collection");
        };
        assert_eq!(fc.features.len(), 2);

        let geometry = fc.features[1].geometry.as_ref().unwrap();
        assert_eq!(geometry.value, Value::Point(vec![30.0, -40.0]));
        let phase = fc.features[1].property("phase").and_then(|v| v.as_f64());
        assert_eq!(phase, Some(1.5));
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let text = to_geojson(&[]).to_string();
        let parsed: GeoJson = text.parse().unwrap();
        assert!(matches!(parsed, GeoJson::FeatureCollection(fc) if fc.features.is_empty()));
    }
}
