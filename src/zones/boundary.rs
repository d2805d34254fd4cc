//! Zone boundary extraction from GeoJSON.

use geo::{Area, BoundingRect, MultiPolygon};
use geojson::{Feature, GeoJson};
use serde_json::Value;
use tracing::{debug, info};

use super::ZoneError;

/// Property holding the zone identifier on each feature
pub const ZONE_ID_PROPERTY: &str = "ID";

/// A single zone polygon with its identifier
#[derive(Debug, Clone)]
pub struct ZoneBoundary {
    pub id: String,
    pub geometry: MultiPolygon<f64>,
}

impl ZoneBoundary {
    pub fn new(id: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }

    /// Get the bounding box of this zone
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Planar area in squared coordinate units, regardless of ring winding
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}

/// Parse a GeoJSON document into zone boundaries, in feature order.
pub fn parse_zone_boundaries(geojson_str: &str) -> Result<Vec<ZoneBoundary>, ZoneError> {
    let geojson: GeoJson = geojson_str
        .parse()
        .map_err(|e: geojson::Error| ZoneError::MalformedBoundary(e.to_string()))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(ZoneError::MalformedBoundary(
                "expected a FeatureCollection".to_string(),
            ))
        }
    };

    let boundaries = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| feature_to_boundary(i, feature))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Parsed {} zone boundaries", boundaries.len());

    Ok(boundaries)
}

fn feature_to_boundary(index: usize, feature: Feature) -> Result<ZoneBoundary, ZoneError> {
    let id = match feature.property(ZONE_ID_PROPERTY) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(ZoneError::MalformedBoundary(format!(
                "feature {index}: unsupported {ZONE_ID_PROPERTY} value {other}"
            )))
        }
        None => {
            return Err(ZoneError::MalformedBoundary(format!(
                "feature {index}: missing properties.{ZONE_ID_PROPERTY}"
            )))
        }
    };

    let geometry = feature.geometry.ok_or_else(|| {
        ZoneError::MalformedBoundary(format!("feature {index} (zone {id}): missing geometry"))
    })?;

    let geometry: geo::Geometry<f64> = geometry.try_into().map_err(|e: geojson::Error| {
        ZoneError::MalformedBoundary(format!("feature {index} (zone {id}): {e}"))
    })?;

    let geometry = match geometry {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
        _ => {
            return Err(ZoneError::MalformedBoundary(format!(
                "feature {index} (zone {id}): geometry is not a Polygon or MultiPolygon"
            )))
        }
    };

    debug!("Zone {} has {} polygon(s)", id, geometry.0.len());

    Ok(ZoneBoundary { id, geometry })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{"type": "Polygon", "coordinates": [[[-97.2, 30.0], [-97.0, 30.0], [-97.0, 30.2], [-97.2, 30.2], [-97.2, 30.0]]]}"#;

    fn collection(features: &[String]) -> String {
        format!(
            r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
            features.join(",")
        )
    }

    #[test]
    fn test_parse_string_and_numeric_ids() {
        let doc = collection(&[
            format!(r#"{{"type": "Feature", "properties": {{"ID": "Z1"}}, "geometry": {SQUARE}}}"#),
            format!(r#"{{"type": "Feature", "properties": {{"ID": 50}}, "geometry": {SQUARE}}}"#),
        ]);
        let zones = parse_zone_boundaries(&doc).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].id, "Z1");
        assert_eq!(zones[1].id, "50");
        assert!((zones[0].area() - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_parse_multipolygon() {
        let doc = collection(&[String::from(
            r#"{"type": "Feature", "properties": {"ID": "M"}, "geometry": {"type": "MultiPolygon", "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]], [[[2, 2], [3, 2], [3, 3], [2, 2]]]]}}"#,
        )]);
        let zones = parse_zone_boundaries(&doc).unwrap();
        assert_eq!(zones[0].geometry.0.len(), 2);
        assert_eq!(zones[0].bbox(), Some((0.0, 0.0, 3.0, 3.0)));
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = parse_zone_boundaries(SQUARE).unwrap_err();
        assert!(matches!(err, ZoneError::MalformedBoundary(_)));
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(parse_zone_boundaries("{not json").is_err());
    }

    #[test]
    fn test_rejects_missing_id() {
        let doc = collection(&[format!(
            r#"{{"type": "Feature", "properties": {{"NAME": "x"}}, "geometry": {SQUARE}}}"#
        )]);
        let err = parse_zone_boundaries(&doc).unwrap_err();
        assert!(err.to_string().contains("missing properties.ID"));
    }

    #[test]
    fn test_rejects_missing_geometry() {
        let doc = collection(&[String::from(
            r#"{"type": "Feature", "properties": {"ID": "Z1"}, "geometry": null}"#,
        )]);
        let err = parse_zone_boundaries(&doc).unwrap_err();
        assert!(err.to_string().contains("missing geometry"));
    }

    #[test]
    fn test_rejects_point_geometry() {
        let doc = collection(&[String::from(
            r#"{"type": "Feature", "properties": {"ID": "P"}, "geometry": {"type": "Point", "coordinates": [1, 2]}}"#,
        )]);
        assert!(parse_zone_boundaries(&doc).is_err());
    }
}
