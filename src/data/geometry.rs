//! World Geometry Module
//! Country outlines read from a GeoJSON FeatureCollection, keyed by ISO-3 code.

use serde_json::Value as JsonValue;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Failed to read geometry file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid GeoJSON: {0}")]
    Format(String),
}

/// One polygon: exterior ring followed by optional holes, as `[lon, lat]` pairs.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub exterior: Vec<[f64; 2]>,
    pub holes: Vec<Vec<[f64; 2]>>,
}

impl Polygon {
    fn contains(&self, lon: f64, lat: f64) -> bool {
        ring_contains(&self.exterior, lon, lat)
            && !self.holes.iter().any(|h| ring_contains(h, lon, lat))
    }
}

/// Outline of one country or territory.
#[derive(Debug, Clone)]
pub struct CountryShape {
    pub code: String,
    pub polygons: Vec<Polygon>,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    bbox: [f64; 4],
}

impl CountryShape {
    fn new(code: String, polygons: Vec<Polygon>) -> Self {
        let mut bbox = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];
        for [lon, lat] in polygons.iter().flat_map(|p| p.exterior.iter()) {
            bbox[0] = bbox[0].min(*lon);
            bbox[1] = bbox[1].min(*lat);
            bbox[2] = bbox[2].max(*lon);
            bbox[3] = bbox[3].max(*lat);
        }
        Self {
            code,
            polygons,
            bbox,
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lon < self.bbox[0] || lon > self.bbox[2] || lat < self.bbox[1] || lat > self.bbox[3] {
            return false;
        }
        self.polygons.iter().any(|p| p.contains(lon, lat))
    }
}

/// All country outlines, in file order.
#[derive(Debug, Clone, Default)]
pub struct WorldGeometry {
    pub shapes: Vec<CountryShape>,
}

impl WorldGeometry {
    /// Load a GeoJSON file. `code_property` names the ISO-3 property of each feature.
    pub fn load(path: &Path, code_property: &str) -> Result<Self, GeometryError> {
        let text = std::fs::read_to_string(path)?;
        let geometry = Self::from_geojson_str(&text, code_property)?;
        log::info!(
            "Loaded {} country outlines from {}",
            geometry.shapes.len(),
            path.display()
        );
        Ok(geometry)
    }

    pub fn from_geojson_str(text: &str, code_property: &str) -> Result<Self, GeometryError> {
        let root: JsonValue = serde_json::from_str(text)?;
        let features = root
            .get("features")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| GeometryError::Format("expected a FeatureCollection".to_string()))?;

        let mut shapes = Vec::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            let Some(code) = feature_code(feature, code_property) else {
                log::debug!("Feature {} has no country code, skipped", i);
                continue;
            };
            let geometry = feature
                .get("geometry")
                .ok_or_else(|| GeometryError::Format(format!("feature {i} has no geometry")))?;
            let polygons = parse_geometry(geometry)
                .map_err(|e| GeometryError::Format(format!("feature {i} ({code}): {e}")))?;
            shapes.push(CountryShape::new(code, polygons));
        }

        Ok(Self { shapes })
    }

    /// The shape under a point, if any.
    pub fn shape_at(&self, lon: f64, lat: f64) -> Option<&CountryShape> {
        self.shapes.iter().find(|s| s.contains(lon, lat))
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

fn feature_code(feature: &JsonValue, code_property: &str) -> Option<String> {
    // Natural Earth marks unassigned codes as "-99"
    let valid = |code: &&str| !code.is_empty() && *code != "-99";

    feature
        .get("properties")
        .and_then(|p| p.get(code_property))
        .and_then(JsonValue::as_str)
        .filter(valid)
        .or_else(|| feature.get("id").and_then(JsonValue::as_str).filter(valid))
        .map(str::to_string)
}

fn parse_geometry(geometry: &JsonValue) -> Result<Vec<Polygon>, String> {
    let kind = geometry
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or("missing geometry type")?;
    let coords = geometry.get("coordinates").ok_or("missing coordinates")?;

    match kind {
        "Polygon" => Ok(vec![parse_polygon(coords)?]),
        "MultiPolygon" => coords
            .as_array()
            .ok_or("MultiPolygon coordinates must be an array")?
            .iter()
            .map(parse_polygon)
            .collect(),
        other => Err(format!("unsupported geometry type {other}")),
    }
}

fn parse_polygon(coords: &JsonValue) -> Result<Polygon, String> {
    let mut rings = coords
        .as_array()
        .ok_or("polygon coordinates must be an array")?
        .iter()
        .map(parse_ring);

    let exterior = rings.next().ok_or("polygon has no rings")??;
    let holes = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon { exterior, holes })
}

fn parse_ring(ring: &JsonValue) -> Result<Vec<[f64; 2]>, String> {
    ring.as_array()
        .ok_or("ring must be an array")?
        .iter()
        .map(|pos| {
            let lon = pos.get(0).and_then(JsonValue::as_f64);
            let lat = pos.get(1).and_then(JsonValue::as_f64);
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok([lon, lat]),
                _ => Err("position must be [lon, lat]".to_string()),
            }
        })
        .collect()
}

/// Even-odd ray casting.
fn ring_contains(ring: &[[f64; 2]], lon: f64, lat: f64) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ISO_A3": "AAA", "NAME": "Squareland" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                        [[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]
                    ]
                }
            },
            {
                "type": "Feature",
                "id": "BBB",
                "properties": { "ISO_A3": "-99" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[20, 0], [30, 0], [30, 10], [20, 0]]],
                        [[[40, 40], [50, 40], [50, 50], [40, 50], [40, 40]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let world = WorldGeometry::from_geojson_str(SAMPLE, "ISO_A3").unwrap();
        assert_eq!(world.shapes.len(), 2);
        assert_eq!(world.shapes[0].code, "AAA");
        assert_eq!(world.shapes[0].polygons[0].holes.len(), 1);
        assert_eq!(world.shapes[1].code, "BBB");
        assert_eq!(world.shapes[1].polygons.len(), 2);
    }

    #[test]
    fn shape_at_respects_holes() {
        let world = WorldGeometry::from_geojson_str(SAMPLE, "ISO_A3").unwrap();

        assert_eq!(world.shape_at(2.0, 2.0).map(|s| s.code.as_str()), Some("AAA"));
        assert!(world.shape_at(5.0, 5.0).is_none());
        assert_eq!(world.shape_at(45.0, 45.0).map(|s| s.code.as_str()), Some("BBB"));
        assert!(world.shape_at(-120.0, 35.0).is_none());
    }

    #[test]
    fn rejects_non_collections() {
        let err = WorldGeometry::from_geojson_str(r#"{"type": "Feature"}"#, "ISO_A3").unwrap_err();
        assert!(matches!(err, GeometryError::Format(_)));
    }

    #[test]
    fn rejects_unsupported_geometry() {
        let text = r#"{"features": [{"id": "CCC", "geometry": {"type": "Point", "coordinates": [1, 2]}}]}"#;
        let err = WorldGeometry::from_geojson_str(text, "ISO_A3").unwrap_err();
        assert!(err.to_string().contains("CCC"));
    }
}
