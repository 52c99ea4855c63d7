//! Named polygonal boundaries

use geo::{Centroid, Intersects};
use geo_types::{Coord, LineString, Polygon};

use crate::core::config::FenceConfig;
use crate::core::error::{HerdError, Result};
use crate::core::types::GeoPoint;

const MIN_VERTICES: usize = 3;

/// A simple closed polygon over lat/lng vertices
///
/// Vertices are stored open (the first point is not repeated at the end);
/// a trailing copy of the first vertex is dropped on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFence {
    pub id: String,
    pub name: String,
    /// Display hint only
    pub color: String,
    vertices: Vec<GeoPoint>,
    polygon: Polygon<f64>,
}

impl GeoFence {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        vertices: Vec<GeoPoint>,
    ) -> Result<Self> {
        let id = id.into();
        let mut vertices = vertices;

        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(HerdError::invalid(format!(
                "fence '{}' has a non-finite vertex ({}, {})",
                id, bad.lat, bad.lng
            )));
        }
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < MIN_VERTICES {
            return Err(HerdError::invalid(format!(
                "fence '{}' needs at least {} vertices, got {}",
                id,
                MIN_VERTICES,
                vertices.len()
            )));
        }

        let polygon = to_polygon(&vertices);
        Ok(Self {
            id,
            name: name.into(),
            color: color.into(),
            vertices,
            polygon,
        })
    }

    /// Axis-aligned paddock given by its bounding latitudes and longitudes
    pub fn rectangle(
        id: &str,
        name: &str,
        color: &str,
        north: f64,
        south: f64,
        west: f64,
        east: f64,
    ) -> Self {
        let vertices = vec![
            GeoPoint::new(north, west),
            GeoPoint::new(north, east),
            GeoPoint::new(south, east),
            GeoPoint::new(south, west),
        ];
        let polygon = to_polygon(&vertices);
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            vertices,
            polygon,
        }
    }

    pub fn from_config(config: &FenceConfig) -> Result<Self> {
        Self::new(
            config.id.clone(),
            config.name.clone(),
            config.color.clone(),
            config.points.clone(),
        )
    }

    pub fn to_config(&self) -> FenceConfig {
        FenceConfig {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
            points: self.vertices.clone(),
        }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// True if `point` is inside the polygon or on its boundary
    pub fn contains(&self, point: GeoPoint) -> bool {
        if !point.is_finite() {
            return false;
        }
        self.polygon.intersects(&to_coord(point))
    }

    /// Area-weighted centroid; `None` for a zero-area polygon
    pub fn centroid(&self) -> Option<GeoPoint> {
        self.polygon.centroid().map(|p| GeoPoint::new(p.y(), p.x()))
    }
}

// geo works in (x, y) = (lng, lat)
fn to_coord(point: GeoPoint) -> Coord<f64> {
    Coord { x: point.lng, y: point.lat }
}

fn to_polygon(vertices: &[GeoPoint]) -> Polygon<f64> {
    let mut coords: Vec<Coord<f64>> = vertices.iter().map(|v| to_coord(*v)).collect();
    if let Some(first) = coords.first().cloned() {
        coords.push(first);
    }
    Polygon::new(LineString::from(coords), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> GeoFence {
        GeoFence::new(
            "sq",
            "Square",
            "#10b981",
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 1.0),
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(1.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_too_few_vertices() {
        let err = GeoFence::new("x", "X", "", vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)])
            .unwrap_err();
        assert!(matches!(err, HerdError::InvalidArgument(_)));
    }

    #[test]
    fn test_closing_vertex_does_not_count() {
        let closed_triangle = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(0.0, 0.0),
        ];
        assert!(GeoFence::new("t", "T", "", closed_triangle).is_err());
    }

    #[test]
    fn test_rejects_non_finite_vertex() {
        let verts = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(f64::INFINITY, 1.0),
            GeoPoint::new(1.0, 1.0),
        ];
        assert!(GeoFence::new("n", "N", "", verts).is_err());
    }

    #[test]
    fn test_interior_edge_and_vertex_are_inside() {
        let fence = square();
        assert!(fence.contains(GeoPoint::new(0.5, 0.5)));
        assert!(fence.contains(GeoPoint::new(0.0, 0.5)));
        assert!(fence.contains(GeoPoint::new(1.0, 1.0)));
        assert!(!fence.contains(GeoPoint::new(1.0001, 0.5)));
        assert!(!fence.contains(GeoPoint::new(f64::NAN, 0.5)));
    }

    #[test]
    fn test_concave_notch_is_outside() {
        // U shape opening to the north
        let fence = GeoFence::new(
            "u",
            "U",
            "",
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 3.0),
                GeoPoint::new(3.0, 3.0),
                GeoPoint::new(3.0, 2.0),
                GeoPoint::new(1.0, 2.0),
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(3.0, 1.0),
                GeoPoint::new(3.0, 0.0),
            ],
        )
        .unwrap();
        assert!(fence.contains(GeoPoint::new(2.0, 0.5)));
        assert!(fence.contains(GeoPoint::new(2.0, 2.5)));
        assert!(!fence.contains(GeoPoint::new(2.0, 1.5)));
    }

    #[test]
    fn test_centroid_of_square() {
        let c = square().centroid().unwrap();
        assert!((c.lat - 0.5).abs() < 1e-12);
        assert!((c.lng - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_config_round_trip_keeps_vertices() {
        let fence = square();
        let again = GeoFence::from_config(&fence.to_config()).unwrap();
        assert_eq!(again.vertices(), fence.vertices());
    }
}
