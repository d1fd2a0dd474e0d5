use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Geographic rectangle that maps linearly onto the full pixel extent of a mask.
///
/// Callers are expected to pass `north > south` and `east > west`. The ordering
/// is not checked: swapped edges produce a mirrored polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Map a pixel position of a `width x height` raster to a geographic point.
    ///
    /// Column 0 is `west`, column `width - 1` is `east`; row 0 is `north`,
    /// row `height - 1` is `south`. A raster that is one pixel wide (or tall)
    /// maps that axis onto its west (or north) edge.
    pub fn project(&self, x: u32, y: u32, width: u32, height: u32) -> GeoPoint {
        let fx = axis_fraction(x, width);
        let fy = axis_fraction(y, height);
        GeoPoint {
            lat: lerp(self.north, self.south, fy),
            lon: lerp(self.west, self.east, fx),
        }
    }

    /// Whether the point lies inside the rectangle, edges included.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lon)
    }
}

fn axis_fraction(index: u32, extent: u32) -> f64 {
    if extent <= 1 {
        0.0
    } else {
        f64::from(index) / f64::from(extent - 1)
    }
}

// Exact at both ends: t == 0 yields `from`, t == 1 yields `to`.
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    (1.0 - t) * from + t * to
}

/// A single `(lat, lon)` vertex. Serializes as a `[lat, lon]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", from = "[f64; 2]")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lat, point.lon]
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

/// Closed ring of geographic vertices, or empty when nothing was detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoPolygon {
    points: Vec<GeoPoint>,
}

impl GeoPolygon {
    /// Build a ring from vertices, appending the first vertex when the ring is open.
    ///
    /// A lone vertex counts as open, so it comes back as a two-point ring.
    pub fn closed(mut points: Vec<GeoPoint>) -> Self {
        let open = match points.as_slice() {
            [only] => Some(*only),
            [first, .., last] => (first != last).then_some(*first),
            [] => None,
        };
        if let Some(first) = open {
            points.push(first);
        }
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True for non-empty rings whose first and last vertices are identical.
    pub fn is_closed(&self) -> bool {
        matches!((self.points.first(), self.points.last()), (Some(a), Some(b)) if a == b)
    }

    /// Vertices as `[lat, lon]` pairs, the layout map overlays consume.
    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|&p| p.into()).collect()
    }

    /// GeoJSON `Polygon` geometry. Positions use GeoJSON's `[lon, lat]` order.
    pub fn to_geojson(&self) -> Value {
        let ring: Vec<[f64; 2]> = self.points.iter().map(|p| [p.lon, p.lat]).collect();
        let coordinates = if ring.is_empty() { vec![] } else { vec![ring] };
        json!({
            "type": "Polygon",
            "coordinates": coordinates,
        })
    }
}
