//! Lasso polygon and point-in-polygon test

use serde::{Deserialize, Serialize};

use super::{BoundingBox, Sample};

/// Minimum number of vertices for a polygon that can enclose an area
pub const MIN_POLYGON_POINTS: usize = 3;

/// An open path traced by the lasso tool
///
/// The path is treated as closed (last vertex joined to the first) only for
/// containment tests and outline rendering, and only once it has at least
/// three vertices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Sample>,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(points: Vec<Sample>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, sample: Sample) {
        self.points.push(sample);
    }

    pub fn points(&self) -> &[Sample] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three vertices: no interior, zero-area or absent bounds
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < MIN_POLYGON_POINTS
    }

    /// Bounds over every vertex, recomputed on each call
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_samples(&self.points)
    }

    /// Vertices for drawing the outline, with the closing vertex appended
    /// once the path has at least three points
    pub fn outline(&self) -> Vec<(f64, f64)> {
        let mut outline: Vec<(f64, f64)> = self.points.iter().map(|p| (p.x, p.y)).collect();
        if !self.is_degenerate() {
            outline.push((self.points[0].x, self.points[0].y));
        }
        outline
    }

    /// Even-odd ray-casting containment test
    ///
    /// Casts a ray from the query point towards +x and toggles on every edge
    /// whose y-range straddles the query y with an intercept right of the
    /// query x. Horizontal edges never straddle. Points lying exactly on an
    /// edge have no defined classification. Degenerate polygons contain
    /// nothing.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if self.is_degenerate() {
            return false;
        }

        let mut inside = false;
        let mut prev = self.points.len() - 1;
        for (i, pi) in self.points.iter().enumerate() {
            let pj = &self.points[prev];
            if (pi.y > y) != (pj.y > y) {
                let intercept = (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x;
                if x < intercept {
                    inside = !inside;
                }
            }
            prev = i;
        }

        inside
    }

    /// True when any of the given samples lies inside the polygon
    pub fn contains_any(&self, samples: &[Sample]) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let Some(bounds) = self.bounding_box() else {
            return false;
        };
        samples.iter().any(|s| {
            s.x >= bounds.min_x
                && s.x <= bounds.max_x
                && s.y >= bounds.min_y
                && s.y <= bounds.max_y
                && self.contains(s.x, s.y)
        })
    }
}
