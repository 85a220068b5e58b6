//! Published lasso selection and its generation tag

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{BoundingBox, Polygon};

/// Monotonic counter identifying a selection epoch
///
/// The canvas advances it whenever the selection is replaced or cleared, so
/// a recognition result tagged with an older value belongs to a region that
/// is no longer selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The region selected by the most recent completed lasso gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    generation: Generation,
    bounds: BoundingBox,
    polygon: Polygon,
}

impl Selection {
    pub fn new(generation: Generation, bounds: BoundingBox, polygon: Polygon) -> Self {
        Self {
            generation,
            bounds,
            polygon,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The selected area in canvas coordinates
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// The lasso path that produced this selection
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.polygon.contains(x, y)
    }
}
