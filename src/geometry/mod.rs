//! Geometric primitives for canvas input
//!
//! Samples are the raw pointer readings, bounding boxes are derived from
//! sample sequences, and [`Polygon`] carries the lasso containment test.

pub mod polygon;

pub use polygon::Polygon;

use serde::{Deserialize, Serialize};

/// Pressure reported for devices that have no pressure sensor
pub const DEFAULT_PRESSURE: f64 = 1.0;

/// A single pointer sample in canvas coordinates
///
/// Coordinates and pressure are expected to be finite. Equality is exact,
/// field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_pressure")]
    pub pressure: f64,
}

pub(crate) fn default_pressure() -> f64 {
    DEFAULT_PRESSURE
}

impl Sample {
    /// Create a sample with an explicit pressure reading
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    /// Create a sample for a device that does not report pressure
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, DEFAULT_PRESSURE)
    }
}

/// Axis-aligned rectangle enclosing a set of samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Compute the bounds of a sample sequence
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let min_x = samples.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = samples.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = samples.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = samples.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Left edge
    pub fn x(&self) -> f64 {
        self.min_x
    }

    /// Top edge
    pub fn y(&self) -> f64 {
        self.min_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when all samples were collinear on one axis
    pub fn is_zero_area(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Bounds as fractions of the canvas size, clamped to 0.0-1.0
    ///
    /// Returns (x, y, width, height).
    pub fn normalized(&self, canvas_size: (f64, f64)) -> (f64, f64, f64, f64) {
        let (canvas_width, canvas_height) = canvas_size;
        if canvas_width <= 0.0 || canvas_height <= 0.0 {
            return (0.0, 0.0, 0.0, 0.0);
        }

        let x = self.min_x / canvas_width;
        let y = self.min_y / canvas_height;
        let width = self.width() / canvas_width;
        let height = self.height() / canvas_height;

        (
            x.clamp(0.0, 1.0),
            y.clamp(0.0, 1.0),
            width.clamp(0.0, 1.0),
            height.clamp(0.0, 1.0),
        )
    }
}
