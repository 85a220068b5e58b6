//! Freehand strokes and their styling

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::geometry::Sample;

/// Opaque unique stroke identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeId(Uuid);

impl StrokeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StrokeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Color and width a stroke is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
}

impl StrokeStyle {
    pub const PENCIL: StrokeStyle = StrokeStyle::new(Rgba::BLACK, 2.0);
    pub const ERASER: StrokeStyle = StrokeStyle::new(Rgba::WHITE, 20.0);

    pub const fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

/// One pointer-down to pointer-up gesture drawn with a stroke tool
///
/// Points are only appended while the stroke is active. Once committed to
/// the canvas the stroke is only reachable through shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    id: StrokeId,
    points: Vec<Sample>,
    style: StrokeStyle,
}

impl Stroke {
    /// Start a stroke with its first sample
    pub fn begin(sample: Sample, style: StrokeStyle) -> Self {
        Self {
            id: StrokeId::new(),
            points: vec![sample],
            style,
        }
    }

    /// Append a sample to an active stroke
    pub fn extend(&mut self, sample: Sample) {
        self.points.push(sample);
    }

    pub fn id(&self) -> StrokeId {
        self.id
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

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn color(&self) -> Rgba {
        self.style.color
    }

    pub fn width(&self) -> f64 {
        self.style.width
    }

    /// A stroke with a single sample renders as a dot
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }
}
