//! Lasso gesture accumulator

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{BoundingBox, Polygon, Sample};

/// A lasso path being traced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lasso {
    polygon: Polygon,
}

/// The result of a completed lasso gesture
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedLasso {
    pub polygon: Polygon,
    pub bounds: BoundingBox,
}

impl Lasso {
    /// Start a lasso at its first sample
    pub fn begin(sample: Sample) -> Self {
        let mut polygon = Polygon::new();
        polygon.push(sample);
        Self { polygon }
    }

    pub fn extend(&mut self, sample: Sample) {
        self.polygon.push(sample);
    }

    /// The path traced so far, for live feedback
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn len(&self) -> usize {
        self.polygon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygon.is_empty()
    }

    /// Close the gesture and derive its bounds
    ///
    /// An empty lasso has no bounds and yields [`CanvasError::EmptyGesture`].
    pub fn finish(self) -> CanvasResult<FinishedLasso> {
        let bounds = self
            .polygon
            .bounding_box()
            .ok_or(CanvasError::EmptyGesture)?;
        Ok(FinishedLasso {
            polygon: self.polygon,
            bounds,
        })
    }
}
