//! Error types for canvas operations
//!
//! All of these are local and recoverable; none of them ends a drawing session.

use thiserror::Error;

use crate::canvas::Tool;

/// Errors raised by the canvas state machine and the drawing session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    /// A gesture ended without any accumulated samples
    #[error("gesture ended with no samples")]
    EmptyGesture,

    /// A lasso with fewer than three samples cannot enclose an area
    #[error("lasso selection has only {points} point(s), at least 3 are needed")]
    DegeneratePolygon { points: usize },

    /// `begin` was called while another gesture is still active
    #[error("a gesture is already in progress")]
    GestureAlreadyActive,

    /// `extend` or `end` was called with no active gesture
    #[error("no gesture is in progress")]
    NoActiveGesture,

    /// A tool switch was rejected because a gesture is still active
    #[error("cannot switch tools while a {tool} gesture is in progress")]
    GestureInProgress { tool: Tool },

    /// The gesture reached the configured per-gesture point cap
    #[error("gesture point limit of {limit} reached")]
    PointLimitReached { limit: usize },

    /// Recognition was requested with no published selection
    #[error("no area selected for text recognition")]
    NoSelection,

    /// Recognition was requested on an empty canvas
    #[error("no drawing content to process")]
    NoContent,

    /// The recognition worker is gone
    #[error("text recognition worker is not running")]
    WorkerUnavailable,
}

/// Result type alias for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;
