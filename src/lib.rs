//! Handwriting Canvas - freehand drawing with lasso selection
//!
//! Records freehand strokes, lets the user trace a lasso around part of the
//! drawing and hands the selected region to an external text recognizer.

pub mod canvas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod recognition;
pub mod script;
pub mod session;

pub use canvas::{Canvas, CanvasSettings, GestureOutcome, Selection, Tool, ToolSwitchPolicy};
pub use error::{CanvasError, CanvasResult};
pub use geometry::{BoundingBox, Polygon, Sample};
pub use session::DrawingSession;
