//! Text recognition collaborator
//!
//! The canvas does not recognize text itself. It hands a selected region
//! plus a snapshot of the drawing to a [`TextRecognizer`], which runs on a
//! worker thread and reports back tagged with the selection generation the
//! request was issued against.

pub mod command;
pub mod worker;

pub use command::CommandRecognizer;
pub use worker::RecognitionWorker;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::{CanvasSnapshot, Generation};
use crate::geometry::BoundingBox;

/// Failures reported by a recognizer
///
/// The canvas never interprets these, it only routes them to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecognitionError {
    /// The selected area could not be captured as an image
    #[error("failed to capture the selected area")]
    ImageCreationFailed,

    /// The captured image could not be prepared for recognition
    #[error("failed to process the selected area")]
    ImageProcessingFailed,

    /// The recognizer itself failed
    #[error("text recognition failed: {0}")]
    RecognitionFailed(String),

    /// Recognition ran but found no text
    #[error("no text was found in the selected area")]
    NoTextFound,

    /// No recognizer is available
    #[error("text recognition is not available")]
    Unavailable,
}

impl RecognitionError {
    /// Hint to show next to the error message
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RecognitionError::ImageCreationFailed => {
                "Try selecting a different area or reducing the selection size"
            }
            RecognitionError::ImageProcessingFailed => {
                "Try selecting a smaller area or ensuring the selection contains visible content"
            }
            RecognitionError::RecognitionFailed(_) => {
                "Try writing more clearly, using darker strokes, or selecting a different area"
            }
            RecognitionError::NoTextFound => {
                "Ensure your handwriting is clear and contained within the selected area"
            }
            RecognitionError::Unavailable => {
                "Configure a recognizer command in the [recognizer] section of the config file"
            }
        }
    }
}

/// Accuracy/speed trade-off requested from the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionLevel {
    #[default]
    Accurate,
    Fast,
}

/// Recognizer tuning, passed through to the recognizer untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    pub level: RecognitionLevel,
    pub uses_language_correction: bool,
    pub languages: Vec<String>,
    /// Minimum text height as a fraction of the image height; the
    /// recognizer's own default applies when unset
    pub minimum_text_height: Option<f32>,
    /// Extra vocabulary to bias recognition
    pub custom_words: Vec<String>,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self::standard()
    }
}

impl RecognitionSettings {
    /// Accurate recognition of English handwriting
    pub fn standard() -> Self {
        Self {
            level: RecognitionLevel::Accurate,
            uses_language_correction: true,
            languages: vec!["en-US".to_string()],
            minimum_text_height: None,
            custom_words: Vec::new(),
        }
    }

    /// Quicker, less accurate recognition
    pub fn fast() -> Self {
        Self {
            level: RecognitionLevel::Fast,
            ..Self::standard()
        }
    }
}

/// A request to recognize the text inside a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionRequest {
    /// Selection epoch the request was issued against
    pub generation: Generation,
    /// Selected area in canvas coordinates
    pub region: BoundingBox,
    /// Selected area as fractions of the canvas size: (x, y, width, height)
    pub normalized_region: (f64, f64, f64, f64),
    /// Canvas size the region refers to
    pub canvas_size: (f64, f64),
    /// Drawing content to render for recognition
    pub snapshot: CanvasSnapshot,
    pub settings: RecognitionSettings,
}

/// A recognizer's answer to one request
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResponse {
    pub generation: Generation,
    pub result: Result<String, RecognitionError>,
}

/// Something that turns a selected region into text
pub trait TextRecognizer: Send {
    fn name(&self) -> &'static str;

    fn recognize(&mut self, request: &RecognitionRequest) -> Result<String, RecognitionError>;
}

/// Recognizer used when none is configured; every request fails with
/// [`RecognitionError::Unavailable`]
#[derive(Debug, Default)]
pub struct UnavailableRecognizer;

impl TextRecognizer for UnavailableRecognizer {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn recognize(&mut self, _request: &RecognitionRequest) -> Result<String, RecognitionError> {
        Err(RecognitionError::Unavailable)
    }
}
