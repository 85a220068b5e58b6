//! Drawing session
//!
//! Couples a [`Canvas`] with a [`RecognitionWorker`]. The session lives on
//! the thread that owns the canvas; recognition runs on the worker and its
//! responses are applied only when polled, and only while the selection they
//! were issued for is still current.

use std::time::Duration;
use tracing::{debug, info};

use crate::canvas::{Canvas, GestureOutcome, Generation, Tool};
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::Sample;
use crate::recognition::{
    RecognitionError, RecognitionRequest, RecognitionResponse, RecognitionSettings,
    RecognitionWorker,
};

/// Default canvas size handed to recognizers, in canvas units
pub const DEFAULT_CANVAS_SIZE: (f64, f64) = (800.0, 600.0);

/// A canvas plus its asynchronous recognition state
pub struct DrawingSession {
    canvas: Canvas,
    worker: RecognitionWorker,
    settings: RecognitionSettings,
    canvas_size: (f64, f64),
    /// Generation of the latest submitted selection and how many of its
    /// requests are still unanswered
    pending: Option<(Generation, usize)>,
    recognized: Option<(Generation, String)>,
    error: Option<(Generation, RecognitionError)>,
    stale_dropped: u64,
}

impl DrawingSession {
    pub fn new(canvas: Canvas, worker: RecognitionWorker, settings: RecognitionSettings) -> Self {
        Self {
            canvas,
            worker,
            settings,
            canvas_size: DEFAULT_CANVAS_SIZE,
            pending: None,
            recognized: None,
            error: None,
            stale_dropped: 0,
        }
    }

    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas_size = (width, height);
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        self.canvas_size
    }

    pub fn settings(&self) -> &RecognitionSettings {
        &self.settings
    }

    pub fn set_tool(&mut self, tool: Tool) -> CanvasResult<Option<GestureOutcome>> {
        self.canvas.set_tool(tool)
    }

    pub fn begin(&mut self, sample: Sample) -> CanvasResult<()> {
        self.canvas.begin(sample)
    }

    pub fn extend(&mut self, sample: Sample) -> CanvasResult<()> {
        self.canvas.extend(sample)
    }

    pub fn end(&mut self) -> CanvasResult<GestureOutcome> {
        self.canvas.end()
    }

    pub fn discard_gesture(&mut self) -> bool {
        self.canvas.discard_gesture()
    }

    /// Clear the selection together with any text recognized for it
    pub fn clear_selection(&mut self) {
        self.canvas.clear_selection();
        self.recognized = None;
        self.error = None;
    }

    /// Clear strokes, selection and recognized text
    pub fn clear_canvas(&mut self) {
        self.canvas.clear_canvas();
        self.recognized = None;
        self.error = None;
    }

    /// Text recognized for the current selection
    ///
    /// Text recognized for an earlier selection is never returned.
    pub fn recognized_text(&self) -> Option<&str> {
        self.recognized
            .as_ref()
            .filter(|(generation, _)| *generation == self.canvas.generation())
            .map(|(_, text)| text.as_str())
    }

    /// Recognition error for the current selection
    pub fn recognition_error(&self) -> Option<&RecognitionError> {
        self.error
            .as_ref()
            .filter(|(generation, _)| *generation == self.canvas.generation())
            .map(|(_, error)| error)
    }

    /// User-facing message for the current recognition error
    pub fn error_message(&self) -> Option<String> {
        self.recognition_error().map(|e| match e {
            RecognitionError::NoTextFound => {
                "No text could be recognized in the selected area".to_string()
            }
            RecognitionError::ImageCreationFailed => "Failed to capture drawing content".to_string(),
            RecognitionError::ImageProcessingFailed => {
                "Failed to process drawing content".to_string()
            }
            other => capitalize(&other.to_string()),
        })
    }

    /// Whether a request for the current selection is outstanding
    pub fn is_processing(&self) -> bool {
        matches!(self.pending, Some((generation, _)) if generation == self.canvas.generation())
    }

    /// Number of responses dropped because their selection had changed
    pub fn stale_results_dropped(&self) -> u64 {
        self.stale_dropped
    }

    /// Send the current selection to the recognizer
    ///
    /// Returns the generation the request is tagged with.
    pub fn process_selected_area(&mut self) -> CanvasResult<Generation> {
        let selection = self.canvas.selection().ok_or(CanvasError::NoSelection)?;
        if self.canvas.strokes().is_empty() {
            return Err(CanvasError::NoContent);
        }

        let generation = selection.generation();
        let region = selection.bounds();
        let request = RecognitionRequest {
            generation,
            region,
            normalized_region: region.normalized(self.canvas_size),
            canvas_size: self.canvas_size,
            snapshot: self.canvas.snapshot(),
            settings: self.settings.clone(),
        };

        self.worker.submit(request)?;
        self.pending = match self.pending {
            Some((pending, outstanding)) if pending == generation => {
                Some((generation, outstanding + 1))
            }
            _ => Some((generation, 1)),
        };
        self.recognized = None;
        self.error = None;
        info!(
            "Requested recognition of selection {} via '{}'",
            generation,
            self.worker.name()
        );

        Ok(generation)
    }

    /// Apply every response that has already arrived
    ///
    /// Returns how many responses were applied to the current selection.
    pub fn poll_responses(&mut self) -> usize {
        let mut applied = 0;
        while let Some(response) = self.worker.try_recv() {
            if self.apply_response(response) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until the outstanding request for the current selection is
    /// answered or `timeout` elapses
    ///
    /// Returns true when a response was applied.
    pub fn wait_for_response(&mut self, timeout: Duration) -> CanvasResult<bool> {
        let deadline = std::time::Instant::now() + timeout;
        while self.is_processing() {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }
            match self.worker.recv_timeout(remaining)? {
                Some(response) => {
                    if self.apply_response(response) {
                        return Ok(true);
                    }
                }
                None => return Ok(false),
            }
        }
        Ok(false)
    }

    fn apply_response(&mut self, response: RecognitionResponse) -> bool {
        if let Some((pending, outstanding)) = self.pending {
            if pending == response.generation {
                self.pending = (outstanding > 1).then(|| (pending, outstanding - 1));
            }
        }

        let current = self.canvas.generation();
        if response.generation != current {
            self.stale_dropped += 1;
            debug!(
                "Ignoring stale recognition result for selection {} (current {})",
                response.generation, current
            );
            return false;
        }

        match response.result {
            Ok(text) => {
                info!("Recognized text for selection {}: {}", current, text);
                self.recognized = Some((current, text));
                self.error = None;
            }
            Err(error) => {
                info!("Recognition failed for selection {}: {}", current, error);
                self.error = Some((current, error));
                self.recognized = None;
            }
        }
        true
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
