//! Gesture script replay
//!
//! A script is a JSON array of actions that drives a [`DrawingSession`] the
//! way pointer input would. Failed steps are recorded and replay continues,
//! since every canvas error is recoverable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::canvas::{Selection, StrokeId, StrokeStyle, Tool};
use crate::geometry::{default_pressure, Sample};
use crate::session::DrawingSession;

/// One scripted input step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    Tool {
        tool: Tool,
    },
    Begin {
        x: f64,
        y: f64,
        #[serde(default = "default_pressure")]
        pressure: f64,
    },
    Extend {
        x: f64,
        y: f64,
        #[serde(default = "default_pressure")]
        pressure: f64,
    },
    End,
    Discard,
    ClearSelection,
    ClearCanvas,
    Recognize,
    /// Wait for the outstanding recognition answer
    Wait {
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
}

/// A step that failed during replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepError {
    pub step: usize,
    pub message: String,
}

/// Committed stroke as shown in a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeSummary {
    pub id: StrokeId,
    pub points: usize,
    pub style: StrokeStyle,
}

/// Canvas and recognition state after a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptReport {
    pub tool: Tool,
    pub strokes: Vec<StrokeSummary>,
    pub selection: Option<Selection>,
    pub strokes_in_selection: Vec<StrokeId>,
    pub recognized_text: Option<String>,
    pub error: Option<String>,
    pub is_processing: bool,
    pub stale_results_dropped: u64,
    pub step_errors: Vec<StepError>,
}

/// Read a script file
pub fn load_script(path: &Path) -> Result<Vec<ScriptAction>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {:?}", path))?;
    parse_script(&content).with_context(|| format!("Failed to parse script {:?}", path))
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptAction>> {
    Ok(serde_json::from_str(content)?)
}

/// Replay a script against a session
///
/// `default_wait` bounds `recognize` and `wait` steps without their own
/// timeout.
pub fn run_script(
    session: &mut DrawingSession,
    actions: &[ScriptAction],
    default_wait: Duration,
) -> ScriptReport {
    let mut step_errors = Vec::new();

    for (step, action) in actions.iter().enumerate() {
        debug!("Script step {}: {:?}", step, action);
        let result = match action {
            ScriptAction::Tool { tool } => session.set_tool(*tool).map(|_| ()),
            ScriptAction::Begin { x, y, pressure } => {
                session.begin(Sample::new(*x, *y, *pressure))
            }
            ScriptAction::Extend { x, y, pressure } => {
                session.extend(Sample::new(*x, *y, *pressure))
            }
            ScriptAction::End => session.end().map(|_| ()),
            ScriptAction::Discard => {
                session.discard_gesture();
                Ok(())
            }
            ScriptAction::ClearSelection => {
                session.clear_selection();
                Ok(())
            }
            ScriptAction::ClearCanvas => {
                session.clear_canvas();
                Ok(())
            }
            ScriptAction::Recognize => session.process_selected_area().map(|_| ()),
            ScriptAction::Wait { timeout_ms } => {
                let timeout = timeout_ms.map(Duration::from_millis).unwrap_or(default_wait);
                session.wait_for_response(timeout).map(|_| ())
            }
        };

        if let Err(e) = result {
            warn!("Script step {} failed: {}", step, e);
            step_errors.push(StepError {
                step,
                message: e.to_string(),
            });
        }
    }

    session.poll_responses();
    report(session, step_errors)
}

fn report(session: &DrawingSession, step_errors: Vec<StepError>) -> ScriptReport {
    let canvas = session.canvas();
    ScriptReport {
        tool: canvas.tool(),
        strokes: canvas
            .strokes()
            .iter()
            .map(|stroke| StrokeSummary {
                id: stroke.id(),
                points: stroke.len(),
                style: stroke.style(),
            })
            .collect(),
        selection: canvas.selection().cloned(),
        strokes_in_selection: canvas.strokes_in_selection(),
        recognized_text: session.recognized_text().map(str::to_string),
        error: session.error_message(),
        is_processing: session.is_processing(),
        stale_results_dropped: session.stale_results_dropped(),
        step_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::recognition::{
        RecognitionError, RecognitionRequest, RecognitionSettings, RecognitionWorker,
        TextRecognizer, UnavailableRecognizer,
    };

    struct CountingRecognizer;

    impl TextRecognizer for CountingRecognizer {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn recognize(&mut self, request: &RecognitionRequest) -> Result<String, RecognitionError> {
            Ok(format!("{} strokes", request.snapshot.strokes.len()))
        }
    }

    fn session<R: TextRecognizer + 'static>(recognizer: R) -> DrawingSession {
        DrawingSession::new(
            Canvas::default(),
            RecognitionWorker::spawn(recognizer).unwrap(),
            RecognitionSettings::standard(),
        )
    }

    const SCRIPT: &str = r#"[
        {"action": "begin", "x": 12, "y": 12},
        {"action": "extend", "x": 18, "y": 18, "pressure": 0.5},
        {"action": "end"},
        {"action": "tool", "tool": "lasso"},
        {"action": "begin", "x": 10, "y": 10},
        {"action": "extend", "x": 20, "y": 10},
        {"action": "extend", "x": 20, "y": 20},
        {"action": "extend", "x": 10, "y": 20},
        {"action": "end"},
        {"action": "recognize"},
        {"action": "wait"}
    ]"#;

    #[test]
    fn test_parse_script() {
        let actions = parse_script(SCRIPT).unwrap();
        assert_eq!(actions.len(), 11);
        assert_eq!(
            actions[0],
            ScriptAction::Begin {
                x: 12.0,
                y: 12.0,
                pressure: 1.0
            }
        );
        assert_eq!(actions[3], ScriptAction::Tool { tool: Tool::Lasso });
        assert_eq!(actions[10], ScriptAction::Wait { timeout_ms: None });
    }

    #[test]
    fn test_parse_unknown_action() {
        assert!(parse_script(r#"[{"action": "undo"}]"#).is_err());
    }

    #[test]
    fn test_run_script_end_to_end() {
        let mut session = session(CountingRecognizer);
        let actions = parse_script(SCRIPT).unwrap();

        let report = run_script(&mut session, &actions, Duration::from_secs(5));

        assert!(report.step_errors.is_empty());
        assert_eq!(report.tool, Tool::Lasso);
        assert_eq!(report.strokes.len(), 1);
        assert_eq!(report.strokes[0].points, 2);

        let bounds = report.selection.as_ref().unwrap().bounds();
        assert_eq!((bounds.x(), bounds.y()), (10.0, 10.0));
        assert_eq!((bounds.width(), bounds.height()), (10.0, 10.0));

        assert_eq!(report.strokes_in_selection, vec![report.strokes[0].id]);
        assert_eq!(report.recognized_text.as_deref(), Some("1 strokes"));
        assert!(!report.is_processing);
    }

    #[test]
    fn test_run_script_records_failures() {
        let mut session = session(UnavailableRecognizer);
        let actions = parse_script(
            r#"[
                {"action": "extend", "x": 1, "y": 1},
                {"action": "recognize"},
                {"action": "begin", "x": 0, "y": 0},
                {"action": "end"}
            ]"#,
        )
        .unwrap();

        let report = run_script(&mut session, &actions, Duration::from_millis(100));

        assert_eq!(report.step_errors.len(), 2);
        assert_eq!(report.step_errors[0].step, 0);
        assert_eq!(report.step_errors[0].message, "no gesture is in progress");
        assert_eq!(report.step_errors[1].message, "no area selected for text recognition");
        assert_eq!(report.strokes.len(), 1);
    }

    #[test]
    fn test_unavailable_recognizer_reports_error() {
        let mut session = session(UnavailableRecognizer);
        let actions = parse_script(SCRIPT).unwrap();

        let report = run_script(&mut session, &actions, Duration::from_secs(5));

        assert!(report.recognized_text.is_none());
        assert_eq!(
            report.error.as_deref(),
            Some("Text recognition is not available")
        );
    }
}
