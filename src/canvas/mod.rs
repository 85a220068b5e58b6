//! Drawing canvas
//!
//! Owns the committed strokes, the single in-progress gesture and the
//! published selection. Pointer input arrives as `begin`, `extend` and `end`
//! and is routed by the active tool: pencil and eraser build strokes, the
//! lasso builds a polygon whose bounds become the selection.
//!
//! All mutation happens through `&mut self`; callers on several threads must
//! funnel input through one owner.

pub mod events;
pub mod lasso;
pub mod selection;
pub mod stroke;
pub mod tool;

pub use events::{CanvasEvent, EventEmitter};
pub use lasso::{FinishedLasso, Lasso};
pub use selection::{Generation, Selection};
pub use stroke::{Rgba, Stroke, StrokeId, StrokeStyle};
pub use tool::Tool;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{BoundingBox, Polygon, Sample};

/// What happens to an active gesture when the tool changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSwitchPolicy {
    /// End the active gesture (commit the stroke or publish the selection),
    /// then switch
    #[default]
    EndActive,
    /// Refuse the switch until the active gesture ends or is discarded
    Reject,
}

/// Canvas behavior settings
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSettings {
    pub initial_tool: Tool,
    pub tool_switch_policy: ToolSwitchPolicy,
    /// Per-gesture sample cap, unbounded when `None`
    pub max_points_per_gesture: Option<usize>,
    pub pencil: StrokeStyle,
    pub eraser: StrokeStyle,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            initial_tool: Tool::Pencil,
            tool_switch_policy: ToolSwitchPolicy::EndActive,
            max_points_per_gesture: None,
            pencil: StrokeStyle::PENCIL,
            eraser: StrokeStyle::ERASER,
        }
    }
}

impl CanvasSettings {
    /// Style of strokes drawn with `tool`; the lasso draws no stroke
    pub fn stroke_style(&self, tool: Tool) -> Option<StrokeStyle> {
        match tool {
            Tool::Pencil => Some(self.pencil),
            Tool::Eraser => Some(self.eraser),
            Tool::Lasso => None,
        }
    }
}

/// Gesture state without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    Idle,
    DrawingStroke,
    DrawingLasso,
}

#[derive(Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    Stroke { tool: Tool, stroke: Stroke },
    Lasso(Lasso),
}

impl Gesture {
    fn state(&self) -> GestureState {
        match self {
            Gesture::Idle => GestureState::Idle,
            Gesture::Stroke { .. } => GestureState::DrawingStroke,
            Gesture::Lasso(_) => GestureState::DrawingLasso,
        }
    }

    fn tool(&self) -> Option<Tool> {
        match self {
            Gesture::Idle => None,
            Gesture::Stroke { tool, .. } => Some(*tool),
            Gesture::Lasso(_) => Some(Tool::Lasso),
        }
    }

    fn len(&self) -> usize {
        match self {
            Gesture::Idle => 0,
            Gesture::Stroke { stroke, .. } => stroke.len(),
            Gesture::Lasso(lasso) => lasso.len(),
        }
    }
}

/// What an ended gesture produced
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// A stroke was added to the committed collection
    StrokeCommitted(StrokeId),
    /// A lasso replaced the selection
    SelectionPublished {
        generation: Generation,
        bounds: BoundingBox,
    },
    /// A lasso with too few points to enclose anything; the previous
    /// selection was cleared
    SelectionCleared { generation: Generation, points: usize },
}

/// Read-only copy of the canvas for rendering and recognition context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub tool: Tool,
    pub state: GestureState,
    pub generation: Generation,
    pub strokes: Vec<Stroke>,
    pub active_stroke: Option<Stroke>,
    pub active_lasso: Option<Polygon>,
    pub selection: Option<Selection>,
}

/// The drawing canvas and its tool/gesture state machine
#[derive(Debug)]
pub struct Canvas {
    settings: CanvasSettings,
    tool: Tool,
    strokes: Vec<Stroke>,
    gesture: Gesture,
    selection: Option<Selection>,
    generation: Generation,
    events: EventEmitter,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasSettings::default())
    }
}

impl Canvas {
    pub fn new(settings: CanvasSettings) -> Self {
        Self {
            tool: settings.initial_tool,
            settings,
            strokes: Vec::new(),
            gesture: Gesture::Idle,
            selection: None,
            generation: Generation::default(),
            events: EventEmitter::new(),
        }
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> GestureState {
        self.gesture.state()
    }

    /// Committed strokes in drawing order
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        match &self.gesture {
            Gesture::Stroke { stroke, .. } => Some(stroke),
            _ => None,
        }
    }

    pub fn active_lasso(&self) -> Option<&Polygon> {
        match &self.gesture {
            Gesture::Lasso(lasso) => Some(lasso.polygon()),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Current selection epoch
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Register an observer for canvas changes
    pub fn subscribe(&self) -> Receiver<CanvasEvent> {
        let rx = self.events.subscribe();
        debug!("Canvas observer added ({} subscribed)", self.events.subscriber_count());
        rx
    }

    /// Change the active tool, applying the configured policy to any
    /// gesture in progress
    ///
    /// Returns what the implicitly ended gesture produced, if any.
    pub fn set_tool(&mut self, tool: Tool) -> CanvasResult<Option<GestureOutcome>> {
        if tool == self.tool {
            return Ok(None);
        }

        let outcome = match (self.gesture.tool(), self.settings.tool_switch_policy) {
            (None, _) => None,
            (Some(active), ToolSwitchPolicy::Reject) => {
                debug!("Rejected switch to {} during {} gesture", tool, active);
                return Err(CanvasError::GestureInProgress { tool: active });
            }
            (Some(active), ToolSwitchPolicy::EndActive) => {
                debug!("Ending {} gesture before switching to {}", active, tool);
                Some(self.end()?)
            }
        };

        let from = self.tool;
        self.tool = tool;
        info!("Tool changed: {} -> {}", from, tool);
        self.events.emit(CanvasEvent::ToolChanged { from, to: tool });

        Ok(outcome)
    }

    /// Start a gesture with the active tool
    pub fn begin(&mut self, sample: Sample) -> CanvasResult<()> {
        if !matches!(self.gesture, Gesture::Idle) {
            return Err(CanvasError::GestureAlreadyActive);
        }

        self.gesture = match self.settings.stroke_style(self.tool) {
            Some(style) => Gesture::Stroke {
                tool: self.tool,
                stroke: Stroke::begin(sample, style),
            },
            None => Gesture::Lasso(Lasso::begin(sample)),
        };

        debug!("Began {} gesture at ({}, {})", self.tool, sample.x, sample.y);
        self.events.emit(CanvasEvent::GestureBegan { tool: self.tool });
        Ok(())
    }

    /// Append a sample to the active gesture
    pub fn extend(&mut self, sample: Sample) -> CanvasResult<()> {
        if let Some(limit) = self.settings.max_points_per_gesture {
            if self.gesture.len() >= limit {
                return Err(CanvasError::PointLimitReached { limit });
            }
        }

        match &mut self.gesture {
            Gesture::Idle => Err(CanvasError::NoActiveGesture),
            Gesture::Stroke { stroke, .. } => {
                stroke.extend(sample);
                Ok(())
            }
            Gesture::Lasso(lasso) => {
                lasso.extend(sample);
                Ok(())
            }
        }
    }

    /// Finish the active gesture
    ///
    /// A stroke is committed even with a single sample. A lasso publishes
    /// its bounds as the new selection, replacing the previous one. A lasso
    /// with fewer than three points encloses nothing: the selection is
    /// cleared instead and the gesture still ends normally.
    pub fn end(&mut self) -> CanvasResult<GestureOutcome> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Err(CanvasError::NoActiveGesture),
            Gesture::Stroke { stroke, .. } => {
                if stroke.is_empty() {
                    return Err(CanvasError::EmptyGesture);
                }
                let id = stroke.id();
                let points = stroke.len();
                self.strokes.push(stroke);
                debug!("Committed stroke {} with {} point(s)", id, points);
                self.events.emit(CanvasEvent::StrokeCommitted { id, points });
                Ok(GestureOutcome::StrokeCommitted(id))
            }
            Gesture::Lasso(lasso) => {
                let FinishedLasso { polygon, bounds } = lasso.finish()?;
                if polygon.is_degenerate() {
                    let points = polygon.len();
                    warn!("{}", CanvasError::DegeneratePolygon { points });
                    self.clear_selection();
                    return Ok(GestureOutcome::SelectionCleared {
                        generation: self.generation,
                        points,
                    });
                }

                self.generation = self.generation.next();
                self.selection = Some(Selection::new(self.generation, bounds, polygon));
                info!(
                    "Selection {} published: x={} y={} w={} h={}",
                    self.generation,
                    bounds.x(),
                    bounds.y(),
                    bounds.width(),
                    bounds.height()
                );
                self.events.emit(CanvasEvent::SelectionPublished {
                    generation: self.generation,
                    bounds,
                });

                Ok(GestureOutcome::SelectionPublished {
                    generation: self.generation,
                    bounds,
                })
            }
        }
    }

    /// Drop the active gesture without committing anything
    ///
    /// Returns false when there was nothing to discard.
    pub fn discard_gesture(&mut self) -> bool {
        let points = self.gesture.len();
        match std::mem::take(&mut self.gesture).tool() {
            Some(tool) => {
                debug!("Discarded {} gesture with {} point(s)", tool, points);
                self.events
                    .emit(CanvasEvent::GestureDiscarded { tool, points });
                true
            }
            None => false,
        }
    }

    /// Remove the selection and start a new selection epoch
    ///
    /// Safe to call repeatedly. Committed strokes and any gesture in
    /// progress are left alone.
    pub fn clear_selection(&mut self) {
        let had_selection = self.selection.take().is_some();
        self.generation = self.generation.next();
        if had_selection {
            info!("Selection cleared");
        }
        self.events.emit(CanvasEvent::SelectionCleared {
            generation: self.generation,
        });
    }

    /// Remove every committed stroke and the selection
    pub fn clear_canvas(&mut self) {
        let removed = self.strokes.len();
        self.strokes.clear();
        info!("Canvas cleared ({} stroke(s) removed)", removed);
        self.events.emit(CanvasEvent::CanvasCleared { removed });
        self.clear_selection();
    }

    /// Committed strokes with at least one sample inside the lasso
    pub fn strokes_in_selection(&self) -> Vec<StrokeId> {
        let Some(selection) = &self.selection else {
            return Vec::new();
        };
        self.strokes
            .iter()
            .filter(|stroke| selection.polygon().contains_any(stroke.points()))
            .map(|stroke| stroke.id())
            .collect()
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            tool: self.tool,
            state: self.state(),
            generation: self.generation,
            strokes: self.strokes.clone(),
            active_stroke: self.active_stroke().cloned(),
            active_lasso: self.active_lasso().cloned(),
            selection: self.selection.clone(),
        }
    }
}
