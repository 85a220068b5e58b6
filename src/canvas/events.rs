//! Canvas change notifications
//!
//! Observers subscribe explicitly and receive events over their own channel.
//! Nothing is broadcast implicitly.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use super::selection::Generation;
use super::stroke::StrokeId;
use super::tool::Tool;
use crate::geometry::BoundingBox;

/// Changes observable on a canvas
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// The active tool changed
    ToolChanged { from: Tool, to: Tool },
    /// A gesture started with the given tool
    GestureBegan { tool: Tool },
    /// A stroke was committed to the canvas
    StrokeCommitted { id: StrokeId, points: usize },
    /// An active gesture was dropped without committing
    GestureDiscarded { tool: Tool, points: usize },
    /// A lasso gesture completed and replaced the selection
    SelectionPublished {
        generation: Generation,
        bounds: BoundingBox,
    },
    /// The selection was cleared
    SelectionCleared { generation: Generation },
    /// All committed strokes were removed
    CanvasCleared { removed: usize },
}

/// Fan-out of canvas events to subscribed observers
#[derive(Debug, Default)]
pub struct EventEmitter {
    subscribers: Mutex<Vec<Sender<CanvasEvent>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer
    pub fn subscribe(&self) -> Receiver<CanvasEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Deliver an event to every live subscriber, dropping those whose
    /// receiver has gone away
    pub fn emit(&self, event: CanvasEvent) {
        let mut subscribers = self.subscribers.lock();
        if subscribers.is_empty() {
            return;
        }
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
