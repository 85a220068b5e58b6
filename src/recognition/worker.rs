//! Background recognition worker
//!
//! Runs a [`TextRecognizer`] on its own thread. Requests go in over one
//! channel and responses come back over another, each tagged with the
//! generation of the request that produced it.

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{RecognitionRequest, RecognitionResponse, TextRecognizer};
use crate::error::{CanvasError, CanvasResult};

/// Messages sent to the worker thread
#[derive(Debug)]
enum WorkerCommand {
    Recognize(Box<RecognitionRequest>),
    Shutdown,
}

/// Handle to a recognizer running on a background thread
pub struct RecognitionWorker {
    name: &'static str,
    requests: Sender<WorkerCommand>,
    responses: Receiver<RecognitionResponse>,
    handle: Option<JoinHandle<()>>,
}

impl RecognitionWorker {
    /// Start a worker thread owning the recognizer
    pub fn spawn<R>(recognizer: R) -> Result<Self>
    where
        R: TextRecognizer + 'static,
    {
        let name = recognizer.name();
        let (requests, request_rx) = unbounded();
        let (response_tx, responses) = unbounded();

        let handle = std::thread::Builder::new()
            .name(format!("recognizer-{}", name))
            .spawn(move || run(recognizer, request_rx, response_tx))
            .context("Failed to spawn recognition worker thread")?;

        info!("Recognition worker '{}' started", name);

        Ok(Self {
            name,
            requests,
            responses,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Queue a request; the worker answers in submission order
    pub fn submit(&self, request: RecognitionRequest) -> CanvasResult<()> {
        self.requests
            .send(WorkerCommand::Recognize(Box::new(request)))
            .map_err(|_| CanvasError::WorkerUnavailable)
    }

    /// Take a finished response without blocking
    pub fn try_recv(&self) -> Option<RecognitionResponse> {
        self.responses.try_recv().ok()
    }

    /// Wait up to `timeout` for the next response
    pub fn recv_timeout(&self, timeout: Duration) -> CanvasResult<Option<RecognitionResponse>> {
        match self.responses.recv_timeout(timeout) {
            Ok(response) => Ok(Some(response)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(CanvasError::WorkerUnavailable),
        }
    }

    /// Stop the worker and wait for it to exit
    pub fn shutdown(&mut self) {
        let _ = self.requests.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Recognition worker '{}' panicked", self.name);
            }
        }
    }
}

impl Drop for RecognitionWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run<R: TextRecognizer>(
    mut recognizer: R,
    requests: Receiver<WorkerCommand>,
    responses: Sender<RecognitionResponse>,
) {
    debug!("Recognition worker thread running");

    for command in requests {
        match command {
            WorkerCommand::Recognize(request) => {
                let generation = request.generation;
                debug!("Recognizing selection {}", generation);
                let result = recognizer.recognize(&request);
                if responses
                    .send(RecognitionResponse { generation, result })
                    .is_err()
                {
                    break;
                }
            }
            WorkerCommand::Shutdown => break,
        }
    }

    info!("Recognition worker '{}' stopped", recognizer.name());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, Generation};
    use crate::geometry::BoundingBox;
    use crate::recognition::{RecognitionError, RecognitionSettings};

    struct EchoRecognizer;

    impl TextRecognizer for EchoRecognizer {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn recognize(&mut self, request: &RecognitionRequest) -> Result<String, RecognitionError> {
            if request.snapshot.strokes.is_empty() {
                return Err(RecognitionError::NoTextFound);
            }
            Ok(format!("selection {}", request.generation.value()))
        }
    }

    fn request(generation: u64) -> RecognitionRequest {
        RecognitionRequest {
            generation: Generation::new(generation),
            region: BoundingBox {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 10.0,
                max_y: 10.0,
            },
            normalized_region: (0.0, 0.0, 0.0125, 0.0167),
            canvas_size: (800.0, 600.0),
            snapshot: Canvas::default().snapshot(),
            settings: RecognitionSettings::standard(),
        }
    }

    #[test]
    fn test_worker_tags_responses() {
        let worker = RecognitionWorker::spawn(EchoRecognizer).unwrap();
        assert_eq!(worker.name(), "echo");

        worker.submit(request(4)).unwrap();
        worker.submit(request(5)).unwrap();

        let first = worker
            .recv_timeout(Duration::from_secs(5))
            .unwrap()
            .unwrap();
        let second = worker
            .recv_timeout(Duration::from_secs(5))
            .unwrap()
            .unwrap();

        assert_eq!(first.generation, Generation::new(4));
        assert_eq!(first.result, Err(RecognitionError::NoTextFound));
        assert_eq!(second.generation, Generation::new(5));
    }

    #[test]
    fn test_try_recv_empty() {
        let worker = RecognitionWorker::spawn(EchoRecognizer).unwrap();
        assert!(worker.try_recv().is_none());
    }

    #[test]
    fn test_submit_after_shutdown() {
        let mut worker = RecognitionWorker::spawn(EchoRecognizer).unwrap();
        worker.shutdown();
        worker.shutdown();

        assert_eq!(worker.submit(request(1)), Err(CanvasError::WorkerUnavailable));
        assert_eq!(
            worker.recv_timeout(Duration::from_millis(10)),
            Err(CanvasError::WorkerUnavailable)
        );
    }
}
