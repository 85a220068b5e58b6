//! Recognizer backed by an external program
//!
//! The request is written to the program's stdin as JSON. Whatever the
//! program prints to stdout is the recognized text. A non-zero exit status
//! is a recognition failure, with stderr as the reason.
//!
//! The request is written from its own thread while stdout and stderr are
//! drained, so a program that answers before reading all of its input
//! cannot fill a pipe and stall the worker.

use std::io::{self, ErrorKind, Write};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;
use tracing::{debug, warn};

use super::{RecognitionError, RecognitionRequest, TextRecognizer};

/// Runs an external recognizer once per request
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// Write the whole payload and close stdin
///
/// A program that ignores its input may close stdin early.
fn feed_stdin(stdin: Option<ChildStdin>, payload: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(payload) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

impl TextRecognizer for CommandRecognizer {
    fn name(&self) -> &'static str {
        "command"
    }

    fn recognize(&mut self, request: &RecognitionRequest) -> Result<String, RecognitionError> {
        let payload = serde_json::to_vec(request)
            .map_err(|_| RecognitionError::ImageProcessingFailed)?;

        debug!(
            "Running recognizer '{}' for selection {}",
            self.program, request.generation
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    warn!("Recognizer '{}' could not be started: {}", self.program, e);
                    RecognitionError::Unavailable
                }
                _ => RecognitionError::RecognitionFailed(e.to_string()),
            })?;

        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(|| feed_stdin(stdin, &payload));
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output.map_err(|e| RecognitionError::RecognitionFailed(e.to_string()))?;
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(RecognitionError::RecognitionFailed(e.to_string())),
            Err(_) => {
                return Err(RecognitionError::RecognitionFailed(
                    "request writer panicked".to_string(),
                ))
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("recognizer exited with {}", output.status)
            } else {
                stderr
            };
            return Err(RecognitionError::RecognitionFailed(reason));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(RecognitionError::NoTextFound);
        }

        Ok(text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, Generation};
    use crate::geometry::{BoundingBox, Sample};
    use crate::recognition::RecognitionSettings;

    fn request() -> RecognitionRequest {
        request_with(Canvas::default())
    }

    fn request_with(canvas: Canvas) -> RecognitionRequest {
        RecognitionRequest {
            generation: Generation::new(1),
            region: BoundingBox {
                min_x: 10.0,
                min_y: 10.0,
                max_x: 20.0,
                max_y: 20.0,
            },
            normalized_region: (0.0125, 0.0167, 0.0125, 0.0167),
            canvas_size: (800.0, 600.0),
            snapshot: canvas.snapshot(),
            settings: RecognitionSettings::standard(),
        }
    }

    fn sh(script: &str) -> CommandRecognizer {
        CommandRecognizer::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn test_stdout_is_recognized_text() {
        let mut recognizer = sh("cat > /dev/null; echo '  hello world  '");
        assert_eq!(recognizer.recognize(&request()), Ok("hello world".to_string()));
    }

    #[test]
    fn test_request_is_sent_as_json() {
        let mut recognizer = sh("grep -o '\"generation\":1' | head -n 1");
        assert_eq!(
            recognizer.recognize(&request()),
            Ok("\"generation\":1".to_string())
        );
    }

    #[test]
    fn test_empty_output_is_no_text() {
        let mut recognizer = sh("cat > /dev/null");
        assert_eq!(recognizer.recognize(&request()), Err(RecognitionError::NoTextFound));
    }

    #[test]
    fn test_failure_reports_stderr() {
        let mut recognizer = sh("cat > /dev/null; echo 'model missing' >&2; exit 3");
        assert_eq!(
            recognizer.recognize(&request()),
            Err(RecognitionError::RecognitionFailed("model missing".to_string()))
        );
    }

    #[test]
    fn test_large_request_echoed_back() {
        let mut canvas = Canvas::default();
        canvas.begin(Sample::at(0.0, 0.0)).unwrap();
        for i in 1..=20_000 {
            canvas.extend(Sample::at(i as f64 * 0.01, 5.0)).unwrap();
        }
        canvas.end().unwrap();

        let request = request_with(canvas);
        let payload = serde_json::to_string(&request).unwrap();
        assert!(payload.len() > 256 * 1024);

        let mut recognizer = CommandRecognizer::new("cat", Vec::new());
        assert_eq!(recognizer.recognize(&request), Ok(payload));
    }

    #[test]
    fn test_program_answering_before_reading_input() {
        let mut canvas = Canvas::default();
        canvas.begin(Sample::at(0.0, 0.0)).unwrap();
        for i in 1..=20_000 {
            canvas.extend(Sample::at(i as f64, i as f64)).unwrap();
        }
        canvas.end().unwrap();

        let mut recognizer = sh("head -c 200000 /dev/zero | tr '\\0' x; cat > /dev/null");
        let text = recognizer.recognize(&request_with(canvas)).unwrap();
        assert_eq!(text.len(), 200_000);
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let mut recognizer = CommandRecognizer::new("/nonexistent/recognizer", Vec::new());
        assert_eq!(recognizer.recognize(&request()), Err(RecognitionError::Unavailable));
    }
}
