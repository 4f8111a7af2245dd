use crate::models::capture::CaptureArtifact;
use crate::models::record::ScanOutcome;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;

/// Human-readable progress line for the user-facing activity log
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogLine {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Receiver for everything the pipeline shows the user
pub trait UiSink: Send + Sync {
    fn show_record(&self, outcome: &ScanOutcome);

    fn log(&self, line: &LogLine);

    fn offer_artifact(&self, artifact: &CaptureArtifact);

    fn say(&self, message: &str) {
        self.log(&LogLine::now(message));
    }
}

/// Terminal sink: records to stdout as pretty JSON, progress lines to stderr
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl UiSink for ConsoleSink {
    fn show_record(&self, outcome: &ScanOutcome) {
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("failed to render record: {}", e),
        }
    }

    fn log(&self, line: &LogLine) {
        let _ = writeln!(std::io::stderr(), "{}", line);
    }

    fn offer_artifact(&self, artifact: &CaptureArtifact) {
        let _ = writeln!(std::io::stderr(), "{}", artifact_notice(artifact));
    }
}

/// One-line description of a captured frame and where to find it
pub fn artifact_notice(artifact: &CaptureArtifact) -> String {
    let location = match &artifact.saved_path {
        Some(path) => format!("saved to {}", path.display()),
        None => "in memory only (set capture.output_dir to keep it)".to_string(),
    };
    format!(
        "Captured frame {} ({}x{}, {} bytes) {}",
        artifact.file_name,
        artifact.width,
        artifact.height,
        artifact.bytes.len(),
        location
    )
}

/// Sink that keeps everything in memory; handy for embedding and tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<ScanOutcome>>,
    lines: Mutex<Vec<String>>,
    artifacts: Mutex<Vec<CaptureArtifact>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ScanOutcome> {
        self.records.lock().clone()
    }

    /// Logged messages without timestamps
    pub fn messages(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn artifacts(&self) -> Vec<CaptureArtifact> {
        self.artifacts.lock().clone()
    }
}

impl UiSink for RecordingSink {
    fn show_record(&self, outcome: &ScanOutcome) {
        self.records.lock().push(outcome.clone());
    }

    fn log(&self, line: &LogLine) {
        self.lines.lock().push(line.message.clone());
    }

    fn offer_artifact(&self, artifact: &CaptureArtifact) {
        self.artifacts.lock().push(artifact.clone());
    }
}
