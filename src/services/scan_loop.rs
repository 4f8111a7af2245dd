use crate::error::{Result, ScanError};
use crate::models::config::ScannerConfig;
use crate::models::record::RawPayload;
use crate::services::camera::{Camera, VideoStream};
use crate::services::decoder::BarcodeDecoder;
use crate::services::frame_capture::FrameCapture;
use crate::services::session::ScanSession;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    Idle,
    Scanning,
}

/// State shared between the controller and the running loop task
struct LoopShared {
    camera: Arc<dyn Camera>,
    decoder: Arc<dyn BarcodeDecoder>,
    session: Arc<ScanSession>,
    capture: Arc<FrameCapture>,
    config: ScannerConfig,
    /// Checked before every reschedule; clearing it is the only way to cancel
    scanning: AtomicBool,
    stream: Mutex<Option<Box<dyn VideoStream>>>,
}

/// Live scan loop over a single camera stream.
///
/// Iterations run one after another on one task, so at most one live decode
/// is ever in flight. `stop()` takes effect at the next iteration boundary.
pub struct ScanLoop {
    shared: Arc<LoopShared>,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl ScanLoop {
    pub fn new(
        camera: Arc<dyn Camera>,
        decoder: Arc<dyn BarcodeDecoder>,
        session: Arc<ScanSession>,
        capture: Arc<FrameCapture>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            shared: Arc::new(LoopShared {
                camera,
                decoder,
                session,
                capture,
                config,
                scanning: AtomicBool::new(false),
                stream: Mutex::new(None),
            }),
            task: tokio::sync::Mutex::new(None),
        }
    }

    /// Current state, read from the scheduling flag
    pub fn state(&self) -> ScanState {
        if self.shared.scanning.load(Ordering::SeqCst) {
            ScanState::Scanning
        } else {
            ScanState::Idle
        }
    }

    /// Check if a stream is attached and the loop is scheduled
    pub fn is_scanning(&self) -> bool {
        self.state() == ScanState::Scanning
    }

    /// Idle -> Scanning. Ignored when already scanning.
    ///
    /// Must not be called from inside a decode callback.
    pub async fn start(&self) -> Result<()> {
        let mut task = self.task.lock().await;

        if self.shared.scanning.load(Ordering::SeqCst) {
            tracing::debug!("already scanning, ignoring start request");
            return Ok(());
        }

        // A loop that stopped itself after a success has already released its stream
        if let Some(finished) = task.take() {
            if let Err(e) = finished.await {
                tracing::warn!("previous scan task ended abnormally: {}", e);
            }
        }

        let sink = self.shared.session.sink();
        let stream = match self.shared.camera.acquire(self.shared.config.facing).await {
            Ok(stream) => stream,
            Err(e) => {
                let err = match e {
                    ScanError::CameraUnavailable(_) => e,
                    other => ScanError::CameraUnavailable(other.to_string()),
                };
                tracing::error!("error starting camera: {}", err);
                sink.say(&format!("Error starting camera: {}", err));
                return Err(err);
            }
        };

        *self.shared.stream.lock() = Some(stream);
        self.shared.scanning.store(true, Ordering::SeqCst);
        tracing::info!(facing = ?self.shared.config.facing, "camera started");
        sink.say("Camera started successfully");

        let shared = Arc::clone(&self.shared);
        *task = Some(tokio::spawn(async move { shared.run().await }));
        Ok(())
    }

    /// Scanning -> Idle. Lets an in-flight decode finish, then releases the stream.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        self.shared.scanning.store(false, Ordering::SeqCst);

        if let Some(handle) = task.take() {
            if let Err(e) = handle.await {
                tracing::warn!("scan task ended abnormally: {}", e);
            }
        }

        self.shared.release_stream();
    }
}

impl LoopShared {
    async fn run(self: Arc<Self>) {
        let interval = Duration::from_millis(self.config.scan_interval_ms);

        while self.scanning.load(Ordering::SeqCst) {
            self.step().await;

            if !self.scanning.load(Ordering::SeqCst) {
                break;
            }
            if interval.is_zero() {
                tokio::task::yield_now().await;
            } else {
                sleep(interval).await;
            }
        }

        tracing::debug!("scan loop halted");
    }

    /// One decode attempt against the current frame
    async fn step(&self) {
        let Some(frame) = self.current_frame() else {
            tracing::trace!("no frame available yet");
            return;
        };

        let text = match self.decoder.decode_from_live_frame(&frame).await {
            Ok(text) => text,
            Err(e) => {
                if e.is_attempt_local() {
                    tracing::trace!("live decode miss: {}", e);
                } else {
                    tracing::debug!("live decode failed: {}", e);
                }
                return;
            }
        };

        let Some(payload) = RawPayload::new(text) else {
            return;
        };

        let sink = self.session.sink();
        tracing::info!("barcode detected from camera");
        sink.say("Barcode detected from camera");

        if self.capture.is_enabled() {
            self.capture_frame().await;
        }

        if let Err(e) = self.session.handle_payload(&payload) {
            tracing::error!("failed to process live payload: {}", e);
            sink.say(&format!("Error parsing barcode: {}", e));
        }

        if self.config.stop_on_success {
            tracing::info!("stopping after successful scan");
            self.scanning.store(false, Ordering::SeqCst);
            self.release_stream();
        }
    }

    /// Best-effort snapshot; failures are reported and never undo the decode
    async fn capture_frame(&self) {
        let sink = self.session.sink();

        let result = match self.current_frame() {
            Some(frame) => self.capture.capture(&frame).await,
            None => Err(ScanError::CaptureFailed(
                "no frame available to capture".to_string(),
            )),
        };

        match result {
            Ok(artifact) => {
                sink.offer_artifact(&artifact);
                sink.say("Frame captured and saved");
            }
            Err(e) => {
                tracing::warn!("frame capture failed: {}", e);
                sink.say(&format!("Error capturing frame: {}", e));
            }
        }
    }

    fn current_frame(&self) -> Option<crate::models::frame::VideoFrame> {
        self.stream
            .lock()
            .as_ref()
            .and_then(|stream| stream.current_frame())
    }

    fn release_stream(&self) {
        let stream = self.stream.lock().take();
        if let Some(mut stream) = stream {
            stream.stop_tracks();
            tracing::info!("camera stopped");
            self.session.sink().say("Camera stopped");
        }
    }
}
