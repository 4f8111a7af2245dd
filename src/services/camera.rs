use crate::error::{Result, ScanError};
use crate::models::config::FacingMode;
use crate::models::frame::VideoFrame;
use async_trait::async_trait;
use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of live video streams
#[async_trait]
pub trait Camera: Send + Sync {
    /// Acquire a stream, preferring the given facing. Fails with `CameraUnavailable`
    /// when access is denied or unsupported.
    async fn acquire(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>>;
}

/// An acquired stream. Holding it keeps the camera busy until `stop_tracks`.
pub trait VideoStream: Send + Sync {
    /// Frame currently being presented, if any
    fn current_frame(&self) -> Option<VideoFrame>;

    /// Halt every underlying media track
    fn stop_tracks(&mut self);

    fn is_live(&self) -> bool;
}

/// Camera that plays back a fixed list of frames in a loop
#[derive(Clone)]
pub struct ReplayCamera {
    frames: Arc<Vec<RgbaImage>>,
    frame_period: Duration,
}

impl ReplayCamera {
    pub fn new(frames: Vec<RgbaImage>, frame_period: Duration) -> Self {
        Self {
            frames: Arc::new(frames),
            frame_period,
        }
    }

    /// Load every readable image in `dir`, ordered by file name
    pub fn from_dir(dir: &Path, frame_period: Duration) -> Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            match image::open(&path) {
                Ok(img) => frames.push(img.to_rgba8()),
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping non-image file"),
            }
        }

        tracing::info!(dir = %dir.display(), frames = frames.len(), "replay camera loaded");
        Ok(Self::new(frames, frame_period))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl Camera for ReplayCamera {
    async fn acquire(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>> {
        if self.frames.is_empty() {
            return Err(ScanError::CameraUnavailable(
                "replay source has no frames".to_string(),
            ));
        }

        tracing::debug!(?facing, "replay stream acquired");
        Ok(Box::new(ReplayStream {
            frames: Arc::clone(&self.frames),
            frame_period: self.frame_period,
            started: Instant::now(),
            live: true,
        }))
    }
}

struct ReplayStream {
    frames: Arc<Vec<RgbaImage>>,
    frame_period: Duration,
    started: Instant,
    live: bool,
}

impl ReplayStream {
    fn frame_index(&self) -> usize {
        let period = self.frame_period.as_millis().max(1);
        let elapsed = self.started.elapsed().as_millis();
        ((elapsed / period) as usize) % self.frames.len()
    }
}

impl VideoStream for ReplayStream {
    fn current_frame(&self) -> Option<VideoFrame> {
        if !self.live {
            return None;
        }
        self.frames
            .get(self.frame_index())
            .map(|image| VideoFrame::new(image.clone()))
    }

    fn stop_tracks(&mut self) {
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
