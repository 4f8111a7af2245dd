//! Scripted capability fakes shared by unit tests.

use crate::error::{Result, ScanError};
use crate::models::config::FacingMode;
use crate::models::frame::{Canvas, PixelBuffer, VideoFrame};
use crate::services::camera::{Camera, VideoStream};
use crate::services::decoder::{BarcodeDecoder, DecodeStrategy};
use async_trait::async_trait;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn blank_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
}

/// Decoder that replays scripted answers; `None` entries fail
#[derive(Default)]
pub struct ScriptedDecoder {
    still: Mutex<VecDeque<Option<String>>>,
    live: Mutex<VecDeque<Option<String>>>,
    calls: Mutex<Vec<DecodeStrategy>>,
    dimensions: Mutex<Vec<(u32, u32)>>,
    live_calls: AtomicUsize,
    live_delay: Option<Duration>,
}

impl ScriptedDecoder {
    pub fn still(script: Vec<Option<&str>>) -> Self {
        Self {
            still: Mutex::new(script.into_iter().map(|s| s.map(String::from)).collect()),
            ..Self::default()
        }
    }

    /// Live answers in order; once exhausted every frame has no barcode
    pub fn live(script: Vec<Option<&str>>) -> Self {
        Self {
            live: Mutex::new(script.into_iter().map(|s| s.map(String::from)).collect()),
            ..Self::default()
        }
    }

    pub fn with_live_delay(mut self, delay: Duration) -> Self {
        self.live_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<DecodeStrategy> {
        self.calls.lock().clone()
    }

    pub fn seen_dimensions(&self) -> Vec<(u32, u32)> {
        self.dimensions.lock().clone()
    }

    pub fn live_calls(&self) -> usize {
        self.live_calls.load(Ordering::SeqCst)
    }

    fn next_still(&self, strategy: DecodeStrategy, dims: (u32, u32)) -> Result<String> {
        self.calls.lock().push(strategy);
        self.dimensions.lock().push(dims);
        match self.still.lock().pop_front().flatten() {
            Some(text) => Ok(text),
            None => Err(ScanError::Decoder(format!("{} found no barcode", strategy))),
        }
    }
}

#[async_trait]
impl BarcodeDecoder for ScriptedDecoder {
    async fn decode_from_image(&self, image: &DynamicImage) -> Result<String> {
        self.next_still(DecodeStrategy::Image, image.dimensions())
    }

    async fn decode_from_pixel_buffer(&self, buffer: &PixelBuffer) -> Result<String> {
        self.next_still(DecodeStrategy::PixelBuffer, (buffer.width, buffer.height))
    }

    async fn decode_from_canvas(&self, canvas: &Canvas) -> Result<String> {
        self.next_still(DecodeStrategy::Canvas, (canvas.width(), canvas.height()))
    }

    async fn decode_from_live_frame(&self, _frame: &VideoFrame) -> Result<String> {
        self.live_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.live_delay {
            tokio::time::sleep(delay).await;
        }
        match self.live.lock().pop_front().flatten() {
            Some(text) => Ok(text),
            None => Err(ScanError::NoBarcodeThisFrame),
        }
    }
}

/// Camera that counts acquisitions and streams still holding tracks
#[derive(Default)]
pub struct CountingCamera {
    pub acquisitions: Arc<AtomicUsize>,
    pub active_streams: Arc<AtomicUsize>,
    deny: bool,
    blank_frames: bool,
    empty_frames: bool,
}

impl CountingCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::default()
        }
    }

    /// Streams that never present a frame
    pub fn without_frames() -> Self {
        Self {
            blank_frames: true,
            ..Self::default()
        }
    }

    /// Streams whose frames have zero size, so capture fails
    pub fn with_empty_frames() -> Self {
        Self {
            empty_frames: true,
            ..Self::default()
        }
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn active_streams(&self) -> usize {
        self.active_streams.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Camera for CountingCamera {
    async fn acquire(&self, _facing: FacingMode) -> Result<Box<dyn VideoStream>> {
        if self.deny {
            return Err(ScanError::CameraUnavailable("permission denied".to_string()));
        }
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        self.active_streams.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingStream {
            active_streams: Arc::clone(&self.active_streams),
            live: true,
            has_frames: !self.blank_frames,
            frame_size: if self.empty_frames { (0, 0) } else { (64, 48) },
        }))
    }
}

struct CountingStream {
    active_streams: Arc<AtomicUsize>,
    live: bool,
    has_frames: bool,
    frame_size: (u32, u32),
}

impl VideoStream for CountingStream {
    fn current_frame(&self) -> Option<VideoFrame> {
        if self.live && self.has_frames {
            let (width, height) = self.frame_size;
            Some(VideoFrame::new(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))))
        } else {
            None
        }
    }

    fn stop_tracks(&mut self) {
        if self.live {
            self.live = false;
            self.active_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
