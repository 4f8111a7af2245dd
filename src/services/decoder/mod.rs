//! Optical decoder capability and the still-image decode chain.
//!
//! The decoder itself is external: it accepts one of several visual
//! representations and returns decoded text or fails. Failure reasons are
//! opaque to the pipeline.

pub mod chain;
pub mod http;

use crate::error::Result;
use crate::models::frame::{Canvas, PixelBuffer, VideoFrame};
use async_trait::async_trait;
use image::DynamicImage;

pub use chain::{DecodeChain, DecodeStrategy, DecodedImage};
pub use http::HttpDecoder;

/// PDF417 decoder capability
#[async_trait]
pub trait BarcodeDecoder: Send + Sync {
    /// Decode directly from a loaded bitmap
    async fn decode_from_image(&self, image: &DynamicImage) -> Result<String>;

    /// Decode from raw pixels read back from an off-screen canvas
    async fn decode_from_pixel_buffer(&self, buffer: &PixelBuffer) -> Result<String>;

    /// Decode from the canvas surface itself
    async fn decode_from_canvas(&self, canvas: &Canvas) -> Result<String>;

    /// Decode from the frame a live video stream is currently showing
    async fn decode_from_live_frame(&self, frame: &VideoFrame) -> Result<String>;
}
