use super::BarcodeDecoder;
use crate::error::{Result, ScanError};
use crate::models::config::DecoderConfig;
use crate::models::frame::{Canvas, PixelBuffer, VideoFrame};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decoder backed by an external PDF417 decode service
#[derive(Clone)]
pub struct HttpDecoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct DecodeRequest<'a> {
    representation: &'a str,
    image_base64: String,
}

#[derive(Deserialize)]
struct DecodeResponse {
    #[serde(default)]
    text: Option<String>,
}

impl HttpDecoder {
    pub fn new(config: &DecoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the decode service is reachable
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        self.client.get(&url).send().await?.error_for_status()?;
        Ok(())
    }

    /// Encode image to base64 PNG
    fn encode_image(image: &DynamicImage) -> Result<String> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
            .map_err(|e| ScanError::Decoder(format!("Failed to encode image: {}", e)))?;
        Ok(general_purpose::STANDARD.encode(&buffer))
    }

    async fn decode(&self, representation: &str, image: &DynamicImage) -> Result<String> {
        let image_base64 = Self::encode_image(image)?;
        let url = format!("{}/decode", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&DecodeRequest {
                representation,
                image_base64,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ScanError::Decoder(format!(
                "decode service returned {}: {}",
                status, error_text
            )));
        }

        let data: DecodeResponse = response.json().await?;
        match data.text {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(ScanError::NoBarcodeThisFrame),
        }
    }
}

#[async_trait]
impl BarcodeDecoder for HttpDecoder {
    async fn decode_from_image(&self, image: &DynamicImage) -> Result<String> {
        self.decode("image", image).await
    }

    async fn decode_from_pixel_buffer(&self, buffer: &PixelBuffer) -> Result<String> {
        let pixels = buffer.to_image().ok_or_else(|| {
            ScanError::Decoder(format!(
                "pixel buffer does not match {}x{}",
                buffer.width, buffer.height
            ))
        })?;
        self.decode("pixels", &DynamicImage::ImageRgba8(pixels)).await
    }

    async fn decode_from_canvas(&self, canvas: &Canvas) -> Result<String> {
        let surface: RgbaImage = canvas.surface().clone();
        self.decode("canvas", &DynamicImage::ImageRgba8(surface)).await
    }

    async fn decode_from_live_frame(&self, frame: &VideoFrame) -> Result<String> {
        self.decode("live", &DynamicImage::ImageRgba8(frame.image.clone()))
            .await
    }
}
