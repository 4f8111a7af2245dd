use chrono::{DateTime, Utc};
use image::{DynamicImage, RgbaImage};
use serde::Serialize;

/// Off-screen RGBA drawing surface sized to the image drawn onto it
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    surface: RgbaImage,
}

impl Canvas {
    /// Draw an image at its natural size
    pub fn for_image(image: &DynamicImage) -> Self {
        Self {
            surface: image.to_rgba8(),
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Read back the full surface as raw pixel data
    pub fn pixel_buffer(&self) -> PixelBuffer {
        PixelBuffer {
            width: self.surface.width(),
            height: self.surface.height(),
            data: self.surface.as_raw().clone(),
        }
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }
}

/// Raw RGBA pixels, 4 bytes per pixel, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Rebuild an image view; `None` if the data does not match the dimensions
    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }
}

/// A single frame presented by a live video stream
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub image: RgbaImage,
    pub captured_at: DateTime<Utc>,
}

impl VideoFrame {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            captured_at: Utc::now(),
        }
    }

    /// Native resolution of the frame
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Image resource handed over by a file picker or drop target
#[derive(Debug, Clone, Serialize)]
pub struct ImageInput {
    pub name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ImageInput {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}
