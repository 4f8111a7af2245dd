use thiserror::Error;

/// Tips shown to the user when every still-image decode strategy failed
pub const REMEDIATION_HINTS: [&str; 5] = [
    "Ensure the barcode is clearly visible",
    "Try a higher resolution image",
    "Make sure the image is well-lit and in focus",
    "Avoid glare or reflections on the barcode",
    "Reduce rotation so the barcode lies roughly horizontal",
];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("All decode attempts failed ({attempts} strategies tried)")]
    DecodeExhausted { attempts: usize },

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("No barcode visible in this frame")]
    NoBarcodeThisFrame,

    #[error("Frame capture failed: {0}")]
    CaptureFailed(String),

    #[error("Not an image: {mime_type}")]
    NotAnImage { mime_type: String },

    #[error("File size too large: {size} bytes (max {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ScanError {
    /// User-facing hints for recovering from a failed still-image scan
    pub fn remediation_hints(&self) -> &'static [&'static str] {
        match self {
            ScanError::DecodeExhausted { .. } => &REMEDIATION_HINTS,
            _ => &[],
        }
    }

    /// True for failures scoped to a single decode attempt
    pub fn is_attempt_local(&self) -> bool {
        matches!(
            self,
            ScanError::NoBarcodeThisFrame | ScanError::Decoder(_) | ScanError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
