use crate::models::profile::CountryProfile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which camera to prefer when acquiring a live stream
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear-facing camera
    Environment,
    User,
}

impl Default for FacingMode {
    fn default() -> Self {
        Self::Environment
    }
}

/// Live scan loop configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScannerConfig {
    /// Delay between loop iterations in milliseconds (0 = yield only)
    pub scan_interval_ms: u64,
    /// Stop the loop after the first successful decode
    pub stop_on_success: bool,
    pub facing: FacingMode,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: 16,
            stop_on_success: false,
            facing: FacingMode::Environment,
        }
    }
}

/// Frame capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub enabled: bool,
    pub jpeg_quality: u8,
    /// Seconds an artifact stays available before it is released
    pub release_after_secs: u64,
    /// Also write artifacts here when set
    pub output_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jpeg_quality: 95,
            release_after_secs: 60,
            output_dir: None,
        }
    }
}

/// Still-image admission policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

/// External decode service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecoderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:39836".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Region selection and additional profiles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegionConfig {
    pub default_region: String,
    /// Registered after the built-in regions, in this order
    pub custom_profiles: Vec<CountryProfile>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            default_region: "USA".to_string(),
            custom_profiles: Vec::new(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub scanner: ScannerConfig,
    pub capture: CaptureConfig,
    pub upload: UploadConfig,
    pub decoder: DecoderConfig,
    pub regions: RegionConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.capture.jpeg_quality == 0 || self.capture.jpeg_quality > 100 {
            return Err(format!(
                "JPEG quality must be 1-100, got {}",
                self.capture.jpeg_quality
            ));
        }

        if self.upload.max_bytes == 0 {
            return Err("Upload size ceiling must be positive".to_string());
        }

        if self.decoder.base_url.trim().is_empty() {
            return Err("Decoder base URL is empty".to_string());
        }

        Ok(())
    }
}
