use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use std::path::PathBuf;

/// Still snapshot of a successfully decoded live frame, offered for download
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CaptureArtifact {
    /// `barcode-scan-<unix millis>.jpg`
    pub file_name: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Where the on-disk copy was written, if one was made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_path: Option<PathBuf>,
}

impl CaptureArtifact {
    pub fn jpeg(timestamp_millis: i64, width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("barcode-scan-{}.jpg", timestamp_millis),
            mime_type: "image/jpeg".to_string(),
            width,
            height,
            bytes,
            saved_path: None,
        }
    }

    /// Inline `data:` URL for preview/download links
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_named() {
        let artifact = CaptureArtifact::jpeg(1700000000123, 640, 480, vec![0xFF, 0xD8]);
        assert_eq!(artifact.file_name, "barcode-scan-1700000000123.jpg");
        assert_eq!(artifact.mime_type, "image/jpeg");
    }

    #[test]
    fn test_data_url() {
        let artifact = CaptureArtifact::jpeg(1, 1, 1, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(artifact.data_url(), "data:image/jpeg;base64,/9j/");
    }
}
