use crate::error::{Result, ScanError};
use crate::models::config::UploadConfig;
use crate::models::frame::ImageInput;
use crate::models::record::ScanOutcome;
use crate::services::decoder::{DecodeChain, DecodeStrategy};
use crate::services::session::ScanSession;
use image::GenericImageView;
use std::sync::Arc;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Still-image acquisition: admission, decode chain, then parsing
pub struct UploadScanner {
    chain: DecodeChain,
    session: Arc<ScanSession>,
    max_bytes: u64,
}

impl UploadScanner {
    pub fn new(chain: DecodeChain, session: Arc<ScanSession>, config: &UploadConfig) -> Self {
        Self {
            chain,
            session,
            max_bytes: config.max_bytes,
        }
    }

    pub fn session(&self) -> &Arc<ScanSession> {
        &self.session
    }

    /// Reject anything that is not an image or is over the size limit
    pub fn admit(&self, input: &ImageInput) -> Result<()> {
        if !input.is_image() {
            return Err(ScanError::NotAnImage {
                mime_type: input.mime_type.clone(),
            });
        }
        if input.size() > self.max_bytes {
            return Err(ScanError::FileTooLarge {
                size: input.size(),
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    pub async fn scan(&self, input: &ImageInput) -> Result<ScanOutcome> {
        let sink = self.session.sink();
        sink.say(&format!("Processing file: {}", input.name));

        if let Err(e) = self.admit(input) {
            tracing::warn!(file = %input.name, error = %e, "upload rejected");
            match &e {
                ScanError::NotAnImage { .. } => sink.say("Error: Please upload an image file"),
                ScanError::FileTooLarge { max, .. } => sink.say(&format!(
                    "Error: File size too large (max {}MB)",
                    max / BYTES_PER_MB
                )),
                _ => {}
            }
            return Err(e);
        }

        sink.say("Loading image...");
        let image = match image::load_from_memory(&input.bytes) {
            Ok(image) => image,
            Err(e) => {
                let err = ScanError::from(e);
                sink.say(&format!("Error processing image: {}", err));
                return Err(err);
            }
        };

        let (width, height) = image.dimensions();
        sink.say(&format!("Scanning image ({}x{})...", width, height));

        let strategies = self.chain.strategies();
        let decoded = self
            .chain
            .decode_image_with(&image, |attempt, _, _| {
                if let Some(&next) = strategies.get(attempt) {
                    sink.say(&retry_message(attempt, next));
                }
            })
            .await;

        let decoded = match decoded {
            Ok(decoded) => decoded,
            Err(e) => {
                sink.say(&format!("Error processing image: {}", e));
                let hints = e.remediation_hints();
                if !hints.is_empty() {
                    sink.say("Tips for better scanning:");
                    for (i, hint) in hints.iter().enumerate() {
                        sink.say(&format!("{}. {}", i + 1, hint));
                    }
                }
                return Err(e);
            }
        };

        tracing::info!(
            file = %input.name,
            strategy = %decoded.strategy,
            attempts = decoded.attempts,
            "upload decoded"
        );
        sink.say("Barcode detected and decoded successfully");

        self.session.handle_payload(&decoded.payload)
    }
}

fn retry_message(failed_attempt: usize, next: DecodeStrategy) -> String {
    let ordinal = match failed_attempt {
        1 => "First".to_string(),
        2 => "Second".to_string(),
        3 => "Third".to_string(),
        n => format!("Attempt {}", n),
    };
    let action = match next {
        DecodeStrategy::Image => "trying direct image...",
        DecodeStrategy::PixelBuffer => "trying alternative method...",
        DecodeStrategy::Canvas => "trying with canvas...",
    };
    format!("{} attempt failed, {}", ordinal, action)
}
