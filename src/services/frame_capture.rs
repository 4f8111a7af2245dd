use crate::error::{Result, ScanError};
use crate::models::capture::CaptureArtifact;
use crate::models::config::CaptureConfig;
use crate::models::frame::VideoFrame;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Published artifact tagged with the publish that put it there
struct StoredArtifact {
    generation: u64,
    artifact: CaptureArtifact,
}

/// Artifacts currently offered for download; each is released after a delay
#[derive(Clone, Default)]
pub struct ArtifactStore {
    artifacts: Arc<Mutex<HashMap<String, StoredArtifact>>>,
    generation: Arc<AtomicU64>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an artifact available and schedule its release.
    ///
    /// Republishing a name restarts its lifetime; an older timer never
    /// releases a newer artifact.
    pub fn publish(&self, artifact: CaptureArtifact, release_after: Duration) {
        let name = artifact.file_name.clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst);
        self.artifacts
            .lock()
            .insert(name.clone(), StoredArtifact { generation, artifact });

        let artifacts = Arc::clone(&self.artifacts);
        tokio::spawn(async move {
            tokio::time::sleep(release_after).await;
            let mut artifacts = artifacts.lock();
            if artifacts.get(&name).map(|s| s.generation) == Some(generation) {
                artifacts.remove(&name);
                tracing::debug!(artifact = %name, "capture artifact released");
            }
        });
    }

    pub fn get(&self, file_name: &str) -> Option<CaptureArtifact> {
        self.artifacts
            .lock()
            .get(file_name)
            .map(|stored| stored.artifact.clone())
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.artifacts.lock().contains_key(file_name)
    }

    /// Release an artifact before its timer fires
    pub fn release(&self, file_name: &str) -> bool {
        self.artifacts.lock().remove(file_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.artifacts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.lock().is_empty()
    }
}

/// Snapshots live frames into downloadable JPEG artifacts
pub struct FrameCapture {
    config: CaptureConfig,
    store: ArtifactStore,
    /// Millisecond stamp of the newest artifact name handed out
    last_stamp: Mutex<i64>,
}

impl FrameCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            store: ArtifactStore::new(),
            last_stamp: Mutex::new(i64::MIN),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.config.output_dir.as_deref()
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Encode the frame at native resolution and publish it.
    ///
    /// Encoding failures come back as `CaptureFailed`. The on-disk copy is
    /// best-effort: if it cannot be written the artifact is still published
    /// with `saved_path` unset.
    pub async fn capture(&self, frame: &VideoFrame) -> Result<CaptureArtifact> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(ScanError::CaptureFailed(
                "frame has no pixels yet".to_string(),
            ));
        }

        let image = frame.image.clone();
        let quality = self.config.jpeg_quality;
        let bytes = tokio::task::spawn_blocking(move || encode_jpeg(&image, quality))
            .await
            .map_err(|e| ScanError::CaptureFailed(format!("encode task failed: {}", e)))??;

        let stamp = self.next_stamp(frame.captured_at.timestamp_millis());
        let mut artifact = CaptureArtifact::jpeg(stamp, width, height, bytes);

        if let Some(dir) = &self.config.output_dir {
            match write_copy(dir, &artifact).await {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "capture written to disk");
                    artifact.saved_path = Some(path);
                }
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "could not save capture to disk");
                }
            }
        }

        self.store.publish(
            artifact.clone(),
            Duration::from_secs(self.config.release_after_secs),
        );

        tracing::info!(
            artifact = %artifact.file_name,
            width,
            height,
            bytes = artifact.bytes.len(),
            "frame captured"
        );
        Ok(artifact)
    }

    /// Frame timestamp, bumped past the previous one so names never repeat
    fn next_stamp(&self, captured_millis: i64) -> i64 {
        let mut last = self.last_stamp.lock();
        let stamp = if captured_millis > *last {
            captured_millis
        } else {
            *last + 1
        };
        *last = stamp;
        stamp
    }
}

async fn write_copy(dir: &Path, artifact: &CaptureArtifact) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&artifact.file_name);
    tokio::fs::write(&path, &artifact.bytes).await?;
    Ok(path)
}

/// JPEG has no alpha channel, so the frame is flattened to RGB first
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(&rgb)
        .map_err(|e| ScanError::CaptureFailed(format!("Failed to encode image: {}", e)))?;
    Ok(buf)
}
