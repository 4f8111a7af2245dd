use super::AppContext;
use crate::models::frame::ImageInput;
use crate::services::decoder::{DecodeChain, HttpDecoder};
use crate::services::upload::UploadScanner;
use anyhow::Context;
use image::ImageFormat;
use std::path::Path;
use std::sync::Arc;

/// Run a still image through admission, the decode chain and parsing
pub async fn run(ctx: &AppContext, path: &Path, region: Option<&str>) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let input = ImageInput::new(
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        mime_type_for(path),
        bytes,
    );

    let decoder = Arc::new(HttpDecoder::new(&ctx.config.decoder)?);
    let session = ctx.session(region)?;
    let scanner = UploadScanner::new(DecodeChain::new(decoder), session, &ctx.config.upload);

    scanner.scan(&input).await?;
    Ok(())
}

/// MIME type from the file extension, as a browser file picker would report it
pub fn mime_type_for(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("front.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("back.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("notes.txt")), "application/octet-stream");
    }
}
