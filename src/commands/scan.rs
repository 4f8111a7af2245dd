use super::AppContext;
use crate::models::config::CaptureConfig;
use crate::services::camera::{Camera, ReplayCamera};
use crate::services::decoder::{BarcodeDecoder, HttpDecoder};
use crate::services::frame_capture::FrameCapture;
use crate::services::scan_loop::ScanLoop;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Used when neither `--captures` nor `capture.output_dir` is set
pub const DEFAULT_CAPTURE_DIR: &str = "captures";

pub struct ScanArgs {
    pub frames: PathBuf,
    pub duration_secs: u64,
    pub frame_period_ms: u64,
    pub captures: Option<PathBuf>,
    pub region: Option<String>,
}

/// Run the live loop over recorded frames with the HTTP decoder
pub async fn run(ctx: &AppContext, args: ScanArgs) -> anyhow::Result<()> {
    let camera = ReplayCamera::from_dir(&args.frames, Duration::from_millis(args.frame_period_ms))?;
    let decoder = HttpDecoder::new(&ctx.config.decoder)?;
    if let Err(e) = decoder.health_check().await {
        tracing::warn!(url = decoder.base_url(), "decode service health check failed: {}", e);
    }

    drive(
        ctx,
        Arc::new(camera),
        Arc::new(decoder),
        capture_config(&ctx.config.capture, args.captures),
        args.region.as_deref(),
        Duration::from_secs(args.duration_secs),
    )
    .await
}

/// The terminal has no download link, so captures always get a directory
pub fn capture_config(config: &CaptureConfig, captures: Option<PathBuf>) -> CaptureConfig {
    let output_dir = captures
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CAPTURE_DIR));

    CaptureConfig {
        output_dir: Some(output_dir),
        ..config.clone()
    }
}

/// Scan until the time limit, Ctrl-C, or the loop stopping itself
pub async fn drive(
    ctx: &AppContext,
    camera: Arc<dyn Camera>,
    decoder: Arc<dyn BarcodeDecoder>,
    capture: CaptureConfig,
    region: Option<&str>,
    duration: Duration,
) -> anyhow::Result<()> {
    let session = ctx.session(region)?;
    let capture = Arc::new(FrameCapture::new(capture));
    let scan_loop = ScanLoop::new(
        camera,
        decoder,
        Arc::clone(&session),
        Arc::clone(&capture),
        ctx.config.scanner.clone(),
    );

    scan_loop.start().await?;

    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);
    let mut poll = tokio::time::interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            _ = &mut deadline => {
                tracing::info!("scan duration elapsed");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
            _ = poll.tick() => {
                if !scan_loop.is_scanning() {
                    break;
                }
            }
        }
    }

    scan_loop.stop().await;
    tracing::info!(
        region = %session.active_region(),
        captures = ?capture.output_dir(),
        "scan finished"
    );
    Ok(())
}
