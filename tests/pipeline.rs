use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use license_scanner_lib::error::{Result, ScanError};
use license_scanner_lib::models::config::{CaptureConfig, ScannerConfig, UploadConfig};
use license_scanner_lib::models::frame::{Canvas, ImageInput, PixelBuffer, VideoFrame};
use license_scanner_lib::models::record::RawPayload;
use license_scanner_lib::models::{CaptureArtifact, CountryProfile};
use license_scanner_lib::services::{
    BarcodeDecoder, DecodeChain, FrameCapture, HttpDecoder, ProfileRegistry, RecordingSink,
    ReplayCamera, ScanLoop, ScanSession, UploadScanner,
};
use std::sync::Arc;
use std::time::Duration;

const CANADIAN_PAYLOAD: &str = "@\n\rPCCA 636012\nDCSDOE\nDCTJOHN\nDBB01011990\nDAQ123456789";

/// Decodes red frames only; every still representation goes to the pixel buffer path
struct RedFrameDecoder;

fn is_red(image: &RgbaImage) -> bool {
    image.get_pixel(0, 0) == &Rgba([255, 0, 0, 255])
}

#[async_trait]
impl BarcodeDecoder for RedFrameDecoder {
    async fn decode_from_image(&self, _image: &DynamicImage) -> Result<String> {
        Err(ScanError::Decoder("direct decode unsupported".to_string()))
    }

    async fn decode_from_pixel_buffer(&self, buffer: &PixelBuffer) -> Result<String> {
        match buffer.to_image() {
            Some(image) if is_red(&image) => Ok(CANADIAN_PAYLOAD.to_string()),
            _ => Err(ScanError::NoBarcodeThisFrame),
        }
    }

    async fn decode_from_canvas(&self, _canvas: &Canvas) -> Result<String> {
        Err(ScanError::NoBarcodeThisFrame)
    }

    async fn decode_from_live_frame(&self, frame: &VideoFrame) -> Result<String> {
        if is_red(&frame.image) {
            Ok(CANADIAN_PAYLOAD.to_string())
        } else {
            Err(ScanError::NoBarcodeThisFrame)
        }
    }
}

fn session() -> (Arc<ScanSession>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let session = Arc::new(ScanSession::new(
        Arc::new(ProfileRegistry::builtin()),
        "USA",
        sink.clone(),
    ));
    (session, sink)
}

fn solid(color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(32, 16, Rgba(color))
}

fn png(image: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn test_payload_detects_and_parses() {
    let (session, sink) = session();
    let payload = RawPayload::new(CANADIAN_PAYLOAD).unwrap();

    let outcome = session.handle_payload(&payload).unwrap();

    assert_eq!(outcome.region, "CAN");
    assert!(outcome.detected);
    assert_eq!(outcome.record.get("Last Name"), Some("DOE"));
    assert_eq!(outcome.record.get("First Name"), Some("JOHN"));
    assert_eq!(outcome.record.get("Date of Birth"), Some("01011990"));
    assert_eq!(session.active_region(), "CAN");
    assert!(sink.messages().contains(&"Detected CAN format".to_string()));
}

#[test]
fn test_custom_region_is_detected_after_builtins() {
    let registry = ProfileRegistry::with_custom(&[CountryProfile::new(
        "NZL",
        "New Zealand",
        "NZDL",
        &[("DCS", "Surname")],
    )])
    .unwrap();
    assert_eq!(registry.list_regions().last(), Some(&"NZL"));

    let sink = Arc::new(RecordingSink::new());
    let session = ScanSession::new(Arc::new(registry), "USA", sink);
    let outcome = session
        .process_payload(&RawPayload::new("NZDL\nDCSSMITH").unwrap())
        .unwrap();

    assert_eq!(outcome.region, "NZL");
    assert_eq!(outcome.record.get("Surname"), Some("SMITH"));
}

#[tokio::test]
async fn test_upload_falls_back_to_pixel_buffer() {
    let (session, sink) = session();
    let scanner = UploadScanner::new(
        DecodeChain::new(Arc::new(RedFrameDecoder)),
        session,
        &UploadConfig::default(),
    );
    let input = ImageInput::new("front.png", "image/png", png(solid([255, 0, 0, 255])));

    let outcome = scanner.scan(&input).await.unwrap();

    assert_eq!(outcome.region, "CAN");
    assert_eq!(sink.records().len(), 1);
    assert!(sink
        .messages()
        .contains(&"First attempt failed, trying alternative method...".to_string()));
}

#[tokio::test]
async fn test_live_loop_captures_and_parses_first_hit() {
    let (session, sink) = session();
    let camera = ReplayCamera::new(
        vec![solid([0, 0, 0, 255]), solid([255, 0, 0, 255])],
        Duration::from_millis(20),
    );
    let capture = Arc::new(FrameCapture::new(CaptureConfig::default()));
    let scan_loop = ScanLoop::new(
        Arc::new(camera),
        Arc::new(RedFrameDecoder),
        Arc::clone(&session),
        Arc::clone(&capture),
        ScannerConfig {
            scan_interval_ms: 5,
            stop_on_success: true,
            ..ScannerConfig::default()
        },
    );

    scan_loop.start().await.unwrap();
    for _ in 0..200 {
        if !scan_loop.is_scanning() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    scan_loop.stop().await;

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record.get("Last Name"), Some("DOE"));

    let artifacts: Vec<CaptureArtifact> = sink.artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!((artifacts[0].width, artifacts[0].height), (32, 16));
    assert!(capture.store().get(&artifacts[0].file_name).is_some());

    let messages = sink.messages();
    let detected = messages
        .iter()
        .position(|m| m == "Barcode detected from camera")
        .unwrap();
    let captured = messages
        .iter()
        .position(|m| m == "Frame captured and saved")
        .unwrap();
    let parsed = messages
        .iter()
        .position(|m| m.starts_with("Raw data received"))
        .unwrap();
    assert!(detected < captured && captured < parsed);
}

mod http {
    use super::*;
    use license_scanner_lib::models::config::DecoderConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_upload_through_decode_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/decode"))
            .and(body_partial_json(serde_json::json!({ "representation": "image" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "text": "ANSI 636000\nDCSROE\nDCTJANE" })),
            )
            .mount(&server)
            .await;

        let decoder = HttpDecoder::new(&DecoderConfig {
            base_url: server.uri(),
            timeout_secs: 2,
        })
        .unwrap();
        let (session, sink) = session();
        let scanner = UploadScanner::new(
            DecodeChain::new(Arc::new(decoder)),
            session,
            &UploadConfig::default(),
        );

        let input = ImageInput::new("back.png", "image/png", png(solid([0, 0, 0, 255])));
        let outcome = scanner.scan(&input).await.unwrap();

        assert_eq!(outcome.region, "USA");
        assert_eq!(outcome.record.get("First Name"), Some("JANE"));
        assert_eq!(sink.records().len(), 1);
    }
}
