pub mod camera;
pub mod config;
pub mod decoder;
pub mod detector;
pub mod frame_capture;
pub mod parser;
pub mod registry;
pub mod scan_loop;
pub mod session;
pub mod ui_sink;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use camera::{Camera, ReplayCamera, VideoStream};
pub use config::ConfigManager;
pub use decoder::{BarcodeDecoder, DecodeChain, DecodeStrategy, HttpDecoder};
pub use frame_capture::{ArtifactStore, FrameCapture};
pub use registry::ProfileRegistry;
pub use scan_loop::{ScanLoop, ScanState};
pub use session::ScanSession;
pub use ui_sink::{ConsoleSink, LogLine, RecordingSink, UiSink};
pub use upload::UploadScanner;
