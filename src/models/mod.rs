pub mod capture;
pub mod config;
pub mod frame;
pub mod profile;
pub mod record;

pub use capture::CaptureArtifact;
pub use config::{AppConfig, FacingMode};
pub use frame::{Canvas, ImageInput, PixelBuffer, VideoFrame};
pub use profile::CountryProfile;
pub use record::{ParsedRecord, RawPayload, ScanOutcome, Segment};
