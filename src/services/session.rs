use crate::error::Result;
use crate::models::record::{RawPayload, ScanOutcome};
use crate::services::detector::detect;
use crate::services::parser::parse;
use crate::services::registry::{ProfileRegistry, DEFAULT_REGION};
use crate::services::ui_sink::UiSink;
use parking_lot::RwLock;
use std::sync::Arc;

/// Characters of raw payload echoed to the activity log
const RAW_PREVIEW_CHARS: usize = 50;

/// Owns the active region selection shared by both acquisition paths.
///
/// Only detection and explicit user selection write the region. A payload is
/// always parsed against the region that is active once detection for that
/// payload has run; later changes never touch completed records.
pub struct ScanSession {
    registry: Arc<ProfileRegistry>,
    active_region: RwLock<String>,
    sink: Arc<dyn UiSink>,
}

impl ScanSession {
    /// Start with `default_region`, or `USA` (then the first registered region) if unknown
    pub fn new(registry: Arc<ProfileRegistry>, default_region: &str, sink: Arc<dyn UiSink>) -> Self {
        let initial = if registry.contains(default_region) {
            default_region.to_string()
        } else {
            let fallback = if registry.contains(DEFAULT_REGION) {
                DEFAULT_REGION
            } else {
                registry.list_regions().first().copied().unwrap_or(DEFAULT_REGION)
            };
            tracing::warn!(
                requested = default_region,
                fallback,
                "default region not registered, falling back"
            );
            fallback.to_string()
        };

        Self {
            registry,
            active_region: RwLock::new(initial),
            sink,
        }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &Arc<dyn UiSink> {
        &self.sink
    }

    pub fn active_region(&self) -> String {
        self.active_region.read().clone()
    }

    /// Manual override from the region selector; applies to the next payload
    pub fn select_region(&self, region: &str) -> Result<()> {
        self.registry.get_profile(region)?;
        *self.active_region.write() = region.to_string();
        tracing::info!(region, "region selected by user");
        self.sink.say(&format!("Switched to {} format", region));
        Ok(())
    }

    /// Detect, update the active region on a hit, then parse
    pub fn process_payload(&self, raw: &RawPayload) -> Result<ScanOutcome> {
        let detected = detect(raw.as_str(), &self.registry);

        let region = {
            let mut active = self.active_region.write();
            if let Some(code) = detected {
                *active = code.to_string();
            }
            active.clone()
        };

        let profile = self.registry.get_profile(&region)?;
        let record = parse(raw.as_str(), profile);

        tracing::debug!(
            region = %region,
            detected = detected.is_some(),
            fields = record.len(),
            "payload parsed"
        );

        Ok(ScanOutcome {
            region,
            detected: detected.is_some(),
            record,
        })
    }

    /// Process a payload and report progress and the record to the UI sink
    pub fn handle_payload(&self, raw: &RawPayload) -> Result<ScanOutcome> {
        self.sink.say(&format!(
            "Raw data received: {}...",
            raw.preview(RAW_PREVIEW_CHARS)
        ));

        let outcome = self.process_payload(raw)?;

        if outcome.detected {
            tracing::info!(region = %outcome.region, "detected region format");
            self.sink.say(&format!("Detected {} format", outcome.region));
        }

        self.sink.show_record(&outcome);
        Ok(outcome)
    }
}
