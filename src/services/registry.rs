use crate::error::{Result, ScanError};
use crate::models::profile::{builtin_profiles, CountryProfile};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Region used when nothing else is selected
pub const DEFAULT_REGION: &str = "USA";

fn region_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{3}$").expect("static regex"))
}

fn field_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9]{3}$").expect("static regex"))
}

/// Immutable-after-setup table of regional profiles, kept in registration order
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: Vec<CountryProfile>,
    index: HashMap<String, usize>,
}

impl ProfileRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding USA, CAN, MEX, GBR, AUS
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for profile in builtin_profiles() {
            registry
                .register(profile)
                .expect("built-in profiles are valid");
        }
        registry
    }

    /// Built-ins followed by additional profiles from configuration
    pub fn with_custom(custom: &[CountryProfile]) -> Result<Self> {
        let mut registry = Self::builtin();
        for profile in custom {
            registry.register(profile.clone())?;
        }
        Ok(registry)
    }

    /// Append a profile. Adding a region never touches parsing logic.
    pub fn register(&mut self, profile: CountryProfile) -> Result<()> {
        validate_profile(&profile)?;

        if self.index.contains_key(&profile.code) {
            return Err(ScanError::InvalidProfile(format!(
                "region {} is already registered",
                profile.code
            )));
        }

        tracing::debug!(
            region = %profile.code,
            fields = profile.fields.len(),
            "registered country profile"
        );
        self.index.insert(profile.code.clone(), self.profiles.len());
        self.profiles.push(profile);
        Ok(())
    }

    /// Look up a profile by region code; `UnknownRegion` if it was never registered
    pub fn get_profile(&self, region: &str) -> Result<&CountryProfile> {
        self.index
            .get(region)
            .map(|&i| &self.profiles[i])
            .ok_or_else(|| ScanError::UnknownRegion(region.to_string()))
    }

    /// Check if a region code is registered
    pub fn contains(&self, region: &str) -> bool {
        self.index.contains_key(region)
    }

    /// Region codes in registration order
    pub fn list_regions(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.code.as_str()).collect()
    }

    /// Profiles in registration order
    pub fn profiles(&self) -> impl Iterator<Item = &CountryProfile> {
        self.profiles.iter()
    }

    /// Number of registered regions
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn validate_profile(profile: &CountryProfile) -> Result<()> {
    if !region_code_pattern().is_match(&profile.code) {
        return Err(ScanError::InvalidProfile(format!(
            "region code '{}' must be three uppercase letters",
            profile.code
        )));
    }

    if profile.signature.is_empty() {
        return Err(ScanError::InvalidProfile(format!(
            "region {} has an empty detection signature",
            profile.code
        )));
    }

    if let Some(bad) = profile
        .fields
        .keys()
        .find(|code| !field_code_pattern().is_match(code))
    {
        return Err(ScanError::InvalidProfile(format!(
            "region {} has invalid field code '{}'",
            profile.code, bad
        )));
    }

    Ok(())
}
