use crate::services::registry::ProfileRegistry;

/// Region whose signature appears in the payload.
///
/// Signatures are checked in registration order and the first hit wins, so a
/// payload carrying two signatures always resolves the same way.
pub fn detect<'a>(raw: &str, registry: &'a ProfileRegistry) -> Option<&'a str> {
    registry
        .profiles()
        .find(|profile| profile.matches(raw))
        .map(|profile| profile.code.as_str())
}
