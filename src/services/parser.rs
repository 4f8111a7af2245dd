use crate::models::profile::CountryProfile;
use crate::models::record::{ParsedRecord, Segment};

/// Split a payload into per-line segments. Both `\n` and `\r` count as line breaks.
pub fn segments(raw: &str) -> impl Iterator<Item = Segment<'_>> {
    raw.split(['\n', '\r'])
        .filter(|line| !line.is_empty())
        .map(Segment::from_line)
}

/// Project a payload through a profile's dictionary.
///
/// One algorithm for every region; only the dictionary differs. Lines with
/// unknown codes or fewer than three characters contribute nothing, and a
/// later line with the same code overwrites an earlier one.
pub fn parse(raw: &str, profile: &CountryProfile) -> ParsedRecord {
    let mut record = ParsedRecord::new();

    for segment in segments(raw) {
        if !segment.has_full_code() {
            continue;
        }
        if let Some(label) = profile.label(segment.code) {
            record.insert(label, segment.value);
        }
    }

    record
}
