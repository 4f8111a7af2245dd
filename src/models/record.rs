use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Decoded barcode text as produced by the optical decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload(String);

impl RawPayload {
    /// Wrap decoder output; empty text is not a successful decode
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `max_chars` characters, for progress logging
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.0.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for RawPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One payload line split into a fixed-width code and a trimmed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub code: &'a str,
    pub value: &'a str,
}

impl<'a> Segment<'a> {
    pub const CODE_LEN: usize = 3;

    /// Lines shorter than the code width keep what they have as code and an empty value
    pub fn from_line(line: &'a str) -> Self {
        match line.char_indices().nth(Self::CODE_LEN) {
            Some((idx, _)) => Self {
                code: &line[..idx],
                value: line[idx..].trim(),
            },
            None => Self {
                code: line,
                value: "",
            },
        }
    }

    pub fn has_full_code(&self) -> bool {
        self.code.chars().count() == Self::CODE_LEN
    }
}

/// Label -> value record; keeps first-insertion order of labels for display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecord {
    entries: Vec<(String, String)>,
}

impl ParsedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a label, overwriting any earlier value in place
    pub fn insert(&mut self, label: &str, value: &str) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((label.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }
}

impl Serialize for ParsedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Result of handling one payload: the profile it was parsed against and the record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScanOutcome {
    pub region: String,
    /// True if the region came from signature detection rather than the prior selection
    pub detected: bool,
    pub record: ParsedRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_is_not_a_decode() {
        assert!(RawPayload::new("").is_none());
        assert_eq!(RawPayload::new("DCSDOE").unwrap().as_str(), "DCSDOE");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let payload = RawPayload::new("DAGDirección 1").unwrap();
        assert_eq!(payload.preview(8), "DAGDirec");
        assert_eq!(payload.preview(11), "DAGDirecció");
        assert_eq!(payload.preview(100), "DAGDirección 1");
    }

    #[test]
    fn test_segment_split() {
        let seg = Segment::from_line("DCS  DOE \r");
        assert_eq!(seg.code, "DCS");
        assert_eq!(seg.value, "DOE");
        assert!(seg.has_full_code());
    }

    #[test]
    fn test_short_line_has_empty_value() {
        let seg = Segment::from_line("DC");
        assert_eq!(seg.code, "DC");
        assert_eq!(seg.value, "");
        assert!(!seg.has_full_code());

        let exact = Segment::from_line("DCS");
        assert_eq!(exact.code, "DCS");
        assert_eq!(exact.value, "");
    }

    #[test]
    fn test_record_overwrite_keeps_position() {
        let mut record = ParsedRecord::new();
        record.insert("Last Name", "DOE");
        record.insert("First Name", "JOHN");
        record.insert("Last Name", "ROE");

        let entries: Vec<(&str, &str)> = record.iter().collect();
        assert_eq!(entries, vec![("Last Name", "ROE"), ("First Name", "JOHN")]);
    }

    #[test]
    fn test_record_serializes_in_order() {
        let mut record = ParsedRecord::new();
        record.insert("Last Name", "DOE");
        record.insert("Date of Birth", "01011990");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Last Name":"DOE","Date of Birth":"01011990"}"#);
    }
}
