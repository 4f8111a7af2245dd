use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Regional field dictionary plus the preamble signature used for detection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryProfile {
    /// Region code, e.g. "USA"
    pub code: String,
    /// Display name for the region selector
    pub name: String,
    /// Substring that only appears in this region's payload preamble
    pub signature: String,
    /// 3-character field code -> human-readable label
    pub fields: BTreeMap<String, String>,
}

impl CountryProfile {
    pub fn new(code: &str, name: &str, signature: &str, fields: &[(&str, &str)]) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            signature: signature.to_string(),
            fields: fields
                .iter()
                .map(|(code, label)| (code.to_string(), label.to_string()))
                .collect(),
        }
    }

    /// Label for a field code, if this region knows it
    pub fn label(&self, code: &str) -> Option<&str> {
        self.fields.get(code).map(String::as_str)
    }

    /// True if the payload carries this region's signature
    pub fn matches(&self, raw: &str) -> bool {
        raw.contains(self.signature.as_str())
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.fields.values().any(|l| l == label)
    }
}

const USA_FIELDS: &[(&str, &str)] = &[
    ("DBA", "Expiration Date"),
    ("DCS", "Last Name"),
    ("DCT", "First Name"),
    ("DBD", "Issue Date"),
    ("DBB", "Date of Birth"),
    ("DBC", "Gender"),
    ("DAY", "Eye Color"),
    ("DAU", "Height"),
    ("DAG", "Street Address"),
    ("DAI", "City"),
    ("DAJ", "State"),
    ("DAK", "Postal Code"),
    ("DCF", "Document ID Number"),
];

const CAN_FIELDS: &[(&str, &str)] = &[
    ("PCN", "License Number"),
    ("DCS", "Last Name"),
    ("DCT", "First Name"),
    ("DBB", "Date of Birth"),
    ("DBA", "Expiry Date"),
    ("DAG", "Street Address"),
    ("DAI", "City"),
    ("DAJ", "Province"),
    ("DAK", "Postal Code"),
    ("DBC", "Gender"),
    ("DAY", "Eye Color"),
    ("DAU", "Height"),
];

const MEX_FIELDS: &[(&str, &str)] = &[
    ("DCF", "CURP"),
    ("DCS", "Apellido"),
    ("DCT", "Nombre"),
    ("DBB", "Fecha de Nacimiento"),
    ("DBA", "Fecha de Vencimiento"),
    ("DAG", "Dirección"),
    ("DAI", "Ciudad"),
    ("DAJ", "Estado"),
    ("DAK", "Código Postal"),
];

const GBR_FIELDS: &[(&str, &str)] = &[
    ("DCF", "License Number"),
    ("DCS", "Surname"),
    ("DCT", "Given Names"),
    ("DBB", "Date of Birth"),
    ("DBA", "Expiry Date"),
    ("DAG", "Address"),
    ("DAI", "City"),
    ("DAJ", "County"),
    ("DAK", "Post Code"),
];

const AUS_FIELDS: &[(&str, &str)] = &[
    ("DCF", "License Number"),
    ("DCS", "Surname"),
    ("DCT", "Given Names"),
    ("DBB", "Date of Birth"),
    ("DBA", "Expiry Date"),
    ("DAG", "Address"),
    ("DAI", "Suburb"),
    ("DAJ", "State"),
    ("DAK", "Postcode"),
];

/// The five built-in regions, in registration order
pub fn builtin_profiles() -> Vec<CountryProfile> {
    vec![
        CountryProfile::new("USA", "United States", "ANSI ", USA_FIELDS),
        CountryProfile::new("CAN", "Canada", "PCCA", CAN_FIELDS),
        CountryProfile::new("MEX", "Mexico", "DCMX", MEX_FIELDS),
        CountryProfile::new("GBR", "United Kingdom", "GBDL", GBR_FIELDS),
        CountryProfile::new("AUS", "Australia", "AUDL", AUS_FIELDS),
    ]
}
