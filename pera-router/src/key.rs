//! Normalized manufacturer identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// A trimmed, upper-cased manufacturer identifier.
///
/// Any string is a valid key; the empty key stands for "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ManufacturerKey(String);

impl ManufacturerKey {
    /// Normalize a raw manufacturer string.
    pub fn normalize(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// Normalize an optional raw value, treating `None` as unknown.
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::normalize).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }

    /// The key for messages: the key itself, or `unknown` when empty.
    pub fn display_name(&self) -> &str {
        if self.0.is_empty() { "unknown" } else { &self.0 }
    }
}

impl fmt::Display for ManufacturerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<&str> for ManufacturerKey {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl From<String> for ManufacturerKey {
    fn from(raw: String) -> Self {
        Self::normalize(raw)
    }
}

impl From<ManufacturerKey> for String {
    fn from(key: ManufacturerKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ManufacturerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
