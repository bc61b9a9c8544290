//! Small enumerations persisted as text in the fields table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `yes`/`no` flag as stored by the fields table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    /// Only the literal `yes` counts as set. Form checkboxes are omitted
    /// when unchecked, so anything else (including absence) is `No`.
    #[must_use]
    pub fn from_form(value: Option<&str>) -> Self {
        match value {
            Some("yes") => Self::Yes,
            _ => Self::No,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for YesNo {
    fn from(b: bool) -> Self {
        if b { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the publish form places a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    #[default]
    Main,
    Sidebar,
}

impl Location {
    /// Parses a stored location. Unknown values fall back to `Main`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("sidebar") {
            Self::Sidebar
        } else {
            Self::Main
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Sidebar => "sidebar",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
