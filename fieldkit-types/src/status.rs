//! Status codes returned by field validation, and the capability filters
//! a host uses to list field types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a validation call. Validation never fails with an error;
/// it reports one of these alongside an error map or message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Ok,
    Error,
    MissingFields,
    InvalidFields,
    Duplicate,
    ErrorCustom,
    InvalidQName,
}

impl FieldStatus {
    /// Stable numeric code, shared with hosts that persist or transmit
    /// statuses.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 100,
            Self::Error => 150,
            Self::MissingFields => 200,
            Self::InvalidFields => 220,
            Self::Duplicate => 300,
            Self::ErrorCustom => 400,
            Self::InvalidQName => 500,
        }
    }

    /// Looks a status up by its numeric code.
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            100 => Self::Ok,
            150 => Self::Error,
            200 => Self::MissingFields,
            220 => Self::InvalidFields,
            300 => Self::Duplicate,
            400 => Self::ErrorCustom,
            500 => Self::InvalidQName,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::MissingFields => "missing fields",
            Self::InvalidFields => "invalid fields",
            Self::Duplicate => "duplicate",
            Self::ErrorCustom => "custom error",
            Self::InvalidQName => "invalid qname",
        };
        write!(f, "{name} ({})", self.code())
    }
}

/// Capability filter used when listing field types or instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFilter {
    ToggleableOnly,
    UntoggleableOnly,
    FilterableOnly,
    UnfilterableOnly,
    #[default]
    All,
}

impl FieldFilter {
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::ToggleableOnly => 600,
            Self::UntoggleableOnly => 700,
            Self::FilterableOnly => 800,
            Self::UnfilterableOnly => 900,
            Self::All => 1000,
        }
    }

    /// Applies the filter to a type's toggle and filter capabilities.
    #[must_use]
    pub const fn accepts(self, can_toggle: bool, can_filter: bool) -> bool {
        match self {
            Self::ToggleableOnly => can_toggle,
            Self::UntoggleableOnly => !can_toggle,
            Self::FilterableOnly => can_filter,
            Self::UnfilterableOnly => !can_filter,
            Self::All => true,
        }
    }
}
