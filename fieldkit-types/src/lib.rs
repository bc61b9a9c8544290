//! Core type definitions for fieldkit.
//!
//! This crate defines the plugin-agnostic types shared by the storage
//! gateway and the field contract:
//! - Field, section and entry identifiers (persistence-assigned row ids)
//! - Validation status codes and capability filters
//! - The tagged value stored in a field instance's settings bag
//! - `yes`/`no` flags and publish-form locations
//!
//! Field-type specific data belongs to the field types, not here.

mod flags;
mod ids;
mod status;
mod value;

pub use flags::{Location, YesNo};
pub use ids::{EntryId, FieldId, SectionId};
pub use status::{FieldFilter, FieldStatus};
pub use value::SettingValue;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("unknown status code: {0}")]
    UnknownStatus(u16),
}

/// Parses a status code, reporting unknown codes as errors.
pub fn status_from_code(code: u16) -> Result<FieldStatus> {
    FieldStatus::from_code(code).ok_or(Error::UnknownStatus(code))
}

/// Decodes a settings value from JSON text.
pub fn setting_from_json(json: &str) -> Result<SettingValue> {
    Ok(serde_json::from_str(json)?)
}
