//! Identifier types used throughout fieldkit.
//!
//! Ids are assigned by persistence (auto-increment row ids), so they wrap
//! `i64` rather than generating values themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row id.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the underlying row id.
            #[must_use]
            pub const fn get(&self) -> i64 {
                self.0
            }

            /// Parses an id from its decimal form.
            pub fn parse(s: &str) -> Result<Self, ParseIntError> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

row_id!(
    /// Identifier of a persisted field instance. Also names the instance's
    /// storage table (`entries_data_<id>`).
    FieldId
);

row_id!(
    /// Identifier of a section (content type) that owns field instances.
    SectionId
);

row_id!(
    /// Identifier of an entry row owned by the host's entry store.
    EntryId
);
