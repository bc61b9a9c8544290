//! Field types shipped with the crate.

mod base;
mod checkbox;
mod input;

pub use base::BaseField;
pub use checkbox::{CheckboxField, DEFAULT_STATE};
pub use input::{InputField, VALIDATOR};
