//! Definition and entry-value validation.

use crate::error::FieldResult;
use crate::field_type::PostDataCheck;
use crate::instance::{FieldInstance, keys};
use fieldkit_types::{EntryId, FieldStatus};
use regex_lite::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

/// Validation errors keyed by setting name. Owned by the caller and only
/// ever added to.
pub type ErrorMap = BTreeMap<String, String>;

pub const REQUIRED_MESSAGE: &str = "This is a required field.";
pub const INVALID_ELEMENT_NAME_MESSAGE: &str = "Invalid element name. Must be valid QName.";
pub const DUPLICATE_ELEMENT_NAME_MESSAGE: &str =
    "A field with that element name already exists. Please choose another.";
pub const REQUIRED_VALUE_MESSAGE: &str = "'%s' is a required field.";

static ELEMENT_NAME: LazyLock<Result<Regex, regex_lite::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]*$"));

/// Whether `name` satisfies the element-name grammar: an ASCII letter, then
/// ASCII word characters, dots or hyphens.
#[must_use]
pub fn is_valid_element_name(name: &str) -> bool {
    ELEMENT_NAME.as_ref().is_ok_and(|re| re.is_match(name))
}

/// Base definition checks: label present, element name present and
/// well-formed, and (optionally) unique within the parent section.
///
/// Returns `Error` when `errors` is non-empty afterwards, including errors
/// the caller put there beforehand.
pub fn check_fields(
    field: &FieldInstance,
    errors: &mut ErrorMap,
    check_duplicates: bool,
) -> FieldResult<FieldStatus> {
    let ctx = field.context();

    if field.label().is_empty() {
        errors.insert(keys::LABEL.to_string(), ctx.t(REQUIRED_MESSAGE, &[]));
    }

    let element_name = field.element_name();
    if element_name.is_empty() {
        errors.insert(keys::ELEMENT_NAME.to_string(), ctx.t(REQUIRED_MESSAGE, &[]));
    } else if !is_valid_element_name(element_name) {
        errors.insert(
            keys::ELEMENT_NAME.to_string(),
            ctx.t(INVALID_ELEMENT_NAME_MESSAGE, &[]),
        );
    } else if check_duplicates {
        if let Some(section) = field.parent_section() {
            if ctx.sections.element_name_taken(section, element_name, field.id())? {
                debug!(
                    "Element name '{}' already used in section {}",
                    element_name, section
                );
                errors.insert(
                    keys::ELEMENT_NAME.to_string(),
                    ctx.t(DUPLICATE_ELEMENT_NAME_MESSAGE, &[]),
                );
            }
        }
    }

    Ok(if errors.is_empty() {
        FieldStatus::Ok
    } else {
        FieldStatus::Error
    })
}

/// The required-value check every type layers its own checks on.
pub fn check_required(field: &FieldInstance, data: &str) -> PostDataCheck {
    if field.is_required() && data.is_empty() {
        let message = field
            .context()
            .t(REQUIRED_VALUE_MESSAGE, &[field.label()]);
        return PostDataCheck::failed(FieldStatus::MissingFields, message);
    }
    PostDataCheck::ok()
}

impl FieldInstance {
    /// Validates the definition through the field type.
    pub fn check_fields(&self, errors: &mut ErrorMap, check_duplicates: bool) -> FieldResult<FieldStatus> {
        self.kind().check_fields(self, errors, check_duplicates)
    }

    /// Validates a submitted entry value through the field type.
    pub fn check_post_field_data(&self, data: &str, entry_id: Option<EntryId>) -> PostDataCheck {
        self.kind().check_post_field_data(self, data, entry_id)
    }
}
