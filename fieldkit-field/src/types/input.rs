//! Single-line text input with an optional validation pattern.

use crate::error::FieldResult;
use crate::field_type::{FieldType, PostDataCheck};
use crate::instance::FieldInstance;
use crate::validation::{self, ErrorMap};
use fieldkit_types::{EntryId, FieldStatus, SettingValue};
use regex_lite::Regex;
use tracing::warn;

/// Setting holding the validation pattern.
pub const VALIDATOR: &str = "validator";

pub const INVALID_PATTERN_MESSAGE: &str = "Validation rule is not a valid regular expression.";
pub const INVALID_DATA_MESSAGE: &str = "'%s' contains invalid data. Please check the contents.";

#[derive(Debug, Clone, Copy, Default)]
pub struct InputField;

fn validator(field: &FieldInstance) -> Option<&str> {
    field
        .get(VALIDATOR)
        .and_then(SettingValue::as_str)
        .map(str::trim)
        .filter(|rule| !rule.is_empty())
}

impl FieldType for InputField {
    fn handle(&self) -> &str {
        "input"
    }

    fn name(&self) -> &str {
        "Text Input"
    }

    fn can_filter(&self) -> bool {
        true
    }

    fn can_import(&self) -> bool {
        true
    }

    fn can_pre_populate(&self) -> bool {
        true
    }

    fn is_sortable(&self) -> bool {
        true
    }

    fn allow_datasource_param_output(&self) -> bool {
        true
    }

    fn check_fields(
        &self,
        field: &FieldInstance,
        errors: &mut ErrorMap,
        check_duplicates: bool,
    ) -> FieldResult<FieldStatus> {
        if let Some(rule) = validator(field) {
            if Regex::new(rule).is_err() {
                errors.insert(
                    VALIDATOR.to_string(),
                    field.context().t(INVALID_PATTERN_MESSAGE, &[]),
                );
            }
        }
        validation::check_fields(field, errors, check_duplicates)
    }

    fn check_post_field_data(
        &self,
        field: &FieldInstance,
        data: &str,
        _entry_id: Option<EntryId>,
    ) -> PostDataCheck {
        let required = validation::check_required(field, data);
        if !required.is_ok() || data.is_empty() {
            return required;
        }
        let Some(rule) = validator(field) else {
            return required;
        };
        match Regex::new(rule) {
            Ok(pattern) if pattern.is_match(data) => PostDataCheck::ok(),
            Ok(_) => PostDataCheck::failed(
                FieldStatus::InvalidFields,
                field.context().t(INVALID_DATA_MESSAGE, &[field.label()]),
            ),
            Err(e) => {
                warn!("Skipping invalid validator on '{}': {}", field.element_name(), e);
                PostDataCheck::ok()
            }
        }
    }
}
