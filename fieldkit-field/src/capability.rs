//! The capability descriptor a field type advertises to its host.

use crate::error::FieldResult;
use crate::field_type::FieldType;
use fieldkit_types::FieldFilter;
use serde::{Deserialize, Serialize};

/// One state a toggleable field can be switched to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleState {
    /// Stored value.
    pub value: String,
    /// Label shown to the user.
    pub label: String,
}

impl ToggleState {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Snapshot of every capability predicate of a field type.
///
/// Hosts take one of these to decide which UI affordances and query
/// features to offer, and can ship it to clients as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub handle: String,
    pub name: String,
    pub can_show_table_column: bool,
    pub can_toggle: bool,
    pub can_filter: bool,
    pub can_import: bool,
    pub can_pre_populate: bool,
    pub must_be_unique: bool,
    pub allow_datasource_output_grouping: bool,
    pub allow_datasource_param_output: bool,
    pub is_sortable: bool,
    pub requires_sql_grouping: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toggle_states: Vec<ToggleState>,
}

impl Capabilities {
    /// Reads every predicate of `kind`.
    pub fn describe(kind: &dyn FieldType) -> Self {
        let can_toggle = kind.can_toggle();
        Self {
            handle: kind.handle().to_string(),
            name: kind.name().to_string(),
            can_show_table_column: kind.can_show_table_column(),
            can_toggle,
            can_filter: kind.can_filter(),
            can_import: kind.can_import(),
            can_pre_populate: kind.can_pre_populate(),
            must_be_unique: kind.must_be_unique(),
            allow_datasource_output_grouping: kind.allow_datasource_output_grouping(),
            allow_datasource_param_output: kind.allow_datasource_param_output(),
            is_sortable: kind.is_sortable(),
            requires_sql_grouping: kind.requires_sql_grouping(),
            toggle_states: if can_toggle { kind.toggle_states() } else { Vec::new() },
        }
    }

    /// JSON form handed to clients.
    pub fn to_json(&self) -> FieldResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    #[must_use]
    pub const fn matches(&self, filter: FieldFilter) -> bool {
        filter.accepts(self.can_toggle, self.can_filter)
    }
}
