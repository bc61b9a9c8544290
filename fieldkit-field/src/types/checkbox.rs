//! A yes/no checkbox.
//!
//! Stores exactly `yes` or `no`, toggles between the two, and groups
//! entries by state for data source output.

use crate::capability::ToggleState;
use crate::error::FieldResult;
use crate::field_type::{
    EntryData, EntryRecord, FieldType, PostDataCheck, ProcessedData, RecordGroup, value_data,
};
use crate::instance::{FieldInstance, Settings};
use crate::lifecycle::{ColumnDef, StorageTable};
use crate::validation::REQUIRED_VALUE_MESSAGE;
use fieldkit_db::SqlValue;
use fieldkit_types::{EntryId, FieldStatus, SettingValue, YesNo};

/// Setting holding the state of new entries, `on` or `off`.
pub const DEFAULT_STATE: &str = "default_state";

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxField;

fn checked(raw: &str) -> YesNo {
    let raw = raw.trim();
    YesNo::from(raw.eq_ignore_ascii_case("yes") || raw.eq_ignore_ascii_case("on"))
}

fn default_state(field: &FieldInstance) -> YesNo {
    field
        .get(DEFAULT_STATE)
        .and_then(SettingValue::as_str)
        .map_or(YesNo::No, checked)
}

fn stored_state(data: &EntryData) -> YesNo {
    data.get("value")
        .and_then(SqlValue::as_str)
        .map_or(YesNo::No, checked)
}

impl FieldType for CheckboxField {
    fn handle(&self) -> &str {
        "checkbox"
    }

    fn name(&self) -> &str {
        "Checkbox"
    }

    fn can_toggle(&self) -> bool {
        true
    }

    fn can_filter(&self) -> bool {
        true
    }

    fn can_import(&self) -> bool {
        true
    }

    fn is_sortable(&self) -> bool {
        true
    }

    fn allow_datasource_output_grouping(&self) -> bool {
        true
    }

    fn allow_datasource_param_output(&self) -> bool {
        true
    }

    fn toggle_states(&self) -> Vec<ToggleState> {
        vec![ToggleState::new("yes", "Yes"), ToggleState::new("no", "No")]
    }

    fn toggle_field_data(&self, mut data: EntryData, new_state: &str) -> EntryData {
        data.insert("value".to_string(), checked(new_state).as_str().into());
        data
    }

    fn find_defaults(&self, settings: &mut Settings) {
        settings
            .entry(DEFAULT_STATE.to_string())
            .or_insert_with(|| SettingValue::from("off"));
    }

    fn check_post_field_data(
        &self,
        field: &FieldInstance,
        data: &str,
        _entry_id: Option<EntryId>,
    ) -> PostDataCheck {
        if field.is_required() && !checked(data).is_yes() {
            let message = field.context().t(REQUIRED_VALUE_MESSAGE, &[field.label()]);
            return PostDataCheck::failed(FieldStatus::MissingFields, message);
        }
        PostDataCheck::ok()
    }

    fn process_raw_field_data(
        &self,
        field: &FieldInstance,
        data: &str,
        _simulate: bool,
        entry_id: Option<EntryId>,
    ) -> ProcessedData {
        // A new entry submitted without a value takes the configured state.
        let state = if data.trim().is_empty() && entry_id.is_none() {
            default_state(field)
        } else {
            checked(data)
        };
        ProcessedData {
            status: FieldStatus::Ok,
            data: value_data(state.as_str()),
        }
    }

    fn create_storage_table(&self, field: &FieldInstance) -> FieldResult<()> {
        StorageTable::for_field(field)?
            .column(
                ColumnDef::new(
                    "value",
                    "TEXT NOT NULL DEFAULT 'no' CHECK (value IN ('yes', 'no'))",
                )
                .indexed(),
            )
            .create(field.context().gateway.as_ref())
    }

    fn prepare_table_value(&self, field: &FieldInstance, data: &EntryData) -> String {
        let label = if stored_state(data).is_yes() { "Yes" } else { "No" };
        field.context().t(label, &[])
    }

    fn parameter_pool_value(&self, _field: &FieldInstance, data: &EntryData) -> String {
        stored_state(data).as_str().to_string()
    }

    fn group_records(
        &self,
        _field: &FieldInstance,
        records: &[EntryRecord],
    ) -> FieldResult<Vec<RecordGroup>> {
        let mut yes = Vec::new();
        let mut no = Vec::new();
        for record in records {
            match stored_state(&record.data) {
                YesNo::Yes => yes.push(record.entry_id),
                YesNo::No => no.push(record.entry_id),
            }
        }
        Ok([(YesNo::Yes, yes), (YesNo::No, no)]
            .into_iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(state, entries)| RecordGroup {
                value: state.as_str().to_string(),
                entries,
            })
            .collect())
    }
}
