use crate::capability::ToggleState;
use crate::error::{FieldError, FieldResult};
use crate::instance::{FieldInstance, Settings};
use crate::lifecycle;
use crate::output;
use crate::query::{self, EntryQuery, SortOrder};
use crate::validation::{self, ErrorMap};
use fieldkit_db::SqlValue;
use fieldkit_types::{EntryId, FieldId, FieldStatus};
use std::collections::BTreeMap;

/// One stored row of a field's entry data, keyed by column.
pub type EntryData = BTreeMap<String, SqlValue>;

/// Builds entry data holding a single `value` column.
#[must_use]
pub fn value_data(value: impl Into<SqlValue>) -> EntryData {
    BTreeMap::from([("value".to_string(), value.into())])
}

/// Result of validating a submitted entry value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDataCheck {
    pub status: FieldStatus,
    pub message: Option<String>,
}

impl PostDataCheck {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: FieldStatus::Ok,
            message: None,
        }
    }

    pub fn failed(status: FieldStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

/// Entry data produced from a raw submitted value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedData {
    pub status: FieldStatus,
    pub data: EntryData,
}

/// A named value for structured (XML-like) output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedElement {
    pub name: String,
    pub value: String,
}

/// An entry and its data for this field, as handed to grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRecord {
    pub entry_id: EntryId,
    pub data: EntryData,
}

/// Entries sharing one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordGroup {
    pub value: String,
    pub entries: Vec<EntryId>,
}

/// The contract every field type implements.
///
/// Only `handle` is required. Every capability predicate defaults to the
/// conservative answer and every override point defaults to the base
/// behaviour, so a type that does nothing special needs no further code.
/// Defaults that an override may want to call through to are exposed as
/// free functions (`validation::check_fields`, `query::default_filter`,
/// `lifecycle::default_storage_table`, ...).
///
/// Capability-specific operations (`toggle_field_data`, `group_records`,
/// filtering, sorting) must only be reached when the matching predicate is
/// true. [`FieldInstance`] enforces this and reports
/// [`FieldError::Unsupported`] otherwise.
pub trait FieldType: Send + Sync {
    /// Stable lowercase identifier, persisted as the field's `type`.
    fn handle(&self) -> &str;

    /// Display name. Defaults to the handle.
    fn name(&self) -> &str {
        self.handle()
    }

    // ── Capabilities ─────────────────────────────────────────────

    fn can_show_table_column(&self) -> bool {
        true
    }

    fn can_toggle(&self) -> bool {
        false
    }

    fn can_filter(&self) -> bool {
        false
    }

    fn can_import(&self) -> bool {
        false
    }

    fn can_pre_populate(&self) -> bool {
        false
    }

    fn must_be_unique(&self) -> bool {
        false
    }

    fn allow_datasource_output_grouping(&self) -> bool {
        false
    }

    fn allow_datasource_param_output(&self) -> bool {
        false
    }

    fn is_sortable(&self) -> bool {
        false
    }

    fn requires_sql_grouping(&self) -> bool {
        false
    }

    /// States a toggleable field can be switched to, in display order.
    fn toggle_states(&self) -> Vec<ToggleState> {
        Vec::new()
    }

    /// Rewrites entry data for a new toggle state.
    fn toggle_field_data(&self, data: EntryData, new_state: &str) -> EntryData {
        let _ = new_state;
        data
    }

    // ── Definition ───────────────────────────────────────────────

    /// Fills type-specific settings a new instance should start with.
    fn find_defaults(&self, settings: &mut Settings) {
        let _ = settings;
    }

    /// Validates the field definition before commit.
    fn check_fields(
        &self,
        field: &FieldInstance,
        errors: &mut ErrorMap,
        check_duplicates: bool,
    ) -> FieldResult<FieldStatus> {
        validation::check_fields(field, errors, check_duplicates)
    }

    // ── Entry data ───────────────────────────────────────────────

    /// Validates a submitted entry value.
    fn check_post_field_data(
        &self,
        field: &FieldInstance,
        data: &str,
        entry_id: Option<EntryId>,
    ) -> PostDataCheck {
        let _ = entry_id;
        validation::check_required(field, data)
    }

    /// Converts a submitted value into storable entry data.
    fn process_raw_field_data(
        &self,
        field: &FieldInstance,
        data: &str,
        simulate: bool,
        entry_id: Option<EntryId>,
    ) -> ProcessedData {
        let _ = (field, simulate, entry_id);
        ProcessedData {
            status: FieldStatus::Ok,
            data: value_data(data),
        }
    }

    // ── Storage ──────────────────────────────────────────────────

    /// Provisions the instance's storage table. Must be idempotent.
    fn create_storage_table(&self, field: &FieldInstance) -> FieldResult<()> {
        lifecycle::default_storage_table(field)
    }

    /// Removes the data an entry holds in this field.
    fn entry_data_cleanup(&self, field: &FieldInstance, entry_id: EntryId) -> FieldResult<()> {
        lifecycle::delete_entry_rows(field, entry_id)
    }

    // ── Query fragments ──────────────────────────────────────────

    fn build_sorting_sql(
        &self,
        field: &FieldInstance,
        query: &mut EntryQuery,
        order: SortOrder,
    ) -> FieldResult<()> {
        query::default_sorting(field, query, order)
    }

    /// Adds filter joins and predicates. `Ok(false)` signals a filter shape
    /// this type cannot express.
    fn build_filter_sql(
        &self,
        field: &FieldInstance,
        values: &[String],
        query: &mut EntryQuery,
        intersect: bool,
    ) -> FieldResult<bool> {
        query::default_filter(field, values, query, intersect)
    }

    // ── Output ───────────────────────────────────────────────────

    /// Text shown in an entry table cell.
    fn prepare_table_value(&self, field: &FieldInstance, data: &EntryData) -> String {
        output::table_value(field, data)
    }

    /// Value published to a data source's parameter pool.
    fn parameter_pool_value(&self, field: &FieldInstance, data: &EntryData) -> String {
        self.prepare_table_value(field, data)
    }

    /// Structured output element. `mode` is an opaque extension point.
    fn formatted_element(
        &self,
        field: &FieldInstance,
        data: &EntryData,
        encode: bool,
        mode: Option<&str>,
        entry_id: Option<EntryId>,
    ) -> FormattedElement {
        let _ = (mode, entry_id);
        let value = self.prepare_table_value(field, data);
        FormattedElement {
            name: field.element_name().to_string(),
            value: if encode { output::encode_markup(&value) } else { value },
        }
    }

    /// Element names a data source can include for this field.
    fn includable_elements(&self, field: &FieldInstance) -> Vec<String> {
        vec![field.element_name().to_string()]
    }

    // ── Associated entries ───────────────────────────────────────

    /// Value used to look up entries associated through this field.
    /// `field_id` is an opaque extension point.
    fn associated_entry_search_value(
        &self,
        data: &str,
        field_id: Option<FieldId>,
        parent_entry_id: Option<EntryId>,
    ) -> String {
        let _ = (field_id, parent_entry_id);
        data.to_string()
    }

    fn associated_entry_count(&self, field: &FieldInstance, value: &str) -> FieldResult<Option<u64>> {
        let _ = (field, value);
        Ok(None)
    }

    fn associated_entry_ids(&self, field: &FieldInstance, value: &str) -> FieldResult<Vec<EntryId>> {
        let _ = (field, value);
        Ok(Vec::new())
    }

    // ── Grouping ─────────────────────────────────────────────────

    /// Groups records by this field's value. Types advertising
    /// `allow_datasource_output_grouping` must override this.
    fn group_records(
        &self,
        field: &FieldInstance,
        records: &[EntryRecord],
    ) -> FieldResult<Vec<RecordGroup>> {
        let _ = (field, records);
        Err(FieldError::unsupported(self.handle(), "data source output grouping"))
    }
}
