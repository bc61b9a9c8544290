//! The field contract for fieldkit.
//!
//! A [`FieldType`] is a pluggable kind of field: it advertises capabilities,
//! validates definitions and submitted values, provisions its own storage
//! table and contributes joins, predicates and ordering to entry listings.
//! A [`FieldInstance`] binds a type to one section with its settings.
//!
//! - [`FieldTypes`]: catalog of types by handle, builds instances
//! - [`FieldContext`]: gateway, section registry, translator and config
//! - [`compose_entry_query`]: combines several fields into one listing query
//! - [`FieldTable`]: the shipped [`SectionRegistry`] over the `fields` table
//!
//! Capability-specific operations called on a type that lacks the
//! capability fail with [`FieldError::Unsupported`].

mod association;
mod capability;
mod catalog;
mod compose;
mod config;
mod context;
mod error;
mod field_type;
mod instance;
mod lifecycle;
mod output;
mod query;
mod registry;
mod translate;
mod validation;

pub mod types;
pub use types::{BaseField, CheckboxField, InputField};

pub use association::{
    ASSOCIATION_TABLE, SectionAssociation, associations_for_parent, create_section_association,
    remove_section_association,
};
pub use capability::{Capabilities, ToggleState};
pub use catalog::FieldTypes;
pub use compose::{FilterClause, QueryPlan, compose_entry_query, compose_entry_statement};
pub use config::FieldConfig;
pub use context::FieldContext;
pub use error::{FieldError, FieldResult};
pub use field_type::{
    EntryData, EntryRecord, FieldType, FormattedElement, PostDataCheck, ProcessedData,
    RecordGroup, value_data,
};
pub use instance::{FieldInstance, Settings, keys};
pub use lifecycle::{
    ColumnDef, CommitOutcome, STORAGE_TABLE_PREFIX, StorageTable, create_handle,
    default_storage_table, delete_entry_rows, element_name_from_label, storage_table_name,
};
pub use output::{decode_entities, encode_markup, strip_tags, table_value, truncate_cell};
pub use query::{
    ENTRIES_ALIAS, EntryQuery, FilterMode, REGEX_PREFIX, SORT_ALIAS, SortOrder, default_filter,
    default_sorting,
};
pub use registry::{FIELDS_TABLE, FieldRecord, FieldTable, SectionRegistry};
pub use translate::{Passthrough, Translator, substitute};
pub use validation::{
    DUPLICATE_ELEMENT_NAME_MESSAGE, ErrorMap, INVALID_ELEMENT_NAME_MESSAGE, REQUIRED_MESSAGE,
    REQUIRED_VALUE_MESSAGE, check_fields, check_required, is_valid_element_name,
};
