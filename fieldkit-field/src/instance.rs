//! A configured field slot: one field type attached to one section.

use crate::capability::Capabilities;
use crate::context::FieldContext;
use crate::error::{FieldError, FieldResult};
use crate::field_type::FieldType;
use crate::lifecycle::storage_table_name;
use crate::registry::FieldRecord;
use fieldkit_types::{FieldId, Location, SectionId, SettingValue, YesNo};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The open-ended settings bag of a field instance.
pub type Settings = BTreeMap<String, SettingValue>;

/// Setting keys the core itself reads.
pub mod keys {
    pub const ELEMENT_NAME: &str = "element_name";
    pub const LABEL: &str = "label";
    pub const PARENT_SECTION: &str = "parent_section";
    pub const LOCATION: &str = "location";
    pub const REQUIRED: &str = "required";
    pub const SHOW_COLUMN: &str = "show_column";
    pub const SORT_ORDER: &str = "sortorder";
}

/// A field type bound to its settings, identity and collaborators.
///
/// Not `Sync`: the alias counter used while composing a query is plain
/// interior state, scoped to one composition pass at a time.
pub struct FieldInstance {
    kind: Arc<dyn FieldType>,
    ctx: FieldContext,
    id: Option<FieldId>,
    settings: Settings,
    alias_key: Cell<u32>,
}

impl FieldInstance {
    /// A new, uncommitted instance.
    pub fn new(kind: Arc<dyn FieldType>, ctx: FieldContext) -> Self {
        Self {
            kind,
            ctx,
            id: None,
            settings: Settings::new(),
            alias_key: Cell::new(0),
        }
    }

    /// An instance for a definition that is already persisted.
    pub fn persisted(
        kind: Arc<dyn FieldType>,
        ctx: FieldContext,
        id: FieldId,
        record: &FieldRecord,
    ) -> Self {
        let mut field = Self::new(kind, ctx);
        field.id = Some(id);
        field.set(keys::ELEMENT_NAME, record.element_name.as_str());
        field.set(keys::LABEL, record.label.as_str());
        if let Some(section) = record.parent_section {
            field.set(keys::PARENT_SECTION, section.get());
        }
        field.set(keys::LOCATION, record.location.as_str());
        field.set(keys::REQUIRED, record.required.as_str());
        field.set(keys::SHOW_COLUMN, record.show_column.as_str());
        field.set(keys::SORT_ORDER, record.sort_order);
        field
    }

    // ── Identity ─────────────────────────────────────────────────

    pub fn kind(&self) -> &dyn FieldType {
        self.kind.as_ref()
    }

    pub fn handle(&self) -> &str {
        self.kind.handle()
    }

    pub fn context(&self) -> &FieldContext {
        &self.ctx
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::describe(self.kind.as_ref())
    }

    /// Persisted id, `None` until the first successful commit.
    pub fn id(&self) -> Option<FieldId> {
        self.id
    }

    /// The id, or [`FieldError::NotPersisted`] for a new instance.
    pub fn require_id(&self) -> FieldResult<FieldId> {
        self.id
            .ok_or_else(|| FieldError::NotPersisted(self.label().to_string()))
    }

    /// Records the id assigned by persistence. An id never changes once set.
    pub(crate) fn assign_id(&mut self, id: FieldId) -> FieldResult<()> {
        match self.id {
            Some(existing) if existing != id => Err(FieldError::IdAlreadyAssigned {
                existing,
                requested: id,
            }),
            _ => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    /// Name of the instance's storage table.
    pub fn storage_table(&self) -> FieldResult<String> {
        Ok(storage_table_name(self.require_id()?))
    }

    // ── Settings bag ─────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key)
    }

    /// Every setting.
    pub fn all(&self) -> &Settings {
        &self.settings
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.settings.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.settings.remove(key)
    }

    /// Merges settings in, overwriting existing keys.
    pub fn set_many<I, K>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, SettingValue)>,
        K: Into<String>,
    {
        for (key, value) in values {
            self.settings.insert(key.into(), value);
        }
    }

    pub fn flush(&mut self) {
        self.settings.clear();
    }

    pub(crate) fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Merges a settings form submission. Unchecked checkboxes are omitted
    /// from submissions, so `required` and `show_column` are `no` unless the
    /// submission says exactly `yes`, and `location` defaults to `main`.
    pub fn set_from_form_submission(&mut self, mut data: Settings) {
        data.entry(keys::LOCATION.to_string())
            .or_insert_with(|| Location::Main.as_str().into());
        for key in [keys::REQUIRED, keys::SHOW_COLUMN] {
            let flag = YesNo::from_form(data.get(key).and_then(SettingValue::as_str));
            data.insert(key.to_string(), flag.as_str().into());
        }
        self.set_many(data);
    }

    // ── Typed views ──────────────────────────────────────────────

    fn text(&self, key: &str) -> &str {
        self.get(key).and_then(SettingValue::as_str).unwrap_or_default()
    }

    fn flag(&self, key: &str) -> YesNo {
        match self.get(key) {
            Some(SettingValue::Bool(b)) => YesNo::from(*b),
            other => YesNo::from_form(other.and_then(SettingValue::as_str)),
        }
    }

    pub fn label(&self) -> &str {
        self.text(keys::LABEL)
    }

    pub fn element_name(&self) -> &str {
        self.text(keys::ELEMENT_NAME)
    }

    pub fn parent_section(&self) -> Option<SectionId> {
        self.get(keys::PARENT_SECTION)
            .and_then(SettingValue::as_i64)
            .map(SectionId::new)
    }

    pub fn location(&self) -> Location {
        Location::parse(self.text(keys::LOCATION))
    }

    pub fn required(&self) -> YesNo {
        self.flag(keys::REQUIRED)
    }

    pub fn is_required(&self) -> bool {
        self.required().is_yes()
    }

    pub fn show_column(&self) -> YesNo {
        self.flag(keys::SHOW_COLUMN)
    }

    pub fn sort_order(&self) -> i64 {
        self.get(keys::SORT_ORDER)
            .and_then(SettingValue::as_i64)
            .unwrap_or_default()
    }

    /// The persisted row for this instance.
    pub fn record(&self) -> FieldRecord {
        FieldRecord {
            element_name: self.element_name().to_string(),
            label: self.label().to_string(),
            parent_section: self.parent_section(),
            location: self.location(),
            required: self.required(),
            field_type: self.handle().to_string(),
            show_column: self.show_column(),
            sort_order: self.sort_order(),
        }
    }

    // ── Query aliases ────────────────────────────────────────────

    /// Allocates the next table alias (`t<id>_<n>`) for a join against this
    /// instance's storage table.
    pub fn next_alias(&self) -> FieldResult<String> {
        let id = self.require_id()?;
        let key = self.alias_key.get() + 1;
        self.alias_key.set(key);
        let alias = format!("t{id}_{key}");
        debug!("Allocated alias {} for field {}", alias, id);
        Ok(alias)
    }

    /// Number of aliases handed out since the last reset.
    pub fn aliases_issued(&self) -> u32 {
        self.alias_key.get()
    }

    /// Starts a fresh composition pass.
    pub fn reset_aliases(&self) {
        self.alias_key.set(0);
    }

    pub(crate) fn ensure(&self, supported: bool, capability: &'static str) -> FieldResult<()> {
        if supported {
            Ok(())
        } else {
            Err(FieldError::unsupported(self.handle(), capability))
        }
    }
}

impl fmt::Debug for FieldInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInstance")
            .field("handle", &self.handle())
            .field("id", &self.id)
            .field("settings", &self.settings)
            .field("aliases_issued", &self.alias_key.get())
            .finish()
    }
}
