//! The catalog of field types a host knows about.

use crate::capability::Capabilities;
use crate::context::FieldContext;
use crate::error::{FieldError, FieldResult};
use crate::field_type::FieldType;
use crate::instance::FieldInstance;
use crate::registry::FieldRecord;
use crate::types::{BaseField, CheckboxField, InputField};
use fieldkit_types::{FieldFilter, FieldId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Field types by handle.
#[derive(Clone, Default)]
pub struct FieldTypes {
    types: BTreeMap<String, Arc<dyn FieldType>>,
}

impl FieldTypes {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding `field`, `input` and `checkbox`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut types = Self::new();
        types.register(Arc::new(BaseField));
        types.register(Arc::new(InputField));
        types.register(Arc::new(CheckboxField));
        types
    }

    /// Adds a type, replacing any registered under the same handle.
    pub fn register(&mut self, kind: Arc<dyn FieldType>) {
        let handle = kind.handle().to_string();
        if self.types.insert(handle.clone(), kind).is_some() {
            warn!("Field type '{}' registered twice, keeping the latest", handle);
        } else {
            debug!("Registered field type '{}'", handle);
        }
    }

    pub fn get(&self, handle: &str) -> Option<Arc<dyn FieldType>> {
        self.types.get(handle).cloned()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.types.contains_key(handle)
    }

    /// Registered handles, sorted.
    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Handles whose capabilities pass `filter`.
    pub fn handles_matching(&self, filter: FieldFilter) -> Vec<&str> {
        self.types
            .iter()
            .filter(|(_, kind)| filter.accepts(kind.can_toggle(), kind.can_filter()))
            .map(|(handle, _)| handle.as_str())
            .collect()
    }

    /// Capability descriptors of every type, sorted by handle.
    pub fn describe_all(&self) -> Vec<Capabilities> {
        self.types
            .values()
            .map(|kind| Capabilities::describe(kind.as_ref()))
            .collect()
    }

    /// Every descriptor as one JSON array.
    pub fn describe_all_json(&self) -> FieldResult<String> {
        Ok(serde_json::to_string(&self.describe_all())?)
    }

    fn lookup(&self, handle: &str) -> FieldResult<Arc<dyn FieldType>> {
        self.get(handle)
            .ok_or_else(|| FieldError::UnknownFieldType(handle.to_string()))
    }

    /// A new, uncommitted instance with the type's defaults filled in.
    pub fn instance(&self, handle: &str, ctx: FieldContext) -> FieldResult<FieldInstance> {
        let kind = self.lookup(handle)?;
        let mut field = FieldInstance::new(kind.clone(), ctx);
        kind.find_defaults(field.settings_mut());
        Ok(field)
    }

    /// Rebuilds a persisted instance from its stored record.
    pub fn load(&self, ctx: FieldContext, id: FieldId, record: &FieldRecord) -> FieldResult<FieldInstance> {
        let kind = self.lookup(&record.field_type)?;
        Ok(FieldInstance::persisted(kind, ctx, id, record))
    }
}
