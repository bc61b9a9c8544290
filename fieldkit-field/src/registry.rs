//! The parent content-type registry: where field definitions are persisted
//! and resolved back to their owning section.

use crate::association;
use crate::error::{FieldError, FieldResult};
use fieldkit_db::{Row, SqlFragment, StorageGateway};
use fieldkit_types::{FieldId, Location, SectionId, YesNo};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Table holding one row per committed field instance.
pub const FIELDS_TABLE: &str = "fields";

/// The persisted columns of a field definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub element_name: String,
    pub label: String,
    pub parent_section: Option<SectionId>,
    pub location: Location,
    pub required: YesNo,
    #[serde(rename = "type")]
    pub field_type: String,
    pub show_column: YesNo,
    #[serde(rename = "sortorder")]
    pub sort_order: i64,
}

impl FieldRecord {
    /// Column layout used by the fields table.
    #[must_use]
    pub fn to_row(&self) -> Row {
        Row::new()
            .with("element_name", self.element_name.as_str())
            .with("label", self.label.as_str())
            .with("parent_section", self.parent_section)
            .with("location", self.location.as_str())
            .with("required", self.required.as_str())
            .with("type", self.field_type.as_str())
            .with("show_column", self.show_column.as_str())
            .with("sortorder", self.sort_order)
    }

    #[must_use]
    pub fn from_row(row: &Row) -> Self {
        let text = |column: &str| row.get_str(column).unwrap_or_default().to_string();
        Self {
            element_name: text("element_name"),
            label: text("label"),
            parent_section: row.get_i64("parent_section").map(SectionId::new),
            location: Location::parse(row.get_str("location").unwrap_or_default()),
            required: YesNo::from_form(row.get_str("required")),
            field_type: text("type"),
            show_column: YesNo::from_form(row.get_str("show_column")),
            sort_order: row.get_i64("sortorder").unwrap_or_default(),
        }
    }
}

/// Persistence and lookup of field definitions, owned by the host's section
/// management. Field instances only ever reach it through this trait.
pub trait SectionRegistry: Send + Sync {
    /// Persists a new definition and returns its id.
    fn add(&self, record: &FieldRecord) -> FieldResult<FieldId>;

    /// Overwrites an existing definition.
    fn edit(&self, id: FieldId, record: &FieldRecord) -> FieldResult<()>;

    /// Deletes a definition. Removing an unknown id is not an error.
    fn remove(&self, id: FieldId) -> FieldResult<()>;

    /// Section owning a field, `None` if the field is unknown.
    fn section_of(&self, field: FieldId) -> FieldResult<Option<SectionId>>;

    /// Whether another field in `section` already uses `element_name`.
    fn element_name_taken(
        &self,
        section: SectionId,
        element_name: &str,
        excluding: Option<FieldId>,
    ) -> FieldResult<bool>;
}

/// Gateway-backed registry over the `fields` table.
pub struct FieldTable {
    gateway: Arc<dyn StorageGateway>,
}

impl FieldTable {
    #[must_use]
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self { gateway }
    }

    /// Creates the fields and section association tables if missing.
    pub fn install(&self) -> FieldResult<()> {
        self.gateway.execute(&SqlFragment::sql(
            "CREATE TABLE IF NOT EXISTS \"fields\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                element_name TEXT NOT NULL,
                label TEXT NOT NULL,
                parent_section INTEGER,
                location TEXT NOT NULL DEFAULT 'main',
                required TEXT NOT NULL DEFAULT 'no',
                type TEXT NOT NULL,
                show_column TEXT NOT NULL DEFAULT 'no',
                sortorder INTEGER NOT NULL DEFAULT 0
            )",
        ))?;
        self.gateway.execute(&SqlFragment::sql(
            "CREATE INDEX IF NOT EXISTS \"fields_parent_section\" ON \"fields\" (parent_section)",
        ))?;
        association::install_table(self.gateway.as_ref())
    }

    /// Loads a single definition.
    pub fn record(&self, id: FieldId) -> FieldResult<Option<FieldRecord>> {
        let row = self.gateway.fetch_row(
            &SqlFragment::sql("SELECT * FROM \"fields\" WHERE id = ").bind(id),
        )?;
        Ok(row.as_ref().map(FieldRecord::from_row))
    }

    /// Every definition in a section, ordered by `sortorder` then id.
    pub fn section_fields(&self, section: SectionId) -> FieldResult<Vec<(FieldId, FieldRecord)>> {
        let rows = self.gateway.fetch_all(
            &SqlFragment::sql("SELECT * FROM \"fields\" WHERE parent_section = ")
                .bind(section)
                .push(" ORDER BY sortorder, id"),
        )?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let id = row.get_i64("id")?;
                Some((FieldId::new(id), FieldRecord::from_row(row)))
            })
            .collect())
    }
}

impl SectionRegistry for FieldTable {
    fn add(&self, record: &FieldRecord) -> FieldResult<FieldId> {
        let id = self.gateway.insert(FIELDS_TABLE, &record.to_row())?;
        debug!("Added field '{}' as {}", record.element_name, id);
        Ok(FieldId::new(id))
    }

    fn edit(&self, id: FieldId, record: &FieldRecord) -> FieldResult<()> {
        let changed = self.gateway.update(
            FIELDS_TABLE,
            &record.to_row(),
            &SqlFragment::sql("id = ").bind(id),
        )?;
        if changed == 0 {
            return Err(FieldError::UnknownField(id));
        }
        Ok(())
    }

    fn remove(&self, id: FieldId) -> FieldResult<()> {
        let removed = self
            .gateway
            .delete(FIELDS_TABLE, &SqlFragment::sql("id = ").bind(id))?;
        debug!("Removed field {} ({} rows)", id, removed);
        Ok(())
    }

    fn section_of(&self, field: FieldId) -> FieldResult<Option<SectionId>> {
        let value = self.gateway.fetch_scalar(
            &SqlFragment::sql("SELECT parent_section FROM \"fields\" WHERE id = ")
                .bind(field)
                .push(" LIMIT 1"),
        )?;
        Ok(value.and_then(|v| v.as_i64()).map(SectionId::new))
    }

    fn element_name_taken(
        &self,
        section: SectionId,
        element_name: &str,
        excluding: Option<FieldId>,
    ) -> FieldResult<bool> {
        let mut query = SqlFragment::sql("SELECT id FROM \"fields\" WHERE element_name = ")
            .bind(element_name)
            .push(" AND parent_section = ")
            .bind(section);
        if let Some(id) = excluding {
            query = query.push(" AND id != ").bind(id);
        }
        Ok(self.gateway.fetch_row(&query.push(" LIMIT 1"))?.is_some())
    }
}
