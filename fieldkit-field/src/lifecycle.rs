//! Commit and storage provisioning.
//!
//! Every committed field instance owns exactly one storage table,
//! `entries_data_<id>`, created right after the instance is first persisted
//! and never on later updates. Provisioning is `CREATE ... IF NOT EXISTS`,
//! so redundant or racing calls succeed.

use crate::error::FieldResult;
use crate::field_type::{EntryData, ProcessedData};
use crate::instance::{FieldInstance, keys};
use fieldkit_db::{Row, SqlFragment, StorageGateway, quote_ident};
use fieldkit_types::{EntryId, FieldId};
use tracing::{debug, info, warn};

pub const STORAGE_TABLE_PREFIX: &str = "entries_data_";

/// Storage table name for a field id.
#[must_use]
pub fn storage_table_name(id: FieldId) -> String {
    format!("{STORAGE_TABLE_PREFIX}{id}")
}

/// Lowercase, hyphen-separated handle: markup is stripped and every run of
/// characters other than ASCII letters, digits and `_` becomes one `-`.
/// Non-ASCII letters are separators too, so `Über uns` becomes `ber-uns`.
#[must_use]
pub fn create_handle(text: &str) -> String {
    let stripped = crate::output::strip_tags(text);
    let mut handle = String::with_capacity(stripped.len());
    let mut pending_separator = false;
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !handle.is_empty() {
                handle.push('-');
            }
            pending_separator = false;
            handle.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    handle
}

/// Element name derived from a label. Leading `_` and `-` are dropped and
/// a name starting with a digit gets a `field-` prefix, so any non-empty
/// result satisfies the element-name grammar.
#[must_use]
pub fn element_name_from_label(label: &str) -> String {
    let handle = create_handle(label);
    let name = handle.trim_start_matches(['_', '-']);
    match name.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("field-{name}"),
        _ => name.to_string(),
    }
}

/// What a commit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Created(FieldId),
    Updated(FieldId),
}

impl CommitOutcome {
    #[must_use]
    pub const fn id(self) -> FieldId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// A storage table column beyond the fixed `id` and `entry_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    /// Type and constraints, e.g. `TEXT DEFAULT NULL`.
    pub definition: String,
    pub indexed: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            indexed: false,
        }
    }

    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}

/// Schema of a field instance's storage table.
///
/// Always carries a surrogate primary key and an indexed `entry_id`; field
/// types add their value columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTable {
    field: FieldId,
    columns: Vec<ColumnDef>,
}

impl StorageTable {
    #[must_use]
    pub const fn new(field: FieldId) -> Self {
        Self {
            field,
            columns: Vec::new(),
        }
    }

    /// Schema for a committed instance.
    pub fn for_field(field: &FieldInstance) -> FieldResult<Self> {
        Ok(Self::new(field.require_id()?))
    }

    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds the default nullable, indexed `value` column.
    #[must_use]
    pub fn with_value_column(self) -> Self {
        self.column(ColumnDef::new("value", "TEXT DEFAULT NULL").indexed())
    }

    #[must_use]
    pub fn name(&self) -> String {
        storage_table_name(self.field)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// The `CREATE TABLE` and `CREATE INDEX` statements, all idempotent.
    pub fn statements(&self) -> FieldResult<Vec<SqlFragment>> {
        let name = self.name();
        let table = quote_ident(&name)?;

        let mut definitions = vec![
            "id INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            "entry_id INTEGER NOT NULL".to_string(),
        ];
        for column in &self.columns {
            definitions.push(format!("{} {}", quote_ident(&column.name)?, column.definition));
        }

        let mut statements = vec![SqlFragment::sql(format!(
            "CREATE TABLE IF NOT EXISTS {table} (\n  {}\n)",
            definitions.join(",\n  ")
        ))];

        let indexed = std::iter::once("entry_id")
            .chain(self.columns.iter().filter(|c| c.indexed).map(|c| c.name.as_str()));
        for column in indexed {
            statements.push(SqlFragment::sql(format!(
                "CREATE INDEX IF NOT EXISTS {} ON {table} ({})",
                quote_ident(&format!("{name}_{column}"))?,
                quote_ident(column)?
            )));
        }
        Ok(statements)
    }

    /// Creates the table and its indexes if they do not exist. A table that
    /// turns out to exist after a failed create (a concurrent creator won
    /// the race) counts as success.
    pub fn create(&self, gateway: &dyn StorageGateway) -> FieldResult<()> {
        let name = self.name();
        for statement in self.statements()? {
            if let Err(e) = gateway.execute(&statement) {
                if gateway.table_exists(&name)? {
                    debug!("Storage table {} already provisioned: {}", name, e);
                    continue;
                }
                return Err(e.into());
            }
        }
        info!("Provisioned storage table {}", name);
        Ok(())
    }
}

/// Default provisioning: the minimal schema with a single `value` column.
pub fn default_storage_table(field: &FieldInstance) -> FieldResult<()> {
    StorageTable::for_field(field)?
        .with_value_column()
        .create(field.context().gateway.as_ref())
}

/// Default cleanup: delete every row the entry holds in the storage table.
pub fn delete_entry_rows(field: &FieldInstance, entry_id: EntryId) -> FieldResult<()> {
    let table = field.storage_table()?;
    let removed = field
        .context()
        .gateway
        .delete(&table, &SqlFragment::sql("entry_id = ").bind(entry_id))?;
    debug!("Removed {} rows of entry {} from {}", removed, entry_id, table);
    Ok(())
}

impl FieldInstance {
    /// Persists the definition.
    ///
    /// A missing element name is derived from the label first. A new
    /// instance is added through the section registry, receives its id and
    /// gets its storage table; a persisted one is edited in place. If the
    /// storage table cannot be provisioned the definition is removed from
    /// the registry again and the id withdrawn.
    pub fn commit(&mut self) -> FieldResult<CommitOutcome> {
        if self.element_name().is_empty() {
            let derived = element_name_from_label(self.label());
            self.set(keys::ELEMENT_NAME, derived);
        }
        let record = self.record();

        if let Some(id) = self.id() {
            self.context().sections.edit(id, &record)?;
            info!("Updated field '{}' ({})", record.element_name, id);
            return Ok(CommitOutcome::Updated(id));
        }

        let id = self.context().sections.add(&record)?;
        self.assign_id(id)?;
        if let Err(e) = self.create_storage_table() {
            warn!("Storage for field {} could not be provisioned: {}", id, e);
            if let Err(undo) = self.context().sections.remove(id) {
                warn!("Field {} left behind after failed provisioning: {}", id, undo);
            }
            self.clear_id();
            return Err(e);
        }
        info!(
            "Created field '{}' ({}) of type {}",
            record.element_name, id, record.field_type
        );
        Ok(CommitOutcome::Created(id))
    }

    /// Provisions the storage table through the field type.
    pub fn create_storage_table(&self) -> FieldResult<()> {
        self.kind().create_storage_table(self)
    }

    /// Removes an entry's data through the field type.
    pub fn entry_data_cleanup(&self, entry_id: EntryId) -> FieldResult<()> {
        self.kind().entry_data_cleanup(self, entry_id)
    }

    /// Converts a submitted value into storable entry data through the
    /// field type.
    pub fn process_raw_field_data(
        &self,
        data: &str,
        simulate: bool,
        entry_id: Option<EntryId>,
    ) -> ProcessedData {
        self.kind().process_raw_field_data(self, data, simulate, entry_id)
    }

    /// Writes one row of entry data to the storage table.
    pub fn store_entry_data(&self, entry_id: EntryId, data: &EntryData) -> FieldResult<i64> {
        let table = self.storage_table()?;
        let mut row = Row::new().with("entry_id", entry_id);
        for (column, value) in data {
            row.set(column.as_str(), value.clone());
        }
        Ok(self.context().gateway.insert(&table, &row)?)
    }

    /// Reads an entry's rows back, without the surrogate and entry columns.
    pub fn entry_data(&self, entry_id: EntryId) -> FieldResult<Vec<EntryData>> {
        let table = quote_ident(&self.storage_table()?)?;
        let rows = self.context().gateway.fetch_all(
            &SqlFragment::sql(format!("SELECT * FROM {table} WHERE entry_id = "))
                .bind(entry_id)
                .push(" ORDER BY id"),
        )?;
        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|(column, _)| !matches!(*column, "id" | "entry_id"))
                    .map(|(column, value)| (column.to_string(), value.clone()))
                    .collect()
            })
            .collect())
    }
}
