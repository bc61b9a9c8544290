#![allow(dead_code)]

use fieldkit_db::{SqliteGateway, StorageGateway};
use fieldkit_field::{
    FieldContext, FieldError, FieldInstance, FieldRecord, FieldResult, FieldTable, FieldTypes,
    SectionRegistry,
};
use fieldkit_types::{FieldId, SectionId};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory SQLite with the fields, association and entries tables.
pub struct Harness {
    pub sqlite: Arc<SqliteGateway>,
    pub table: Arc<FieldTable>,
    pub ctx: FieldContext,
    pub types: FieldTypes,
}

impl Harness {
    pub fn new() -> Self {
        let sqlite = Arc::new(SqliteGateway::open_in_memory().unwrap());
        Self::with_gateway(sqlite)
    }

    pub fn with_gateway(sqlite: Arc<SqliteGateway>) -> Self {
        sqlite
            .execute_batch("CREATE TABLE IF NOT EXISTS entries (id INTEGER PRIMARY KEY, section_id INTEGER);")
            .unwrap();
        let gateway: Arc<dyn StorageGateway> = sqlite.clone();
        let table = Arc::new(FieldTable::new(gateway.clone()));
        table.install().unwrap();
        let ctx = FieldContext::new(gateway, table.clone());
        Self {
            sqlite,
            table,
            ctx,
            types: FieldTypes::with_builtins(),
        }
    }

    pub fn field(&self, handle: &str, label: &str, section: i64) -> FieldInstance {
        let mut field = self.types.instance(handle, self.ctx.clone()).unwrap();
        field.set("label", label);
        field.set("parent_section", section);
        field
    }

    pub fn committed(&self, handle: &str, label: &str, section: i64) -> FieldInstance {
        let mut field = self.field(handle, label, section);
        field.commit().unwrap();
        field
    }

    pub fn add_entries(&self, ids: &[i64]) {
        for id in ids {
            self.sqlite
                .execute_batch(&format!("INSERT INTO entries (id, section_id) VALUES ({id}, 1);"))
                .unwrap();
        }
    }
}

/// Registry that records calls instead of persisting.
#[derive(Default)]
pub struct CountingRegistry {
    next_id: AtomicI64,
    pub adds: AtomicUsize,
    pub edits: Mutex<Vec<(FieldId, FieldRecord)>>,
    pub removed: Mutex<Vec<FieldId>>,
    pub fail_adds: bool,
}

impl CountingRegistry {
    pub fn failing() -> Self {
        Self {
            fail_adds: true,
            ..Self::default()
        }
    }

    pub fn add_count(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
    }

    pub fn edit_count(&self) -> usize {
        self.edits.lock().unwrap().len()
    }
}

impl SectionRegistry for CountingRegistry {
    fn add(&self, _record: &FieldRecord) -> FieldResult<FieldId> {
        if self.fail_adds {
            return Err(FieldError::UnknownField(FieldId::new(0)));
        }
        self.adds.fetch_add(1, Ordering::SeqCst);
        Ok(FieldId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    fn edit(&self, id: FieldId, record: &FieldRecord) -> FieldResult<()> {
        self.edits.lock().unwrap().push((id, record.clone()));
        Ok(())
    }

    fn remove(&self, id: FieldId) -> FieldResult<()> {
        self.removed.lock().unwrap().push(id);
        Ok(())
    }

    fn section_of(&self, _field: FieldId) -> FieldResult<Option<SectionId>> {
        Ok(Some(SectionId::new(1)))
    }

    fn element_name_taken(
        &self,
        _section: SectionId,
        _element_name: &str,
        _excluding: Option<FieldId>,
    ) -> FieldResult<bool> {
        Ok(false)
    }
}
