//! Parent/child links between sections through fields.

use crate::context::FieldContext;
use crate::error::{FieldError, FieldResult};
use crate::instance::FieldInstance;
use fieldkit_db::{Row, SqlFragment, StorageGateway};
use fieldkit_types::{FieldId, SectionId, YesNo};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const ASSOCIATION_TABLE: &str = "sections_association";

/// One stored section association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAssociation {
    pub parent_section_id: SectionId,
    pub parent_section_field_id: Option<FieldId>,
    pub child_section_id: SectionId,
    pub child_section_field_id: FieldId,
    pub cascading_deletion: YesNo,
}

impl SectionAssociation {
    #[must_use]
    pub fn to_row(&self) -> Row {
        Row::new()
            .with("parent_section_id", self.parent_section_id)
            .with("parent_section_field_id", self.parent_section_field_id)
            .with("child_section_id", self.child_section_id)
            .with("child_section_field_id", self.child_section_field_id)
            .with("cascading_deletion", self.cascading_deletion.as_str())
    }

    /// `None` when a required column is missing.
    #[must_use]
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            parent_section_id: SectionId::new(row.get_i64("parent_section_id")?),
            parent_section_field_id: row.get_i64("parent_section_field_id").map(FieldId::new),
            child_section_id: SectionId::new(row.get_i64("child_section_id")?),
            child_section_field_id: FieldId::new(row.get_i64("child_section_field_id")?),
            cascading_deletion: YesNo::from_form(row.get_str("cascading_deletion")),
        })
    }
}

pub(crate) fn install_table(gateway: &dyn StorageGateway) -> FieldResult<()> {
    gateway.execute(&SqlFragment::sql(
        "CREATE TABLE IF NOT EXISTS \"sections_association\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            parent_section_id INTEGER NOT NULL,
            parent_section_field_id INTEGER,
            child_section_id INTEGER NOT NULL,
            child_section_field_id INTEGER NOT NULL,
            cascading_deletion TEXT NOT NULL DEFAULT 'no'
        )",
    ))?;
    gateway.execute(&SqlFragment::sql(
        "CREATE INDEX IF NOT EXISTS \"sections_association_child\" \
         ON \"sections_association\" (child_section_field_id)",
    ))?;
    Ok(())
}

fn resolve_section(ctx: &FieldContext, field: FieldId) -> FieldResult<SectionId> {
    ctx.sections.section_of(field)?.ok_or_else(|| {
        warn!("Cannot resolve the section of field {}", field);
        FieldError::UnknownField(field)
    })
}

/// Links `child_field` to a parent section.
///
/// The parent section is resolved from `parent_field` when not given; the
/// child section always comes from `child_field`.
pub fn create_section_association(
    ctx: &FieldContext,
    parent_section: Option<SectionId>,
    child_field: FieldId,
    parent_field: Option<FieldId>,
    cascading_deletion: bool,
) -> FieldResult<SectionAssociation> {
    let parent_section_id = match (parent_section, parent_field) {
        (Some(section), _) => section,
        (None, Some(field)) => resolve_section(ctx, field)?,
        (None, None) => return Err(FieldError::MissingAssociationParent),
    };
    let association = SectionAssociation {
        parent_section_id,
        parent_section_field_id: parent_field,
        child_section_id: resolve_section(ctx, child_field)?,
        child_section_field_id: child_field,
        cascading_deletion: YesNo::from(cascading_deletion),
    };
    ctx.gateway.insert(ASSOCIATION_TABLE, &association.to_row())?;
    info!(
        "Associated field {} of section {} with section {}",
        child_field, association.child_section_id, parent_section_id
    );
    Ok(association)
}

/// Deletes every association whose child field is `child_field`, returning
/// how many went.
pub fn remove_section_association(ctx: &FieldContext, child_field: FieldId) -> FieldResult<usize> {
    let removed = ctx.gateway.delete(
        ASSOCIATION_TABLE,
        &SqlFragment::sql("child_section_field_id = ").bind(child_field),
    )?;
    debug!("Removed {} associations of field {}", removed, child_field);
    Ok(removed)
}

/// Associations whose parent is `section`.
pub fn associations_for_parent(
    ctx: &FieldContext,
    section: SectionId,
) -> FieldResult<Vec<SectionAssociation>> {
    let rows = ctx.gateway.fetch_all(
        &SqlFragment::sql("SELECT * FROM \"sections_association\" WHERE parent_section_id = ")
            .bind(section)
            .push(" ORDER BY id"),
    )?;
    Ok(rows.iter().filter_map(SectionAssociation::from_row).collect())
}

impl FieldInstance {
    /// Links this committed field, as the child, to a parent section.
    pub fn create_section_association(
        &self,
        parent_section: Option<SectionId>,
        parent_field: Option<FieldId>,
        cascading_deletion: bool,
    ) -> FieldResult<SectionAssociation> {
        create_section_association(
            self.context(),
            parent_section,
            self.require_id()?,
            parent_field,
            cascading_deletion,
        )
    }

    /// Drops every association this field is the child of.
    pub fn remove_section_association(&self) -> FieldResult<usize> {
        remove_section_association(self.context(), self.require_id()?)
    }
}
