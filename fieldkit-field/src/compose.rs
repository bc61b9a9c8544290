//! Builds one entry listing query out of several fields' fragments.

use crate::context::FieldContext;
use crate::error::{FieldError, FieldResult};
use crate::instance::FieldInstance;
use crate::query::{EntryQuery, FilterMode, SortOrder};
use fieldkit_db::SqlFragment;
use fieldkit_types::FieldId;
use std::collections::BTreeMap;
use tracing::debug;

/// A filter on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: FieldId,
    pub values: Vec<String>,
    pub intersect: bool,
}

impl FilterClause {
    pub fn new<I, S>(field: FieldId, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field,
            values: values.into_iter().map(Into::into).collect(),
            intersect: false,
        }
    }

    #[must_use]
    pub fn intersect(mut self) -> Self {
        self.intersect = true;
        self
    }
}

/// What a data source asks of an entry listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    pub filters: Vec<FilterClause>,
    pub sort: Option<(FieldId, SortOrder)>,
}

impl QueryPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: FilterClause) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: FieldId, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }
}

/// Composes the fragments of `fields` according to `plan`.
///
/// Every referenced field must be among `fields` and committed. Filters are
/// applied in field order (`sortorder`, then id) with alias counters reset
/// first, so the same plan always renders the same SQL. A filter or sort
/// through a type lacking the capability fails with
/// [`FieldError::Unsupported`].
pub fn compose_entry_query(fields: &[FieldInstance], plan: &QueryPlan) -> FieldResult<EntryQuery> {
    let by_id: BTreeMap<FieldId, &FieldInstance> = fields
        .iter()
        .filter_map(|field| field.id().map(|id| (id, field)))
        .collect();

    let referenced = plan
        .filters
        .iter()
        .map(|f| f.field)
        .chain(plan.sort.map(|(field, _)| field));
    for id in referenced {
        if !by_id.contains_key(&id) {
            return Err(FieldError::UnknownField(id));
        }
    }

    let mut ordered: Vec<&FieldInstance> = by_id.values().copied().collect();
    ordered.sort_by_key(|field| (field.sort_order(), field.id()));
    for field in &ordered {
        field.reset_aliases();
    }

    let mut query = EntryQuery::new();
    for field in &ordered {
        let Some(id) = field.id() else { continue };
        for filter in plan.filters.iter().filter(|f| f.field == id) {
            if !field.build_filter_sql(&filter.values, &mut query, filter.intersect)? {
                return Err(FieldError::unsupported(field.handle(), "this filter shape"));
            }
            let spans_union = filter.values.len() > 1
                && FilterMode::detect(&filter.values, filter.intersect) == FilterMode::Union;
            if field.kind().requires_sql_grouping() || spans_union {
                query.require_grouping();
            }
        }
    }

    if let Some((id, order)) = plan.sort {
        if let Some(field) = by_id.get(&id) {
            field.build_sorting_sql(&mut query, order)?;
        }
    }

    debug!(
        "Composed entry query: {} joins, {} conditions, grouping {}",
        query.joins().len(),
        query.conditions().len(),
        query.needs_grouping()
    );
    Ok(query)
}

/// Composes `plan` and renders the id selection against the entries table
/// named in `ctx.config`.
pub fn compose_entry_statement(
    ctx: &FieldContext,
    fields: &[FieldInstance],
    plan: &QueryPlan,
) -> FieldResult<SqlFragment> {
    compose_entry_query(fields, plan)?.select_entry_ids(&ctx.config.entries_table)
}
