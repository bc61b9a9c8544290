//! Query fragments a field contributes to an entry listing.
//!
//! Joins, predicates and ordering are collected into an [`EntryQuery`]. The
//! entries relation is always aliased `e`; sorting joins the field's storage
//! table as `ed`; every filter join gets a fresh `t<id>_<n>` alias from the
//! instance's counter.

use crate::error::FieldResult;
use crate::instance::FieldInstance;
use crate::output::decode_entities;
use fieldkit_db::{SqlFragment, quote_ident};
use tracing::debug;

/// Case-insensitive prefix marking a regular-expression filter value.
pub const REGEX_PREFIX: &str = "regexp:";

/// Alias of the storage table joined for sorting.
pub const SORT_ALIAS: &str = "ed";

/// Alias of the entries relation.
pub const ENTRIES_ALIAS: &str = "e";

/// Sort direction requested by a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
    Random,
}

impl SortOrder {
    /// `random` and `rand` in any case mean random order, `desc` means
    /// descending, and everything else ascending.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("random") || value.eq_ignore_ascii_case("rand") {
            Self::Random
        } else if value.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Random => "RANDOM()",
        }
    }
}

/// How a set of filter values is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterMode {
    /// First value carried the regex prefix; holds the bare pattern.
    Regex(String),
    /// Every value must match, one join each.
    Intersect,
    /// Any value may match, one shared join.
    Union,
}

impl FilterMode {
    /// Picks the mode. Only the first value is inspected for the regex
    /// prefix.
    #[must_use]
    pub fn detect(values: &[String], intersect: bool) -> Self {
        if let Some(first) = values.first() {
            if let Some(prefix) = first.get(..REGEX_PREFIX.len()) {
                if prefix.eq_ignore_ascii_case(REGEX_PREFIX) {
                    return Self::Regex(first[REGEX_PREFIX.len()..].to_string());
                }
            }
        }
        if intersect { Self::Intersect } else { Self::Union }
    }
}

/// Accumulated joins, where-predicates and ordering of an entry listing.
#[derive(Debug, Clone, Default)]
pub struct EntryQuery {
    joins: Vec<SqlFragment>,
    conditions: Vec<SqlFragment>,
    sort: Option<SqlFragment>,
    group_by_entry: bool,
}

impl EntryQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_join(&mut self, join: SqlFragment) {
        self.joins.push(join);
    }

    pub fn add_condition(&mut self, condition: SqlFragment) {
        self.conditions.push(condition);
    }

    /// Replaces the ordering. Only one field sorts a listing.
    pub fn set_sort(&mut self, sort: SqlFragment) {
        self.sort = Some(sort);
    }

    pub fn require_grouping(&mut self) {
        self.group_by_entry = true;
    }

    pub fn joins(&self) -> &[SqlFragment] {
        &self.joins
    }

    pub fn conditions(&self) -> &[SqlFragment] {
        &self.conditions
    }

    pub fn sort(&self) -> Option<&SqlFragment> {
        self.sort.as_ref()
    }

    pub fn needs_grouping(&self) -> bool {
        self.group_by_entry
    }

    /// Every join, space-separated.
    #[must_use]
    pub fn joins_sql(&self) -> SqlFragment {
        SqlFragment::join(&self.joins, " ")
    }

    /// Every predicate as ` AND <predicate>`, ready to follow `WHERE 1`.
    #[must_use]
    pub fn where_sql(&self) -> SqlFragment {
        let mut out = SqlFragment::new();
        for condition in &self.conditions {
            out.push_str(" AND ");
            out.append(condition);
        }
        out
    }

    /// The ordering, or ascending entry id when no field sorts.
    #[must_use]
    pub fn sort_sql(&self) -> SqlFragment {
        self.sort
            .clone()
            .unwrap_or_else(|| SqlFragment::sql(format!("ORDER BY {ENTRIES_ALIAS}.id ASC")))
    }

    /// Full statement selecting matching entry ids from `entries_table`.
    pub fn select_entry_ids(&self, entries_table: &str) -> FieldResult<SqlFragment> {
        let mut statement = SqlFragment::sql(format!(
            "SELECT {ENTRIES_ALIAS}.id FROM {} AS {ENTRIES_ALIAS}",
            quote_ident(entries_table)?
        ));
        if !self.joins.is_empty() {
            statement.push_str(" ");
            statement.append(&self.joins_sql());
        }
        statement.push_str(" WHERE 1");
        statement.append(&self.where_sql());
        if self.group_by_entry {
            statement.push_str(format!(" GROUP BY {ENTRIES_ALIAS}.id"));
        }
        statement.push_str(" ");
        statement.append(&self.sort_sql());
        Ok(statement)
    }
}

/// Default sorting: left outer join on the storage table and order by its
/// `value` column, or randomly. The join is added for every order.
pub fn default_sorting(field: &FieldInstance, query: &mut EntryQuery, order: SortOrder) -> FieldResult<()> {
    let table = quote_ident(&field.storage_table()?)?;
    query.add_join(SqlFragment::sql(format!(
        "LEFT OUTER JOIN {table} AS {SORT_ALIAS} ON ({ENTRIES_ALIAS}.id = {SORT_ALIAS}.entry_id)"
    )));
    let sort = match order {
        SortOrder::Random => "ORDER BY RANDOM()".to_string(),
        _ => format!("ORDER BY {SORT_ALIAS}.value {}", order.as_sql()),
    };
    query.set_sort(SqlFragment::sql(sort));
    Ok(())
}

fn filter_join(field: &FieldInstance, query: &mut EntryQuery) -> FieldResult<String> {
    let alias = field.next_alias()?;
    let table = quote_ident(&field.storage_table()?)?;
    query.add_join(SqlFragment::sql(format!(
        "LEFT JOIN {table} AS {alias} ON ({ENTRIES_ALIAS}.id = {alias}.entry_id)"
    )));
    Ok(alias)
}

/// Default filtering against the storage table's `value` column. An empty
/// value list adds nothing.
pub fn default_filter(
    field: &FieldInstance,
    values: &[String],
    query: &mut EntryQuery,
    intersect: bool,
) -> FieldResult<bool> {
    if values.is_empty() {
        return Ok(true);
    }
    let mode = FilterMode::detect(values, intersect);
    debug!("Filtering field {:?} with {:?}", field.id(), mode);

    match mode {
        FilterMode::Regex(pattern) => {
            let alias = filter_join(field, query)?;
            query.add_condition(
                SqlFragment::sql(format!("{alias}.value REGEXP ")).bind(decode_entities(&pattern)),
            );
        }
        FilterMode::Intersect => {
            for value in values {
                let alias = filter_join(field, query)?;
                query.add_condition(
                    SqlFragment::sql(format!("{alias}.value = ")).bind(decode_entities(value)),
                );
            }
        }
        FilterMode::Union => {
            let alias = filter_join(field, query)?;
            query.add_condition(
                SqlFragment::sql(format!("{alias}.value IN ("))
                    .bind_list(values.iter().map(|v| decode_entities(v)))
                    .push(")"),
            );
        }
    }
    Ok(true)
}

impl FieldInstance {
    /// Adds this field's ordering. Fails for types that are not sortable.
    pub fn build_sorting_sql(&self, query: &mut EntryQuery, order: SortOrder) -> FieldResult<()> {
        self.ensure(self.kind().is_sortable(), "sorting")?;
        self.kind().build_sorting_sql(self, query, order)
    }

    /// Adds this field's filter. Fails for types that cannot filter;
    /// `Ok(false)` means the type rejected the filter shape.
    pub fn build_filter_sql(
        &self,
        values: &[String],
        query: &mut EntryQuery,
        intersect: bool,
    ) -> FieldResult<bool> {
        self.ensure(self.kind().can_filter(), "filtering")?;
        self.kind().build_filter_sql(self, values, query, intersect)
    }
}
