//! Presentation of stored entry data: table cells, parameter pools and
//! structured output.

use crate::capability::ToggleState;
use crate::error::FieldResult;
use crate::field_type::{EntryData, EntryRecord, FormattedElement, RecordGroup};
use crate::instance::FieldInstance;
use fieldkit_types::{EntryId, FieldId};

/// Message key shown for an empty cell.
pub const EMPTY_CELL: &str = "None";

/// Removes markup tags, keeping their text content.
#[must_use]
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Escapes the five markup-significant characters.
#[must_use]
pub fn encode_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Decodes named and numeric character references. Unknown or malformed
/// references are kept verbatim.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail
            .find(';')
            .filter(|&end| end > 1 && end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Truncates to `limit` characters, appending `...` when anything was cut.
#[must_use]
pub fn truncate_cell(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Default table value: the stored `value` without markup, truncated, or
/// the translated empty marker.
pub fn table_value(field: &FieldInstance, data: &EntryData) -> String {
    let ctx = field.context();
    let text = data
        .get("value")
        .map(|v| strip_tags(&v.to_text()))
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return ctx.t(EMPTY_CELL, &[]);
    }
    truncate_cell(text, ctx.config.cell_truncation_length)
}

impl FieldInstance {
    pub fn prepare_table_value(&self, data: &EntryData) -> String {
        self.kind().prepare_table_value(self, data)
    }

    pub fn parameter_pool_value(&self, data: &EntryData) -> String {
        self.kind().parameter_pool_value(self, data)
    }

    pub fn formatted_element(
        &self,
        data: &EntryData,
        encode: bool,
        mode: Option<&str>,
        entry_id: Option<EntryId>,
    ) -> FormattedElement {
        self.kind().formatted_element(self, data, encode, mode, entry_id)
    }

    pub fn includable_elements(&self) -> Vec<String> {
        self.kind().includable_elements(self)
    }

    /// Decodes character references and escapes the result for embedding
    /// as a literal through the gateway.
    pub fn clean_value(&self, value: &str) -> String {
        self.context().gateway.escape(&decode_entities(value))
    }

    /// States this field can be switched to; empty unless it toggles.
    pub fn toggle_states(&self) -> Vec<ToggleState> {
        if self.kind().can_toggle() {
            self.kind().toggle_states()
        } else {
            Vec::new()
        }
    }

    /// Rewrites entry data for a new toggle state. Fails for types that do
    /// not toggle.
    pub fn toggle_field_data(&self, data: EntryData, new_state: &str) -> FieldResult<EntryData> {
        self.ensure(self.kind().can_toggle(), "toggling")?;
        Ok(self.kind().toggle_field_data(data, new_state))
    }

    /// Groups records by value. Fails for types that do not allow output
    /// grouping.
    pub fn group_records(&self, records: &[EntryRecord]) -> FieldResult<Vec<RecordGroup>> {
        self.ensure(
            self.kind().allow_datasource_output_grouping(),
            "data source output grouping",
        )?;
        self.kind().group_records(self, records)
    }

    pub fn associated_entry_search_value(
        &self,
        data: &str,
        field_id: Option<FieldId>,
        parent_entry_id: Option<EntryId>,
    ) -> String {
        self.kind()
            .associated_entry_search_value(data, field_id, parent_entry_id)
    }

    pub fn associated_entry_count(&self, value: &str) -> FieldResult<Option<u64>> {
        self.kind().associated_entry_count(self, value)
    }

    pub fn associated_entry_ids(&self, value: &str) -> FieldResult<Vec<EntryId>> {
        self.kind().associated_entry_ids(self, value)
    }
}
