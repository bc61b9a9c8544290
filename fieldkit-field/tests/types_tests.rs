mod common;

use common::Harness;
use fieldkit_db::{SqlFragment, StorageGateway};
use fieldkit_field::{EntryRecord, ErrorMap, RecordGroup, value_data};
use fieldkit_types::{EntryId, FieldStatus};
use pretty_assertions::assert_eq;

#[test]
fn input_capabilities() {
    let h = Harness::new();
    let caps = h.field("input", "Title", 1).capabilities();
    assert!(caps.can_filter && caps.is_sortable && caps.can_import);
    assert!(caps.can_pre_populate && caps.allow_datasource_param_output);
    assert!(!caps.can_toggle && !caps.allow_datasource_output_grouping);
}

#[test]
fn input_rejects_broken_validator() {
    let h = Harness::new();
    let mut field = h.field("input", "Title", 1);
    field.set("validator", "([a-z");

    let mut errors = ErrorMap::new();
    assert_eq!(field.check_fields(&mut errors, false).unwrap(), FieldStatus::Error);
    assert!(errors.contains_key("validator"));
}

#[test]
fn input_applies_validator_to_post_data() {
    let h = Harness::new();
    let mut field = h.field("input", "Email", 1);
    field.set("validator", r"^\w+@\w+\.\w+$");

    assert!(field.check_post_field_data("someone@example.com", None).is_ok());
    let check = field.check_post_field_data("nope", None);
    assert_eq!(check.status, FieldStatus::InvalidFields);
    assert_eq!(
        check.message.as_deref(),
        Some("'Email' contains invalid data. Please check the contents.")
    );
    assert!(field.check_post_field_data("", None).is_ok());

    field.set("required", "yes");
    assert_eq!(field.check_post_field_data("", None).status, FieldStatus::MissingFields);
}

#[test]
fn checkbox_toggles_between_yes_and_no() {
    let h = Harness::new();
    let field = h.committed("checkbox", "Published", 1);

    let toggled = field.toggle_field_data(value_data("no"), "yes").unwrap();
    assert_eq!(toggled, value_data("yes"));
    let toggled = field.toggle_field_data(toggled, "anything").unwrap();
    assert_eq!(toggled, value_data("no"));
    assert_eq!(field.toggle_states().len(), 2);
}

#[test]
fn checkbox_processes_raw_values() {
    let h = Harness::new();
    let field = h.field("checkbox", "Published", 1);
    assert_eq!(field.process_raw_field_data("on", false, None).data, value_data("yes"));
    assert_eq!(field.process_raw_field_data("YES", false, None).data, value_data("yes"));
    assert_eq!(field.process_raw_field_data("", false, None).data, value_data("no"));
}

#[test]
fn empty_checkbox_on_new_entry_takes_default_state() {
    let h = Harness::new();
    let mut field = h.field("checkbox", "Published", 1);
    field.set("default_state", "on");

    assert_eq!(field.process_raw_field_data("", false, None).data, value_data("yes"));
    assert_eq!(field.process_raw_field_data("no", false, None).data, value_data("no"));
    assert_eq!(
        field.process_raw_field_data("", false, Some(EntryId::new(3))).data,
        value_data("no")
    );
}

#[test]
fn required_checkbox_must_be_checked() {
    let h = Harness::new();
    let mut field = h.field("checkbox", "Agree", 1);
    field.set("required", "yes");
    assert_eq!(field.check_post_field_data("no", None).status, FieldStatus::MissingFields);
    assert!(field.check_post_field_data("on", None).is_ok());
}

#[test]
fn checkbox_storage_only_accepts_yes_or_no() {
    let h = Harness::new();
    let field = h.committed("checkbox", "Published", 1);
    field.store_entry_data(EntryId::new(1), &value_data("yes")).unwrap();
    assert!(field.store_entry_data(EntryId::new(2), &value_data("maybe")).is_err());

    let table = field.storage_table().unwrap();
    let indexed = h
        .sqlite
        .fetch_scalar(
            &SqlFragment::sql("SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND tbl_name = ")
                .bind(table.as_str()),
        )
        .unwrap();
    assert_eq!(indexed.and_then(|v| v.as_i64()), Some(2));
}

#[test]
fn checkbox_groups_yes_before_no() {
    let h = Harness::new();
    let field = h.committed("checkbox", "Published", 1);
    let records: Vec<EntryRecord> = [(1, "no"), (2, "yes"), (3, "no")]
        .into_iter()
        .map(|(id, state)| EntryRecord {
            entry_id: EntryId::new(id),
            data: value_data(state),
        })
        .collect();

    assert_eq!(
        field.group_records(&records).unwrap(),
        vec![
            RecordGroup {
                value: "yes".into(),
                entries: vec![EntryId::new(2)],
            },
            RecordGroup {
                value: "no".into(),
                entries: vec![EntryId::new(1), EntryId::new(3)],
            },
        ]
    );
}

#[test]
fn checkbox_output_values() {
    let h = Harness::new();
    let field = h.field("checkbox", "Published", 1);
    assert_eq!(field.prepare_table_value(&value_data("yes")), "Yes");
    assert_eq!(field.prepare_table_value(&value_data("no")), "No");
    assert_eq!(field.parameter_pool_value(&value_data("yes")), "yes");
}
