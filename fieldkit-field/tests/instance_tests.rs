mod common;

use common::Harness;
use fieldkit_field::{
    BaseField, Capabilities, FieldError, FieldInstance, FieldType, FieldTypes, Settings,
    ToggleState, value_data,
};
use fieldkit_types::{FieldFilter, Location, SettingValue, YesNo};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn fresh_instance_has_default_capabilities() {
    let h = Harness::new();
    let field = FieldInstance::new(Arc::new(BaseField), h.ctx.clone());
    let caps = field.capabilities();

    assert!(caps.can_show_table_column);
    assert!(!caps.can_toggle);
    assert!(!caps.can_filter);
    assert!(!caps.can_import);
    assert!(!caps.can_pre_populate);
    assert!(!caps.must_be_unique);
    assert!(!caps.allow_datasource_output_grouping);
    assert!(!caps.allow_datasource_param_output);
    assert!(!caps.is_sortable);
    assert!(!caps.requires_sql_grouping);
    assert!(caps.toggle_states.is_empty());
    assert!(field.toggle_states().is_empty());
}

#[test]
fn settings_bag_get_set_remove() {
    let h = Harness::new();
    let mut field = FieldInstance::new(Arc::new(BaseField), h.ctx.clone());

    field.set("label", "Title");
    assert_eq!(field.get("label"), Some(&SettingValue::from("Title")));
    assert_eq!(field.label(), "Title");

    field.set("label", "Heading");
    assert_eq!(field.label(), "Heading");

    assert_eq!(field.remove("label"), Some(SettingValue::from("Heading")));
    assert_eq!(field.get("label"), None);
    assert_eq!(field.label(), "");
}

#[test]
fn settings_bag_all_and_flush() {
    let h = Harness::new();
    let mut field = FieldInstance::new(Arc::new(BaseField), h.ctx.clone());
    field.set_many(Settings::new());
    assert!(field.all().is_empty());

    let mut values = Settings::new();
    values.insert("label".into(), "Body".into());
    values.insert("sortorder".into(), 4_i64.into());
    field.set_many(values.clone());

    assert_eq!(field.all(), &values);
    assert_eq!(field.sort_order(), 4);

    field.flush();
    assert!(field.all().is_empty());
}

#[test]
fn empty_form_submission_gets_defaults() {
    let h = Harness::new();
    let mut field = FieldInstance::new(Arc::new(BaseField), h.ctx.clone());
    field.set_from_form_submission(Settings::new());

    assert_eq!(field.get("location"), Some(&SettingValue::from("main")));
    assert_eq!(field.get("required"), Some(&SettingValue::from("no")));
    assert_eq!(field.get("show_column"), Some(&SettingValue::from("no")));
    assert_eq!(field.location(), Location::Main);
}

#[test]
fn form_submission_only_accepts_literal_yes() {
    let h = Harness::new();
    let mut field = FieldInstance::new(Arc::new(BaseField), h.ctx.clone());

    let mut data = Settings::new();
    data.insert("required".into(), "yes".into());
    data.insert("show_column".into(), "on".into());
    data.insert("location".into(), "sidebar".into());
    field.set_from_form_submission(data);

    assert_eq!(field.required(), YesNo::Yes);
    assert_eq!(field.show_column(), YesNo::No);
    assert_eq!(field.location(), Location::Sidebar);
}

#[test]
fn aliases_are_unique_per_instance_and_reset() {
    let h = Harness::new();
    let field = h.committed("input", "Title", 1);
    let id = field.id().unwrap();

    let first = field.next_alias().unwrap();
    let second = field.next_alias().unwrap();
    assert_eq!(first, format!("t{id}_1"));
    assert_eq!(second, format!("t{id}_2"));
    assert_eq!(field.aliases_issued(), 2);

    field.reset_aliases();
    assert_eq!(field.next_alias().unwrap(), format!("t{id}_1"));
}

#[test]
fn aliases_need_a_committed_field() {
    let h = Harness::new();
    let field = h.field("input", "Title", 1);
    assert!(matches!(field.next_alias(), Err(FieldError::NotPersisted(_))));
}

#[test]
fn catalog_builds_instances_with_defaults() {
    let h = Harness::new();
    let checkbox = h.types.instance("checkbox", h.ctx.clone()).unwrap();
    assert_eq!(checkbox.handle(), "checkbox");
    assert_eq!(checkbox.get("default_state"), Some(&SettingValue::from("off")));

    assert!(matches!(
        h.types.instance("textarea", h.ctx.clone()),
        Err(FieldError::UnknownFieldType(handle)) if handle == "textarea"
    ));
}

#[test]
fn catalog_lists_handles_by_capability() {
    let types = FieldTypes::with_builtins();
    assert_eq!(types.handles().collect::<Vec<_>>(), vec!["checkbox", "field", "input"]);
    assert_eq!(types.handles_matching(FieldFilter::All), vec!["checkbox", "field", "input"]);
    assert_eq!(types.handles_matching(FieldFilter::ToggleableOnly), vec!["checkbox"]);
    assert_eq!(types.handles_matching(FieldFilter::UntoggleableOnly), vec!["field", "input"]);
    assert_eq!(types.handles_matching(FieldFilter::FilterableOnly), vec!["checkbox", "input"]);
    assert_eq!(types.handles_matching(FieldFilter::UnfilterableOnly), vec!["field"]);
}

#[test]
fn capabilities_serialize_for_clients() {
    let types = FieldTypes::with_builtins();
    let checkbox = types.get("checkbox").unwrap();
    let caps = Capabilities::describe(checkbox.as_ref());

    assert_eq!(
        caps.toggle_states,
        vec![ToggleState::new("yes", "Yes"), ToggleState::new("no", "No")]
    );
    assert!(caps.matches(FieldFilter::ToggleableOnly));

    let json = serde_json::to_value(&caps).unwrap();
    assert_eq!(json["handle"], "checkbox");
    assert_eq!(json["can_toggle"], true);
    assert_eq!(json["toggle_states"][0]["value"], "yes");

    let text = caps.to_json().unwrap();
    assert_eq!(serde_json::from_str::<Capabilities>(&text).unwrap(), caps);

    let all: Vec<Capabilities> = serde_json::from_str(&types.describe_all_json().unwrap()).unwrap();
    assert_eq!(all.len(), 3);
    assert!(all[1].toggle_states.is_empty());
}

struct Custom;

impl FieldType for Custom {
    fn handle(&self) -> &str {
        "custom"
    }
}

#[test]
fn registering_a_custom_type() {
    let h = Harness::new();
    let mut types = FieldTypes::new();
    types.register(Arc::new(Custom));
    assert!(types.contains("custom"));

    let field = types.instance("custom", h.ctx.clone()).unwrap();
    assert_eq!(field.kind().name(), "custom");
    assert_eq!(field.includable_elements(), vec![String::new()]);
}

#[test]
fn capability_operations_fail_fast_when_unsupported() {
    let h = Harness::new();
    let field = h.committed("field", "Plain", 1);

    assert!(matches!(
        field.toggle_field_data(value_data("x"), "yes"),
        Err(FieldError::Unsupported { capability: "toggling", .. })
    ));
    assert!(matches!(
        field.group_records(&[]),
        Err(FieldError::Unsupported { capability: "data source output grouping", .. })
    ));
}
