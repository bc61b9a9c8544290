use fieldkit_types::{SettingValue, setting_from_json};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn text_accessors() {
    let v = SettingValue::from("hello");
    assert_eq!(v.as_str(), Some("hello"));
    assert_eq!(v.as_bool(), None);
    assert!(!v.is_empty());
    assert!(SettingValue::from("").is_empty());
}

#[test]
fn numeric_text_reads_as_integer() {
    assert_eq!(SettingValue::from("12").as_i64(), Some(12));
    assert_eq!(SettingValue::from(" 4 ").as_i64(), Some(4));
    assert_eq!(SettingValue::from("x").as_i64(), None);
    assert_eq!(SettingValue::from(2.5).as_i64(), None);
    assert_eq!(SettingValue::from(3_i64).as_i64(), Some(3));
}

#[test]
fn to_text_formats_each_variant() {
    assert_eq!(SettingValue::from(3_i64).to_text(), "3");
    assert_eq!(SettingValue::from(2.5).to_text(), "2.5");
    assert_eq!(SettingValue::from(true).to_text(), "true");
    let list = SettingValue::from(vec!["a".to_string(), "b".to_string()]);
    assert_eq!(list.to_text(), "a, b");
}

#[test]
fn json_decodes_untagged() {
    assert_eq!(setting_from_json("true").unwrap(), SettingValue::Bool(true));
    assert_eq!(setting_from_json("5").unwrap(), SettingValue::Number(5.0));
    assert_eq!(
        setting_from_json(r#""main""#).unwrap(),
        SettingValue::Text("main".into())
    );
    assert_eq!(
        setting_from_json(r#"["a", 1]"#).unwrap(),
        SettingValue::List(vec![SettingValue::Text("a".into()), SettingValue::Number(1.0)])
    );
}

#[test]
fn json_rejects_null() {
    assert!(setting_from_json("null").is_err());
}

proptest! {
    #[test]
    fn integers_survive_text_rendering(n in -1_000_000_i64..1_000_000) {
        let v = SettingValue::from(n);
        prop_assert_eq!(v.to_text(), n.to_string());
        prop_assert_eq!(SettingValue::from(v.to_text()).as_i64(), Some(n));
    }
}
