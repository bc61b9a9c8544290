use fieldkit_field::{FieldConfig, FieldError};
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn defaults() {
    let config = FieldConfig::default();
    assert_eq!(config.cell_truncation_length, 75);
    assert_eq!(config.entries_table, "entries");
}

#[test]
fn parses_fields_table() {
    let config = FieldConfig::from_toml_str(
        r#"
        [fields]
        cell_truncation_length = 20
        "#,
    )
    .unwrap();
    assert_eq!(config.cell_truncation_length, 20);
    assert_eq!(config.entries_table, "entries");
}

#[test]
fn missing_table_means_defaults() {
    assert_eq!(FieldConfig::from_toml_str("").unwrap(), FieldConfig::default());
}

#[test]
fn invalid_toml_is_an_error() {
    assert!(matches!(
        FieldConfig::from_toml_str("[fields]\ncell_truncation_length = \"many\""),
        Err(FieldError::Config(_))
    ));
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[fields]\nentries_table = \"posts\"").unwrap();
    let config = FieldConfig::load_from(file.path());
    assert_eq!(config.entries_table, "posts");
    assert_eq!(config.cell_truncation_length, 75);
}

#[test]
fn load_falls_back_on_missing_or_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(FieldConfig::load_from(dir.path().join("absent.toml")), FieldConfig::default());

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "[fields\n").unwrap();
    assert_eq!(FieldConfig::load_from(&broken), FieldConfig::default());
}
