use fieldkit_types::{FieldFilter, FieldStatus, Location, YesNo, status_from_code};

// ── FieldStatus ───────────────────────────────────────────────────

#[test]
fn status_codes_are_stable() {
    assert_eq!(FieldStatus::Ok.code(), 100);
    assert_eq!(FieldStatus::Error.code(), 150);
    assert_eq!(FieldStatus::MissingFields.code(), 200);
    assert_eq!(FieldStatus::InvalidFields.code(), 220);
    assert_eq!(FieldStatus::Duplicate.code(), 300);
    assert_eq!(FieldStatus::ErrorCustom.code(), 400);
    assert_eq!(FieldStatus::InvalidQName.code(), 500);
}

#[test]
fn status_from_code_resolves_every_status() {
    for status in [
        FieldStatus::Ok,
        FieldStatus::Error,
        FieldStatus::MissingFields,
        FieldStatus::InvalidFields,
        FieldStatus::Duplicate,
        FieldStatus::ErrorCustom,
        FieldStatus::InvalidQName,
    ] {
        assert_eq!(FieldStatus::from_code(status.code()), Some(status));
    }
}

#[test]
fn unknown_status_code_is_an_error() {
    assert!(FieldStatus::from_code(101).is_none());
    assert!(status_from_code(999).is_err());
    assert_eq!(status_from_code(200).unwrap(), FieldStatus::MissingFields);
}

#[test]
fn only_ok_is_ok() {
    assert!(FieldStatus::Ok.is_ok());
    assert!(!FieldStatus::Error.is_ok());
    assert!(!FieldStatus::MissingFields.is_ok());
}

#[test]
fn status_display_includes_code() {
    assert_eq!(FieldStatus::MissingFields.to_string(), "missing fields (200)");
}

// ── FieldFilter ───────────────────────────────────────────────────

#[test]
fn filter_codes_are_stable() {
    assert_eq!(FieldFilter::ToggleableOnly.code(), 600);
    assert_eq!(FieldFilter::UntoggleableOnly.code(), 700);
    assert_eq!(FieldFilter::FilterableOnly.code(), 800);
    assert_eq!(FieldFilter::UnfilterableOnly.code(), 900);
    assert_eq!(FieldFilter::All.code(), 1000);
}

#[test]
fn filter_accepts_by_capability() {
    assert!(FieldFilter::ToggleableOnly.accepts(true, false));
    assert!(!FieldFilter::ToggleableOnly.accepts(false, true));
    assert!(FieldFilter::UntoggleableOnly.accepts(false, true));
    assert!(FieldFilter::FilterableOnly.accepts(false, true));
    assert!(!FieldFilter::UnfilterableOnly.accepts(false, true));
    assert!(FieldFilter::All.accepts(false, false));
}

// ── Flags ─────────────────────────────────────────────────────────

#[test]
fn yes_no_from_form_only_accepts_literal_yes() {
    assert_eq!(YesNo::from_form(Some("yes")), YesNo::Yes);
    assert_eq!(YesNo::from_form(Some("YES")), YesNo::No);
    assert_eq!(YesNo::from_form(Some("on")), YesNo::No);
    assert_eq!(YesNo::from_form(None), YesNo::No);
}

#[test]
fn yes_no_text_form() {
    assert_eq!(YesNo::Yes.as_str(), "yes");
    assert_eq!(YesNo::from(false).to_string(), "no");
}

#[test]
fn location_parse_falls_back_to_main() {
    assert_eq!(Location::parse("sidebar"), Location::Sidebar);
    assert_eq!(Location::parse("Sidebar"), Location::Sidebar);
    assert_eq!(Location::parse("footer"), Location::Main);
    assert_eq!(Location::default().as_str(), "main");
}
