use super::*;
use chrono::TimeZone;

#[test]
fn rfc3339_and_naive_dates_parse_to_utc() {
    let expected = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    assert_eq!(parse_instant("2026-03-01T09:30:00Z").unwrap(), expected);
    assert_eq!(parse_instant("2026-03-01T10:30:00+01:00").unwrap(), expected);
    assert_eq!(parse_instant("2026-03-01T09:30").unwrap(), expected);
    assert_eq!(parse_instant(" 2026-03-01 09:30:00 ").unwrap(), expected);
    assert_eq!(
        parse_instant("2026-03-01").unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn garbage_date_is_a_validation_error() {
    let err = parse_instant("next tuesday").unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn minimal_json_row_uses_defaults() {
    let rec: TimerRecord = serde_json::from_str(
        r##"{"id":"abc","end_date":"2026-03-01T00:00:00Z","color":"#ff0000"}"##,
    )
    .unwrap();
    assert_eq!(rec.style, "modern");
    assert!(rec.active);
    assert_eq!(rec.views, 0);

    let spec = rec.to_spec().unwrap();
    assert_eq!(spec.timezone, "UTC");
    assert_eq!(spec.style, StyleId::Modern);
    assert_eq!(spec.language, Language::En);
    assert_eq!(spec.color, Rgb8::new(255, 0, 0));
}

#[test]
fn unknown_style_and_language_fall_back() {
    let mut rec = TimerRecord::new("x", "2026-03-01T00:00:00Z", "#00ff00");
    rec.style = "holographic".into();
    rec.language = Some("xx".into());
    rec.timezone = Some("Mars/Olympus".into());
    let spec = rec.to_spec().unwrap();
    assert_eq!(spec.style, StyleId::Modern);
    assert_eq!(spec.language, Language::En);
    // the engine resolves unknown zones to UTC at render time
    assert_eq!(spec.timezone, "Mars/Olympus");
}

#[test]
fn full_row_resolves_every_field() {
    let mut rec = TimerRecord::new("x", "2026-03-01T00:00:00Z", "#123abc");
    rec.style = "Neon".into();
    rec.language = Some("fr".into());
    rec.timezone = Some("Europe/Paris".into());
    let spec = rec.to_spec().unwrap();
    assert_eq!(spec.style, StyleId::Neon);
    assert_eq!(spec.language, Language::Fr);
    assert_eq!(spec.timezone, "Europe/Paris");
}

#[test]
fn malformed_color_is_rejected() {
    let rec = TimerRecord::new("x", "2026-03-01T00:00:00Z", "red");
    assert!(rec.to_spec().is_err());
}
