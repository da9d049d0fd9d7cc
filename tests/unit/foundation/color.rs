use super::*;
use serde_json::json;

#[test]
fn parses_long_and_short_hex() {
    assert_eq!(Rgb8::parse_hex("#ff0000").unwrap(), Rgb8::new(255, 0, 0));
    assert_eq!(Rgb8::parse_hex("3B82F6").unwrap(), Rgb8::new(0x3b, 0x82, 0xf6));
    assert_eq!(Rgb8::parse_hex("#0f8").unwrap(), Rgb8::new(0, 255, 136));
}

#[test]
fn rejects_malformed_hex() {
    assert!(Rgb8::parse_hex("#12345").is_err());
    assert!(Rgb8::parse_hex("#gg0000").is_err());
    assert!(Rgb8::parse_hex("").is_err());
    assert!(Rgb8::parse_hex("#ééé").is_err());
}

#[test]
fn hex_roundtrips_lowercase() {
    let c = Rgb8::parse_hex("#AbCdEf").unwrap();
    assert_eq!(c.to_hex(), "#abcdef");
    assert_eq!(c.to_u32(), 0xabcdef);
}

#[test]
fn adjust_zero_is_identity() {
    for hex in ["#000000", "#3b82f6", "#ffffff", "#7f7f7f"] {
        let c = Rgb8::parse_hex(hex).unwrap();
        assert_eq!(c.adjust(0), c);
    }
}

#[test]
fn adjust_black_by_100_is_white() {
    assert_eq!(adjust_color("#000000", 100).unwrap(), "#ffffff");
}

#[test]
fn adjust_uses_half_up_rounding_of_the_float_product() {
    // 2.55 * 30 evaluates to exactly 76.5 in IEEE doubles.
    assert_eq!(Rgb8::new(0, 0, 0).adjust(30), Rgb8::new(77, 77, 77));
    // 2.55 * 50 evaluates to 127.49999999999999.
    assert_eq!(Rgb8::new(0, 0, 0).adjust(50), Rgb8::new(127, 127, 127));
    // 2.55 * 10 = 25.5 rounds up.
    assert_eq!(Rgb8::new(0, 0, 0).adjust(10), Rgb8::new(26, 26, 26));
    assert_eq!(adjust_color("#3b82f6", 30).unwrap(), "#88cfff");
}

#[test]
fn adjust_clamps_both_ends() {
    assert_eq!(Rgb8::new(250, 10, 128).adjust(50), Rgb8::new(255, 137, 255));
    assert_eq!(Rgb8::new(250, 10, 128).adjust(-50), Rgb8::new(123, 0, 1));
    assert_eq!(Rgb8::new(1, 2, 3).adjust(-1000), Rgb8::new(0, 0, 0));
    assert_eq!(Rgb8::new(1, 2, 3).adjust(1000), Rgb8::new(255, 255, 255));
}

#[test]
fn serde_uses_hex_strings() {
    let c: Rgb8 = serde_json::from_value(json!("#10b981")).unwrap();
    assert_eq!(c, Rgb8::new(0x10, 0xb9, 0x81));
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#10b981"));
    assert!(serde_json::from_value::<Rgb8>(json!("nope")).is_err());
}
