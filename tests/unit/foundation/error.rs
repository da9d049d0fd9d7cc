use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CountdownError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CountdownError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        CountdownError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        CountdownError::lookup("x")
            .to_string()
            .contains("lookup error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CountdownError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
