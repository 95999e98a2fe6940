use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(StippleError::input("x").to_string().contains("input error:"));
    assert!(
        StippleError::source_unavailable("x")
            .to_string()
            .contains("source unavailable:")
    );
    assert!(StippleError::sink("x").to_string().contains("sink error:"));
    assert!(
        StippleError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert_eq!(StippleError::Cancelled.to_string(), "export cancelled");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StippleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_cancelled());
    assert!(StippleError::Cancelled.is_cancelled());
}
