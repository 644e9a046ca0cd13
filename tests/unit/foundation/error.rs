use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DynawaveError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DynawaveError::unsupported("x")
            .to_string()
            .contains("unsupported:")
    );
    assert!(
        DynawaveError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        DynawaveError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn point_mismatch_reports_both_sides() {
    let msg = DynawaveError::PointMismatch { from: 6, to: 4 }.to_string();
    assert!(msg.contains('6'));
    assert!(msg.contains('4'));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DynawaveError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
