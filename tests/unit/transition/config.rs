use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn empty_json_yields_defaults() {
    let cfg = TransitionConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, TransitionConfig::default());
    assert_eq!(cfg.fragment_params(), FragmentParams::default());
    assert_eq!(cfg.motion_params(), MotionParams::default());
    assert_eq!(cfg.duration(), Duration::from_millis(1500));
}

#[test]
fn partial_json_overrides_fields() {
    let cfg =
        TransitionConfig::from_json_str(r##"{"grid_size": 4, "capture_background": "#000"}"##)
            .unwrap();
    assert_eq!(cfg.grid_size, 4);
    assert_eq!(cfg.delay_scale, 0.4);
    assert_eq!(
        cfg.capture_opts().unwrap().background,
        Rgba8::opaque(0, 0, 0)
    );
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{"grid_size": 0}"#,
        r#"{"grid_size": 65}"#,
        r#"{"duration_ms": 0}"#,
        r#"{"active_window": 0.0}"#,
        r#"{"delay_scale": -1.0}"#,
        r#"{"capture_background": "oklch(0.5 0.1 200)"}"#,
        r#"{"grid": 8}"#,
        "not json",
    ] {
        let err = TransitionConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, RippleError::Validation(_)), "{json}: {err}");
    }
}

#[test]
fn missing_font_file_is_reported() {
    let cfg = TransitionConfig {
        font_path: Some(PathBuf::from("/definitely/not/here.ttf")),
        ..TransitionConfig::default()
    };
    assert!(cfg.load_font().is_err());
    assert!(TransitionConfig::default().load_font().unwrap().is_none());
}

#[test]
fn serializes_without_unset_font() {
    let s = serde_json::to_string(&TransitionConfig::default()).unwrap();
    assert!(!s.contains("font_path"));
    let back = TransitionConfig::from_json_str(&s).unwrap();
    assert_eq!(back, TransitionConfig::default());
}
