use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = StudioConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.palette(), Palette::default());
    assert_eq!(cfg.canvas(), Canvas::new(640, 256));
    assert_eq!(cfg.duration().unwrap().frame_count(cfg.frame_rate().unwrap()), 300);
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = StudioConfig::from_json_str(
        &serde_json::json!({
            "style": "tsunami",
            "colors": ["#000000", "#FFFFFF"],
            "duration_secs": 12.5
        })
        .to_string(),
    )
    .unwrap();
    assert_eq!(cfg.style, StyleKind::TsunamiWave);
    assert_eq!(cfg.palette(), Palette::new(Color::BLACK, Color::WHITE));
    assert_eq!(cfg.duration_secs, 12.5);
    assert_eq!(cfg.frame_rate, 30);
    assert_eq!(cfg.width, 640);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = StudioConfig::from_json_str("{ \"width\": \"wide\" }").unwrap_err();
    assert!(matches!(err, TideloopError::Config(_)));
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut cfg = StudioConfig {
        duration_secs: 31.0,
        ..StudioConfig::default()
    };
    assert!(cfg.validate().is_err());
    cfg.duration_secs = 4.0;
    assert!(cfg.validate().is_err());
    cfg.duration_secs = 5.0;
    cfg.validate().unwrap();

    cfg.colors[1] = "oklch(0.7 0.1 200)".to_string();
    assert!(cfg.validate().is_err());
    assert_eq!(cfg.palette().accent, crate::color::model::FALLBACK_COLOR);

    let cfg = StudioConfig {
        width: 0,
        ..StudioConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn env_overrides_apply_and_ignore_garbage() {
    let mut cfg = StudioConfig::default();
    cfg.apply_env_with(|key| match key {
        ENV_FRAME_RATE => Some("24".to_string()),
        ENV_OUT_DIR => Some("/tmp/loops".to_string()),
        _ => None,
    });
    assert_eq!(cfg.frame_rate, 24);
    assert_eq!(cfg.out_dir, PathBuf::from("/tmp/loops"));

    cfg.apply_env_with(|key| (key == ENV_FRAME_RATE).then(|| "fast".to_string()));
    assert_eq!(cfg.frame_rate, 24);
}

#[test]
fn load_reads_a_file() {
    let path = std::env::temp_dir().join(format!("tideloop_cfg_{}.json", std::process::id()));
    std::fs::write(&path, r#"{"width": 320, "height": 128}"#).unwrap();
    let cfg = StudioConfig::load(&path).unwrap();
    assert_eq!(cfg.canvas(), Canvas::new(320, 128));
    let _ = std::fs::remove_file(&path);
    assert!(StudioConfig::load(&path).is_err());
}

#[test]
fn load_rejects_invalid_fields() {
    let path = std::env::temp_dir().join(format!("tideloop_bad_cfg_{}.json", std::process::id()));
    let no_env = |_: &str| None;

    std::fs::write(&path, r##"{"colors": ["blue", "#3333ff"]}"##).unwrap();
    let err = StudioConfig::load_with(&path, no_env).unwrap_err();
    assert!(matches!(err, TideloopError::Config(_)));
    assert!(err.to_string().contains("'blue'"), "{err}");

    std::fs::write(&path, r#"{"width": 0}"#).unwrap();
    assert!(StudioConfig::load_with(&path, no_env).is_err());

    std::fs::write(&path, r#"{"duration_secs": 99}"#).unwrap();
    let err = StudioConfig::load_with(&path, no_env).unwrap_err();
    assert!(err.to_string().contains("duration_secs"), "{err}");

    std::fs::write(&path, r#"{"duration_secs": 30}"#).unwrap();
    let cfg = StudioConfig::load_with(&path, |key| {
        (key == ENV_FRAME_RATE).then(|| "12".to_string())
    })
    .unwrap();
    assert_eq!(cfg.frame_rate, 12);
    let _ = std::fs::remove_file(&path);
}
