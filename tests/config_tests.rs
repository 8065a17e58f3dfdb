use rust_slideshow::config::Configuration;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
photo-library-path: "/photos"
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.photo_library_path, PathBuf::from("/photos"));
    assert_eq!(cfg.fade_duration, Duration::from_millis(500));
    assert_eq!(cfg.hold_duration, Duration::from_secs(5));
    assert!(!cfg.slideshow);
    assert!(cfg.fullscreen);
    assert_eq!(cfg.extensions, vec!["jpg".to_string(), "png".to_string()]);
}

#[test]
fn parse_humantime_durations() {
    let yaml = r#"
photo-library-path: "/p"
fade-duration: 1s 250ms
hold-duration: 2m
slideshow: true
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.fade_duration, Duration::from_millis(1250));
    assert_eq!(cfg.hold_duration, Duration::from_secs(120));
    assert!(cfg.slideshow);
}

#[test]
fn parse_window_and_gesture_settings() {
    let yaml = r#"
fullscreen: false
window-size: [1024, 768]
drag-threshold-px: 6.0
zoom-drag-px: 300.0
recursive: false
max-depth: 2
"#;
    let cfg: Configuration = serde_yaml::from_str::<Configuration>(yaml)
        .unwrap()
        .validated()
        .unwrap();
    assert!(!cfg.fullscreen);
    assert_eq!(cfg.window_size, [1024, 768]);
    let gestures = cfg.gesture_options();
    assert!((gestures.drag_threshold_px - 6.0).abs() < f64::EPSILON);
    assert!((gestures.zoom_drag_px - 300.0).abs() < f64::EPSILON);
    let scan = cfg.scan_options();
    assert!(!scan.recursive);
    assert_eq!(scan.max_depth, Some(2));
}

#[test]
fn extensions_are_normalized() {
    let yaml = r#"
extensions: [".JPG", "Png", "webp"]
"#;
    let cfg = serde_yaml::from_str::<Configuration>(yaml)
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.extensions, vec!["jpg", "png", "webp"]);
}

#[test]
fn slideshow_options_follow_config() {
    let yaml = r#"
fade-duration: 0s
hold-duration: 3s
slideshow: true
"#;
    let cfg = serde_yaml::from_str::<Configuration>(yaml)
        .unwrap()
        .validated()
        .unwrap();
    let opts = cfg.slideshow_options();
    assert_eq!(opts.fade, Duration::ZERO);
    assert_eq!(opts.hold, Duration::from_secs(3));
    assert!(opts.auto_advance);
}

#[test]
fn empty_extension_list_is_rejected() {
    let yaml = "extensions: []\n";
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn zero_hold_is_rejected() {
    let yaml = "hold-duration: 0s\n";
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn degenerate_window_and_gestures_are_rejected() {
    for yaml in [
        "window-size: [0, 600]\n",
        "drag-threshold-px: -1.0\n",
        "zoom-drag-px: 0.0\n",
    ] {
        let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.validated().is_err(), "accepted {yaml:?}");
    }
}

#[test]
fn unknown_duration_format_fails_to_parse() {
    let yaml = "fade-duration: soon\n";
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
}

#[test]
fn from_yaml_file_reports_missing_file() {
    let err = Configuration::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn default_config_is_valid() {
    let cfg = Configuration::default().validated().unwrap();
    assert_eq!(cfg.photo_library_path, PathBuf::from("."));
    assert_eq!(cfg.window_size, [800, 600]);
}
