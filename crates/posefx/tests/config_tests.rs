use posefx::{CannonTiming, ConfigError, FxConfig};
use std::{collections::HashMap, time::Duration};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults_without_overrides() {
    let config = FxConfig::from_lookup(lookup(&[])).unwrap();

    assert_eq!(config.width(), 640);
    assert_eq!(config.height(), 480);
    assert_eq!(config.assumed_frame_rate(), 17);
    assert_eq!(config.cannon_timing(), CannonTiming::AssumedRate);
    assert_eq!(config.shadow_trail(), 5);
    assert_eq!(config.keypoint_threshold(), 0.1);
    assert_eq!(config.restart_delay(), Duration::from_secs(1));
    assert!(config.speech_detection());
    assert_eq!(config.target_fps(), 30);
}

#[test]
fn test_overrides() {
    let config = FxConfig::from_lookup(lookup(&[
        ("POSEFX_WIDTH", "320"),
        ("POSEFX_HEIGHT", " 240 "),
        ("POSEFX_FRAME_RATE", "25"),
        ("POSEFX_CANNON_TIMING", "timestamps"),
        ("POSEFX_SHADOW_TRAIL", "8"),
        ("POSEFX_KEYPOINT_THRESHOLD", "0.3"),
        ("POSEFX_RESTART_DELAY_MS", "250"),
        ("POSEFX_SPEECH", "0"),
        ("POSEFX_TARGET_FPS", "60"),
    ]))
    .unwrap();

    assert_eq!((config.width(), config.height()), (320, 240));
    assert_eq!(config.assumed_frame_rate(), 25);
    assert_eq!(config.cannon_timing(), CannonTiming::Timestamps);
    assert_eq!(config.shadow_trail(), 8);
    assert_eq!(config.keypoint_threshold(), 0.3);
    assert_eq!(config.restart_delay(), Duration::from_millis(250));
    assert!(!config.speech_detection());
    assert_eq!(config.target_fps(), 60);
}

#[test]
fn test_invalid_values_are_rejected() {
    let cases = [
        ("POSEFX_WIDTH", "wide"),
        ("POSEFX_FRAME_RATE", "0"),
        ("POSEFX_CANNON_TIMING", "seconds"),
        ("POSEFX_KEYPOINT_THRESHOLD", "1.5"),
        ("POSEFX_RESTART_DELAY_MS", "-1"),
        ("POSEFX_SPEECH", "maybe"),
    ];

    for (key, value) in cases {
        let error = FxConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
        let ConfigError::Invalid { key: bad_key, value: bad_value } = &error;
        assert_eq!(bad_key, key);
        assert_eq!(bad_value, value);
        assert_eq!(
            error.to_string(),
            format!("invalid value for {key}: \"{value}\"")
        );
    }
}

#[test]
fn test_frame_interval() {
    let config = FxConfig::default().with_target_fps(20);
    assert_eq!(config.frame_interval(), Duration::from_millis(50));

    let config = FxConfig::default().with_target_fps(0);
    assert_eq!(config.frame_interval(), Duration::from_secs(1));
}
