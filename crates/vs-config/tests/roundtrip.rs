use vs_config::*;

#[test]
fn roundtrip_yaml_default_config() {
    let config = GeneratorConfig::default();

    let path = std::env::temp_dir().join("vs_config_roundtrip_default.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn roundtrip_json_custom_config() {
    let mut config = GeneratorConfig::default();
    config.broker.host = "localhost".to_string();
    config.broker.port = 1884;
    config.burst.size = 5;
    config.burst.delay_s = 0.1;
    config.signal.idle.baseline = 600;

    let path = std::env::temp_dir().join("vs_config_roundtrip_custom.json");
    save_json(&path, &config).unwrap();
    let loaded = load_path(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn partial_yaml_keeps_defaults() {
    let path = std::env::temp_dir().join("vs_config_partial.yaml");
    std::fs::write(
        &path,
        "broker:\n  host: broker.local\nburst:\n  size: 3\nsignal:\n  normal:\n    amplitude: 400.0\n",
    )
    .unwrap();

    let config = load_path(&path).unwrap();
    assert_eq!(config.broker.host, "broker.local");
    assert_eq!(config.broker.port, 1883);
    assert_eq!(config.broker.topic, "virtusense/unique_id_123/signal_input");
    assert_eq!(config.burst.size, 3);
    assert_eq!(config.burst.delay_s, 0.5);
    assert_eq!(config.signal.normal.amplitude, 400.0);
    assert_eq!(config.signal.normal.center, 2048);
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let path = std::env::temp_dir().join("vs_config_invalid.yaml");
    std::fs::write(&path, "burst:\n  size: 0\n").unwrap();

    assert!(matches!(load_path(&path), Err(ConfigError::Validation(_))));
}

#[test]
fn unknown_extension_is_rejected() {
    let path = std::env::temp_dir().join("vs_config.toml");
    assert!(matches!(
        load_path(&path),
        Err(ConfigError::UnknownFormat { .. })
    ));
}
