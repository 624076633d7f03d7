use verbatim::infrastructure::observability::TracingConfig;

#[test]
fn given_server_settings_when_building_config_then_keeps_level_and_format() {
    let config = TracingConfig::server("prod", true, "info,verbatim=trace");

    assert_eq!(config.service, "verbatim");
    assert_eq!(config.environment, "prod");
    assert!(config.json_format);
    assert_eq!(config.level.as_deref(), Some("info,verbatim=trace"));
}

#[test]
fn given_client_config_when_created_then_defaults_to_warnings() {
    let config = TracingConfig::client();

    assert_eq!(config.service, "verbatim-client");
    assert!(!config.environment.is_empty());
    assert_eq!(config.level.as_deref(), Some("warn"));
}
