//! Integration tests for configuration loading

use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use transit_mesh::infra::{AirMode, Config, LogFormat};

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[orchestrator]
port = 8080
default_zone = "Nord"
aqi_threshold = 120
fallback_zone = "Est"
upstream_timeout_ms = 750

[air]
mode = "http"
url = "http://air:3003"

[transport]
url = "http://transport:3001"
port = 4001

[places]
url = "http://places:3002"

[alerts]
url = "http://alerts:3004"
port = 4004

[logging]
format = "json"
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.orchestrator_port(), 8080);
    assert_eq!(config.default_zone(), "Nord");
    assert_eq!(config.aqi_threshold(), 120);
    assert_eq!(config.fallback_zone(), "Est");
    assert_eq!(config.upstream_timeout(), Duration::from_millis(750));
    assert_eq!(config.air_mode(), AirMode::Http);
    assert_eq!(config.air_url(), "http://air:3003");
    assert_eq!(config.transport_url(), "http://transport:3001");
    assert_eq!(config.transport_port(), 4001);
    assert_eq!(config.places_port(), 3002);
    assert_eq!(config.alerts_port(), 4004);
    assert_eq!(config.log_format(), LogFormat::Json);
    assert_eq!(config.config_file(), temp_file.path().display().to_string());
}

#[test]
fn test_shipped_configs_parse() {
    let dev = Config::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/dev.toml")).unwrap();
    assert_eq!(dev.orchestrator_port(), 3005);
    assert_eq!(dev.air_mode(), AirMode::Local);

    let compose = Config::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/compose.toml")).unwrap();
    assert_eq!(compose.air_mode(), AirMode::Http);
    assert_eq!(compose.places_url(), "http://places-service:3002");
    assert_eq!(compose.aqi_threshold(), 100);
}

#[test]
fn test_invalid_value_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[air]\nmode = \"soap\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = Config::from_file(temp_file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.orchestrator_port(), 3005);
    assert_eq!(config.default_zone(), "Centre");
    assert_eq!(config.air_mode(), AirMode::Local);
    assert_eq!(config.config_file(), "default");
}
