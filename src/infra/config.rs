//! Configuration loading from TOML files
//!
//! Every binary reads the same file, selected via `--config <path>`
//! (default: config/dev.toml). Missing sections fall back to defaults,
//! so one file can describe the whole stack.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Where the orchestrator gets air quality readings from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AirMode {
    /// In-process rule, no network hop
    Local,
    /// Remote air quality service over HTTP
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_orchestrator_port")]
    pub port: u16,
    /// Zone used when the caller supplies none
    #[serde(default = "default_zone")]
    pub default_zone: String,
    /// AQI strictly above this triggers a zone recommendation
    #[serde(default = "default_aqi_threshold")]
    pub aqi_threshold: u32,
    /// Zone recommended when the AQI threshold is exceeded
    #[serde(default = "default_fallback_zone")]
    pub fallback_zone: String,
    /// Upper bound for every upstream call
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            port: default_orchestrator_port(),
            default_zone: default_zone(),
            aqi_threshold: default_aqi_threshold(),
            fallback_zone: default_fallback_zone(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
        }
    }
}

fn default_orchestrator_port() -> u16 {
    3005
}

fn default_zone() -> String {
    "Centre".to_string()
}

fn default_aqi_threshold() -> u32 {
    100
}

fn default_fallback_zone() -> String {
    "Lac".to_string()
}

fn default_upstream_timeout_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirConfig {
    #[serde(default = "default_air_mode")]
    pub mode: AirMode,
    #[serde(default = "default_air_url")]
    pub url: String,
    #[serde(default = "default_air_port")]
    pub port: u16,
}

impl Default for AirConfig {
    fn default() -> Self {
        Self { mode: default_air_mode(), url: default_air_url(), port: default_air_port() }
    }
}

fn default_air_mode() -> AirMode {
    AirMode::Local
}

fn default_air_url() -> String {
    "http://localhost:3003".to_string()
}

fn default_air_port() -> u16 {
    3003
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_transport_url")]
    pub url: String,
    #[serde(default = "default_transport_port")]
    pub port: u16,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { url: default_transport_url(), port: default_transport_port() }
    }
}

fn default_transport_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_transport_port() -> u16 {
    3001
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesConfig {
    #[serde(default = "default_places_url")]
    pub url: String,
    #[serde(default = "default_places_port")]
    pub port: u16,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self { url: default_places_url(), port: default_places_port() }
    }
}

fn default_places_url() -> String {
    "http://localhost:3002".to_string()
}

fn default_places_port() -> u16 {
    3002
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_alerts_url")]
    pub url: String,
    #[serde(default = "default_alerts_port")]
    pub port: u16,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self { url: default_alerts_url(), port: default_alerts_port() }
    }
}

fn default_alerts_url() -> String {
    "http://localhost:3004".to_string()
}

fn default_alerts_port() -> u16 {
    3004
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub air: AirConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    orchestrator_port: u16,
    default_zone: String,
    aqi_threshold: u32,
    fallback_zone: String,
    upstream_timeout_ms: u64,
    air_mode: AirMode,
    air_url: String,
    air_port: u16,
    transport_url: String,
    transport_port: u16,
    places_url: String,
    places_port: u16,
    alerts_url: String,
    alerts_port: u16,
    log_format: LogFormat,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            orchestrator_port: toml_config.orchestrator.port,
            default_zone: toml_config.orchestrator.default_zone,
            aqi_threshold: toml_config.orchestrator.aqi_threshold,
            fallback_zone: toml_config.orchestrator.fallback_zone,
            upstream_timeout_ms: toml_config.orchestrator.upstream_timeout_ms,
            air_mode: toml_config.air.mode,
            air_url: toml_config.air.url,
            air_port: toml_config.air.port,
            transport_url: toml_config.transport.url,
            transport_port: toml_config.transport.port,
            places_url: toml_config.places.url,
            places_port: toml_config.places.port,
            alerts_url: toml_config.alerts.url,
            alerts_port: toml_config.alerts.port,
            log_format: toml_config.logging.format,
            config_file,
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - tries the TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                // Logging is not initialised yet; the format itself comes from this file
                eprintln!("Warning: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn orchestrator_port(&self) -> u16 {
        self.orchestrator_port
    }

    pub fn default_zone(&self) -> &str {
        &self.default_zone
    }

    pub fn aqi_threshold(&self) -> u32 {
        self.aqi_threshold
    }

    pub fn fallback_zone(&self) -> &str {
        &self.fallback_zone
    }

    pub fn upstream_timeout_ms(&self) -> u64 {
        self.upstream_timeout_ms
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn air_mode(&self) -> AirMode {
        self.air_mode
    }

    pub fn air_url(&self) -> &str {
        &self.air_url
    }

    pub fn air_port(&self) -> u16 {
        self.air_port
    }

    pub fn transport_url(&self) -> &str {
        &self.transport_url
    }

    pub fn transport_port(&self) -> u16 {
        self.transport_port
    }

    pub fn places_url(&self) -> &str {
        &self.places_url
    }

    pub fn places_port(&self) -> u16 {
        self.places_port
    }

    pub fn alerts_url(&self) -> &str {
        &self.alerts_url
    }

    pub fn alerts_port(&self) -> u16 {
        self.alerts_port
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Point the orchestrator at different upstream URLs (used when ports are ephemeral)
    pub fn with_upstream_urls(mut self, transport: &str, places: &str, alerts: &str) -> Self {
        self.transport_url = transport.to_string();
        self.places_url = places.to_string();
        self.alerts_url = alerts.to_string();
        self
    }

    pub fn with_air(mut self, mode: AirMode, url: &str) -> Self {
        self.air_mode = mode;
        self.air_url = url.to_string();
        self
    }

    pub fn with_upstream_timeout_ms(mut self, ms: u64) -> Self {
        self.upstream_timeout_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.orchestrator_port(), 3005);
        assert_eq!(config.default_zone(), "Centre");
        assert_eq!(config.aqi_threshold(), 100);
        assert_eq!(config.fallback_zone(), "Lac");
        assert_eq!(config.upstream_timeout(), Duration::from_millis(2000));
        assert_eq!(config.air_mode(), AirMode::Local);
        assert_eq!(config.transport_url(), "http://localhost:3001");
        assert_eq!(config.places_port(), 3002);
        assert_eq!(config.alerts_url(), "http://localhost:3004");
        assert_eq!(config.log_format(), LogFormat::Pretty);
        assert_eq!(config.config_file(), "default");
    }

    #[test]
    fn test_partial_toml_keeps_section_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
[orchestrator]
aqi_threshold = 80

[air]
mode = "http"
"#,
        )
        .unwrap();
        let config = Config::from_toml(toml_config, "inline".to_string());
        assert_eq!(config.aqi_threshold(), 80);
        assert_eq!(config.fallback_zone(), "Lac");
        assert_eq!(config.air_mode(), AirMode::Http);
        assert_eq!(config.air_url(), "http://localhost:3003");
        assert_eq!(config.transport_port(), 3001);
    }

    #[test]
    fn test_builders_override_upstreams() {
        let config = Config::default()
            .with_upstream_urls("http://t", "http://p", "http://a")
            .with_air(AirMode::Http, "http://air")
            .with_upstream_timeout_ms(50);
        assert_eq!(config.transport_url(), "http://t");
        assert_eq!(config.places_url(), "http://p");
        assert_eq!(config.alerts_url(), "http://a");
        assert_eq!(config.air_url(), "http://air");
        assert_eq!(config.upstream_timeout_ms(), 50);
    }
}
