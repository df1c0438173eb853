use serde::Deserialize;
use thiserror::Error;

use crate::predict::GroundStation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station1: StationConfig,
    pub station2: StationConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_min_elevation")]
    pub min_elevation_deg: f64,
    /// Prefill satellite for the dashboard and for requests that omit one.
    pub satellite: Option<TleConfig>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            min_elevation_deg: default_min_elevation(),
            satellite: None,
        }
    }
}

fn default_min_elevation() -> f64 {
    3.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct TleConfig {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl StationConfig {
    pub fn to_station(&self) -> GroundStation {
        GroundStation::new(
            self.name.clone(),
            self.latitude_deg,
            self.longitude_deg,
            self.altitude_m,
        )
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let yaml = r#"
station1:
  name: Sweden
  latitude_deg: 65.337
  longitude_deg: 21.425
  altitude_m: 21
station2:
  name: Poland
  latitude_deg: 51.097
  longitude_deg: 17.069
  altitude_m: 116
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.defaults.min_elevation_deg, 3.0);
        assert!(config.defaults.satellite.is_none());
        assert_eq!(config.station1.name, "Sweden");
        assert_eq!(config.station2.altitude_m, 116.0);
    }
}
