//! Shared configuration for the carbonly CLI.
//!
//! A TOML file layered under `CARBONLY_`-prefixed environment variables,
//! and translation into `carbonly_core::Co2Config`. Nested keys in the
//! environment are separated by a double underscore, e.g.
//! `CARBONLY_ESTIMATE__MODEL=1byte`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use carbonly_core::{
    CachingVariant, Co2Config, ComponentIntensity, CoreError, EstimateOptions, GreenDomainSet,
    GridIntensityOptions, ModelName, ResultShape,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error(transparent)]
    Model(#[from] CoreError),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Output and display defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Model and coefficient choices.
    #[serde(default)]
    pub estimate: EstimateSettings,

    /// Green hosting lookup.
    #[serde(default)]
    pub hosting: HostingSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EstimateSettings {
    /// "swd" or "1byte".
    #[serde(default = "default_model")]
    pub model: String,

    /// "total" or "segments".
    #[serde(default = "default_results")]
    pub results: String,

    /// "complementary" or "independent".
    #[serde(default = "default_caching")]
    pub caching: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_reload_ratio: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_visit_percentage: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_visit_percentage: Option<f64>,

    #[serde(default)]
    pub grid_intensity: GridIntensitySettings,
}

impl Default for EstimateSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            results: default_results(),
            caching: default_caching(),
            data_reload_ratio: None,
            first_visit_percentage: None,
            return_visit_percentage: None,
            grid_intensity: GridIntensitySettings::default(),
        }
    }
}

fn default_model() -> String {
    "swd".into()
}
fn default_results() -> String {
    "total".into()
}
fn default_caching() -> String {
    "complementary".into()
}

/// Per-component overrides: a bare number or `{ value, country }`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GridIntensitySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<ComponentIntensity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<ComponentIntensity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_center: Option<ComponentIntensity>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HostingSettings {
    /// Greencheck API base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Domains to treat as green without asking the API.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub green_domains: Vec<String>,
}

impl Default for HostingSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_timeout(),
            green_domains: Vec::new(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.thegreenwebfoundation.org".into()
}
fn default_timeout() -> u64 {
    10
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Build the estimator configuration described by `[estimate]`.
    pub fn to_co2_config(&self) -> Result<Co2Config, ConfigError> {
        self.estimate.to_co2_config()
    }
}

impl EstimateSettings {
    pub fn to_co2_config(&self) -> Result<Co2Config, ConfigError> {
        let model: ModelName = self.model.parse()?;

        let results = match self.results.as_str() {
            "total" | "segment" | "segments" => ResultShape::from(self.results.as_str()),
            other => {
                return Err(ConfigError::Validation {
                    field: "estimate.results".into(),
                    reason: format!("expected 'total' or 'segments', got '{other}'"),
                });
            }
        };

        let caching: CachingVariant =
            self.caching.parse().map_err(|_| ConfigError::Validation {
                field: "estimate.caching".into(),
                reason: format!(
                    "expected 'complementary' or 'independent', got '{}'",
                    self.caching
                ),
            })?;

        check_ratio("estimate.data_reload_ratio", self.data_reload_ratio)?;
        check_ratio("estimate.first_visit_percentage", self.first_visit_percentage)?;
        check_ratio("estimate.return_visit_percentage", self.return_visit_percentage)?;

        Ok(Co2Config {
            model,
            results,
            caching,
            options: EstimateOptions {
                grid_intensity: GridIntensityOptions {
                    device: self.grid_intensity.device.clone(),
                    network: self.grid_intensity.network.clone(),
                    data_center: self.grid_intensity.data_center.clone(),
                },
                data_reload_ratio: self.data_reload_ratio,
                first_visit_percentage: self.first_visit_percentage,
                return_visit_percentage: self.return_visit_percentage,
            },
        })
    }
}

fn check_ratio(field: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("must be between 0 and 1, got {v}"),
        }),
        _ => Ok(()),
    }
}

impl HostingSettings {
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        self.endpoint.parse().map_err(|_| ConfigError::Validation {
            field: "hosting.endpoint".into(),
            reason: format!("invalid URL: {}", self.endpoint),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Domains configured as green, as a lookup set.
    pub fn green_set(&self) -> GreenDomainSet {
        self.green_domains.iter().map(String::as_str).collect()
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "carbonly", "carbonly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("carbonly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from `path` + environment. A missing file is
/// treated as empty.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CARBONLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_swd_totals() {
        let co2 = Config::default().to_co2_config().unwrap();
        assert_eq!(co2.model, ModelName::SustainableWebDesign);
        assert_eq!(co2.results, ResultShape::Total);
        assert_eq!(co2.caching, CachingVariant::Complementary);
        assert_eq!(co2.options, EstimateOptions::default());
    }

    #[test]
    fn unknown_model_surfaces_core_error() {
        let settings = EstimateSettings {
            model: "2byte".into(),
            ..EstimateSettings::default()
        };
        assert!(matches!(
            settings.to_co2_config(),
            Err(ConfigError::Model(CoreError::InvalidConfiguration { .. }))
        ));
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let settings = EstimateSettings {
            data_reload_ratio: Some(1.5),
            ..EstimateSettings::default()
        };
        let err = settings.to_co2_config().unwrap_err();
        assert!(err.to_string().contains("estimate.data_reload_ratio"));
    }

    #[test]
    fn bad_caching_name_is_rejected() {
        let settings = EstimateSettings {
            caching: "sometimes".into(),
            ..EstimateSettings::default()
        };
        assert!(matches!(
            settings.to_co2_config(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn hosting_defaults_point_at_public_api() {
        let hosting = HostingSettings::default();
        assert_eq!(
            hosting.endpoint_url().unwrap().host_str(),
            Some("api.thegreenwebfoundation.org")
        );
        assert_eq!(hosting.timeout(), Duration::from_secs(10));
        assert!(hosting.green_set().is_empty());
    }
}
