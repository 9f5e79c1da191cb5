// ── Per-call estimate options ──
//
// Caller-supplied overrides for grid intensity and caching ratios, and the
// ordered resolution rules that turn them into concrete coefficients.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::constants::{
    FIRST_TIME_VIEWING_PERCENTAGE, GLOBAL_GRID_INTENSITY, INDEPENDENT_FIRST_TIME_VIEWING_PERCENTAGE,
    INDEPENDENT_RETURNING_VISITOR_PERCENTAGE, PERCENTAGE_OF_DATA_LOADED_ON_SUBSEQUENT_LOAD,
    RENEWABLES_GRID_INTENSITY,
};
use crate::intensity::average_intensity;
use crate::model::Component;

/// Overrides accepted by the Sustainable Web Design model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateOptions {
    #[serde(default)]
    pub grid_intensity: GridIntensityOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_reload_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_visit_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_visit_percentage: Option<f64>,
}

/// Per-component grid intensity overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridIntensityOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<ComponentIntensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<ComponentIntensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_center: Option<ComponentIntensity>,
}

/// One component's override: a bare number, or `{ value, country }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentIntensity {
    Value(f64),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        country: Option<String>,
    },
}

impl ComponentIntensity {
    pub fn country(code: impl Into<String>) -> Self {
        Self::Detailed {
            value: None,
            country: Some(code.into()),
        }
    }

    fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Detailed { value, .. } => *value,
        }
    }

    fn country_code(&self) -> Option<&str> {
        match self {
            Self::Value(_) => None,
            Self::Detailed { country, .. } => country.as_deref(),
        }
    }
}

// ── Intensity resolution ────────────────────────────────────────────

/// Where a resolved intensity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum IntensitySource {
    /// Absolute value supplied by the caller.
    Value,
    /// Average intensity of a caller-supplied country.
    Country,
    /// Green-hosted datacenter.
    Renewables,
    /// Global average.
    Default,
}

/// A concrete intensity for one component, g CO2/kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedIntensity {
    pub value: f64,
    pub source: IntensitySource,
}

impl ResolvedIntensity {
    const GLOBAL: Self = Self {
        value: GLOBAL_GRID_INTENSITY,
        source: IntensitySource::Default,
    };

    const RENEWABLES: Self = Self {
        value: RENEWABLES_GRID_INTENSITY,
        source: IntensitySource::Renewables,
    };
}

impl GridIntensityOptions {
    /// Resolve the intensity for `component`.
    ///
    /// Order: green hosting (datacenter only) > absolute value > country
    /// lookup > global average. Production always uses the global average.
    pub fn resolve(&self, component: Component, green: bool) -> ResolvedIntensity {
        match component {
            Component::Production => ResolvedIntensity::GLOBAL,
            Component::DataCenter if green => ResolvedIntensity::RENEWABLES,
            Component::DataCenter => resolve_override(self.data_center.as_ref()),
            Component::ConsumerDevice => resolve_override(self.device.as_ref()),
            Component::Network => resolve_override(self.network.as_ref()),
        }
    }
}

fn resolve_override(entry: Option<&ComponentIntensity>) -> ResolvedIntensity {
    let Some(entry) = entry else {
        return ResolvedIntensity::GLOBAL;
    };

    if let Some(value) = entry.value() {
        return ResolvedIntensity {
            value,
            source: IntensitySource::Value,
        };
    }

    if let Some(country) = entry.country_code() {
        if let Some(value) = average_intensity().get(country) {
            return ResolvedIntensity {
                value,
                source: IntensitySource::Country,
            };
        }
        warn!(country, "unknown country for grid intensity, using the global average");
    }

    ResolvedIntensity::GLOBAL
}

// ── Visit caching ───────────────────────────────────────────────────

/// How first-time and returning visit shares relate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CachingVariant {
    /// First visits 0.75; returning visits always `1 - first`.
    #[default]
    Complementary,
    /// First visits 0.8, returning visits 0.2; both overridable on their own.
    Independent,
}

/// Concrete caching ratios for one per-visit calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRatios {
    pub first_visit_percentage: f64,
    pub return_visit_percentage: f64,
    pub data_reload_ratio: f64,
}

impl CachingVariant {
    /// Apply the caller's overrides on top of this variant's defaults.
    pub fn resolve(self, options: &EstimateOptions) -> VisitRatios {
        let data_reload_ratio = options
            .data_reload_ratio
            .unwrap_or(PERCENTAGE_OF_DATA_LOADED_ON_SUBSEQUENT_LOAD);

        match self {
            Self::Complementary => {
                let first = options
                    .first_visit_percentage
                    .unwrap_or(FIRST_TIME_VIEWING_PERCENTAGE);
                if options.return_visit_percentage.is_some() {
                    warn!(
                        "returnVisitPercentage is derived from firstVisitPercentage \
                         with complementary caching; ignoring the override"
                    );
                }
                VisitRatios {
                    first_visit_percentage: first,
                    return_visit_percentage: 1.0 - first,
                    data_reload_ratio,
                }
            }
            Self::Independent => {
                let ratios = VisitRatios {
                    first_visit_percentage: options
                        .first_visit_percentage
                        .unwrap_or(INDEPENDENT_FIRST_TIME_VIEWING_PERCENTAGE),
                    return_visit_percentage: options
                        .return_visit_percentage
                        .unwrap_or(INDEPENDENT_RETURNING_VISITOR_PERCENTAGE),
                    data_reload_ratio,
                };
                debug!(?ratios, "independent caching ratios");
                ratios
            }
        }
    }
}
