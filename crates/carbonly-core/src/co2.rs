// ── Model-selecting facade ──
//
// `Co2` wraps whichever estimation model was configured and gives every
// caller the same per-byte / per-visit surface. The model, result shape
// and options are captured at construction and never change afterwards.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::CoreError;
use crate::model::{Component, Estimate, OneByte, SustainableWebDesign};
use crate::options::{CachingVariant, EstimateOptions, ResolvedIntensity, VisitRatios};

// ── Configuration ───────────────────────────────────────────────────

/// Which estimation model to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ModelName {
    #[serde(rename = "1byte")]
    #[strum(serialize = "1byte")]
    OneByte,
    #[default]
    #[serde(rename = "swd")]
    #[strum(serialize = "swd")]
    SustainableWebDesign,
}

impl FromStr for ModelName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1byte" => Ok(Self::OneByte),
            "swd" => Ok(Self::SustainableWebDesign),
            other => Err(CoreError::InvalidConfiguration {
                model: other.to_owned(),
            }),
        }
    }
}

/// Whether results carry a per-component breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResultShape {
    #[default]
    Total,
    #[serde(alias = "segment")]
    Segments,
}

impl From<&str> for ResultShape {
    /// `"segment"` or `"segments"` selects the breakdown; anything else is
    /// total-only.
    fn from(s: &str) -> Self {
        match s {
            "segment" | "segments" => Self::Segments,
            _ => Self::Total,
        }
    }
}

/// Everything needed to build a [`Co2`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Co2Config {
    pub model: ModelName,
    pub results: ResultShape,
    /// Only meaningful for the Sustainable Web Design model.
    pub caching: CachingVariant,
    pub options: EstimateOptions,
}

// ── Model variants ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationModel {
    OneByte(OneByte),
    SustainableWebDesign(SustainableWebDesign),
}

impl EstimationModel {
    pub fn name(&self) -> ModelName {
        match self {
            Self::OneByte(_) => ModelName::OneByte,
            Self::SustainableWebDesign(_) => ModelName::SustainableWebDesign,
        }
    }
}

// ── Facade ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Co2 {
    model: EstimationModel,
    results: ResultShape,
    options: EstimateOptions,
}

impl Default for Co2 {
    fn default() -> Self {
        Self::new(Co2Config::default())
    }
}

impl Co2 {
    pub fn new(config: Co2Config) -> Self {
        let model = match config.model {
            ModelName::OneByte => EstimationModel::OneByte(OneByte::new()),
            ModelName::SustainableWebDesign => EstimationModel::SustainableWebDesign(
                SustainableWebDesign::with_caching(config.caching),
            ),
        };
        Self {
            model,
            results: config.results,
            options: config.options,
        }
    }

    /// Build from a model name, failing on anything but `1byte` / `swd`.
    pub fn with_model(model: &str) -> Result<Self, CoreError> {
        Ok(Self::new(Co2Config {
            model: model.parse()?,
            ..Co2Config::default()
        }))
    }

    pub fn model(&self) -> &EstimationModel {
        &self.model
    }

    pub fn result_shape(&self) -> ResultShape {
        self.results
    }

    pub fn options(&self) -> &EstimateOptions {
        &self.options
    }

    fn segmented(&self) -> bool {
        self.results == ResultShape::Segments
    }

    /// Grams of CO2 for transferring `bytes`, green-hosted or not.
    pub fn per_byte(&self, bytes: u64, green: bool) -> Result<Estimate, CoreError> {
        self.per_byte_with(bytes, green, &self.options)
    }

    /// Grams of CO2 per page visit with caching applied. Not available with
    /// the OneByte model.
    pub fn per_visit(&self, bytes: u64, green: bool) -> Result<Estimate, CoreError> {
        self.per_visit_with(bytes, green, &self.options)
    }

    fn per_byte_with(
        &self,
        bytes: u64,
        green: bool,
        options: &EstimateOptions,
    ) -> Result<Estimate, CoreError> {
        match &self.model {
            EstimationModel::OneByte(m) => Ok(m.per_byte(bytes, green)),
            EstimationModel::SustainableWebDesign(m) => {
                m.per_byte(bytes, green, self.segmented(), options)
            }
        }
    }

    fn per_visit_with(
        &self,
        bytes: u64,
        green: bool,
        options: &EstimateOptions,
    ) -> Result<Estimate, CoreError> {
        match &self.model {
            EstimationModel::OneByte(m) => m.per_visit(bytes, green),
            EstimationModel::SustainableWebDesign(m) => {
                m.per_visit(bytes, green, self.segmented(), options)
            }
        }
    }

    /// [`per_byte`](Self::per_byte) together with the variables behind it.
    ///
    /// `options`, when given, replaces the instance options for this call only.
    pub fn per_byte_trace(
        &self,
        bytes: u64,
        green: bool,
        options: Option<&EstimateOptions>,
    ) -> Result<EstimateTrace, CoreError> {
        let options = options.unwrap_or(&self.options);
        let co2 = self.per_byte_with(bytes, green, options)?;
        Ok(EstimateTrace {
            co2,
            green,
            variables: TraceVariables {
                description: TRACE_DESCRIPTION,
                model: self.model.name(),
                bytes,
                grid_intensity: self.trace_intensity(green, options),
                visit: None,
            },
        })
    }

    /// [`per_visit`](Self::per_visit) together with the variables behind it.
    ///
    /// `options`, when given, replaces the instance options for this call only.
    pub fn per_visit_trace(
        &self,
        bytes: u64,
        green: bool,
        options: Option<&EstimateOptions>,
    ) -> Result<EstimateTrace, CoreError> {
        let options = options.unwrap_or(&self.options);
        let co2 = self.per_visit_with(bytes, green, options)?;
        let visit = match &self.model {
            EstimationModel::SustainableWebDesign(m) => Some(m.caching().resolve(options)),
            EstimationModel::OneByte(_) => None,
        };
        Ok(EstimateTrace {
            co2,
            green,
            variables: TraceVariables {
                description: TRACE_DESCRIPTION,
                model: self.model.name(),
                bytes,
                grid_intensity: self.trace_intensity(green, options),
                visit,
            },
        })
    }

    fn trace_intensity(&self, green: bool, options: &EstimateOptions) -> Option<TraceIntensity> {
        match self.model {
            EstimationModel::OneByte(_) => None,
            EstimationModel::SustainableWebDesign(_) => {
                let grid = &options.grid_intensity;
                Some(TraceIntensity {
                    device: grid.resolve(Component::ConsumerDevice, green),
                    network: grid.resolve(Component::Network, green),
                    data_center: grid.resolve(Component::DataCenter, green),
                    production: grid.resolve(Component::Production, green),
                })
            }
        }
    }
}

// ── Traces ──────────────────────────────────────────────────────────

const TRACE_DESCRIPTION: &str = "Below are the variables used to calculate this CO2 estimate.";

/// An estimate plus the inputs and coefficients used to reach it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateTrace {
    pub co2: Estimate,
    pub green: bool,
    pub variables: TraceVariables,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceVariables {
    pub description: &'static str,
    pub model: ModelName,
    pub bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_intensity: Option<TraceIntensity>,
    #[serde(flatten)]
    pub visit: Option<VisitRatios>,
}

/// Grid intensity applied to each component, g CO2/kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceIntensity {
    pub device: ResolvedIntensity,
    pub network: ResolvedIntensity,
    pub data_center: ResolvedIntensity,
    pub production: ResolvedIntensity,
}
