// ── Emission models ──
//
// Shared building blocks for the two estimators: the system components
// energy is attributed to, per-component energy and emissions maps, and
// the estimate shape every model returns.

pub mod one_byte;
pub mod swd;

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::constants::{DATACENTER_ENERGY, END_USER_DEVICE_ENERGY, NETWORK_ENERGY, PRODUCTION_ENERGY};
use crate::error::CoreError;

pub use one_byte::OneByte;
pub use swd::SustainableWebDesign;

// ── Components ──────────────────────────────────────────────────────

/// Part of the system a share of the energy is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Component {
    ConsumerDevice,
    Network,
    Production,
    DataCenter,
}

impl Component {
    pub const ALL: [Self; 4] = [
        Self::ConsumerDevice,
        Self::Network,
        Self::Production,
        Self::DataCenter,
    ];

    /// Fixed share of the total energy attributed to this component.
    pub fn energy_share(self) -> f64 {
        match self {
            Self::ConsumerDevice => END_USER_DEVICE_ENERGY,
            Self::Network => NETWORK_ENERGY,
            Self::Production => PRODUCTION_ENERGY,
            Self::DataCenter => DATACENTER_ENERGY,
        }
    }
}

/// Kilowatt-hours per component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyByComponent {
    #[serde(rename = "consumerDeviceEnergy")]
    pub consumer_device: f64,
    #[serde(rename = "networkEnergy")]
    pub network: f64,
    #[serde(rename = "productionEnergy")]
    pub production: f64,
    #[serde(rename = "dataCenterEnergy")]
    pub data_center: f64,
}

/// Grams of CO2 per component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionsByComponent {
    #[serde(rename = "consumerDeviceCO2")]
    pub consumer_device: f64,
    #[serde(rename = "networkCO2")]
    pub network: f64,
    #[serde(rename = "productionCO2")]
    pub production: f64,
    #[serde(rename = "dataCenterCO2")]
    pub data_center: f64,
}

macro_rules! by_component {
    ($ty:ident) => {
        impl $ty {
            /// Build a map by evaluating `f` once per component.
            pub fn from_fn(mut f: impl FnMut(Component) -> f64) -> Self {
                Self {
                    consumer_device: f(Component::ConsumerDevice),
                    network: f(Component::Network),
                    production: f(Component::Production),
                    data_center: f(Component::DataCenter),
                }
            }

            pub fn get(&self, component: Component) -> f64 {
                match component {
                    Component::ConsumerDevice => self.consumer_device,
                    Component::Network => self.network,
                    Component::Production => self.production,
                    Component::DataCenter => self.data_center,
                }
            }

            pub fn iter(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
                Component::ALL.into_iter().map(|c| (c, self.get(c)))
            }

            pub fn total(&self) -> f64 {
                self.iter().map(|(_, v)| v).sum()
            }
        }
    };
}

by_component!(EnergyByComponent);
by_component!(EmissionsByComponent);

/// Energy of one transfer split into first-visit and returning-visit shares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitEnergyByComponent {
    pub first_visit: EnergyByComponent,
    pub return_visit: EnergyByComponent,
}

// ── Estimates ───────────────────────────────────────────────────────

/// Result of a single-transfer calculation: `{ total }`, optionally with
/// the per-component figures alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    #[serde(flatten)]
    pub breakdown: Option<Breakdown>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Breakdown {
    Components(EmissionsByComponent),
    #[serde(rename_all = "camelCase")]
    Visit {
        first_visit: EmissionsByComponent,
        return_visit: EmissionsByComponent,
    },
}

impl Estimate {
    pub fn total_only(total: f64) -> Self {
        Self {
            breakdown: None,
            total,
        }
    }

    pub fn components(emissions: EmissionsByComponent) -> Self {
        Self {
            total: emissions.total(),
            breakdown: Some(Breakdown::Components(emissions)),
        }
    }

    pub fn visit(first_visit: EmissionsByComponent, return_visit: EmissionsByComponent) -> Self {
        Self {
            total: first_visit.total() + return_visit.total(),
            breakdown: Some(Breakdown::Visit {
                first_visit,
                return_visit,
            }),
        }
    }

    /// Drop the breakdown, keeping only the total.
    pub fn into_total(self) -> Self {
        Self::total_only(self.total)
    }
}

// ── Hosting signal ──────────────────────────────────────────────────

/// What the caller knows about the datacenter: a green-hosting flag, or a
/// raw intensity figure. Only the flag is accepted by the per-byte and
/// per-visit entry points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostingSignal {
    Green(bool),
    Intensity(f64),
}

impl HostingSignal {
    pub fn is_green(self) -> bool {
        matches!(self, Self::Green(true))
    }

    /// Reject anything but a boolean flag.
    pub(crate) fn require_flag(self, operation: &str) -> Result<bool, CoreError> {
        match self {
            Self::Green(green) => Ok(green),
            Self::Intensity(_) => Err(CoreError::InvalidArgument {
                message: format!(
                    "{operation} expects a boolean for the carbon intensity value. Received: {self}"
                ),
            }),
        }
    }
}

impl From<bool> for HostingSignal {
    fn from(green: bool) -> Self {
        Self::Green(green)
    }
}

impl From<f64> for HostingSignal {
    fn from(intensity: f64) -> Self {
        Self::Intensity(intensity)
    }
}

impl fmt::Display for HostingSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green(g) => write!(f, "{g}"),
            Self::Intensity(v) => write!(f, "{v}"),
        }
    }
}

// ── Numeric helpers ─────────────────────────────────────────────────

/// Byte counts are exact up to 2^53, far beyond any single transfer.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub(crate) fn bytes_to_f64(bytes: u64) -> f64 {
    bytes as f64
}

/// Round to two decimal places.
pub(crate) fn format_number(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
