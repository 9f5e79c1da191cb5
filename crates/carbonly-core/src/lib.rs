// carbonly-core: Emissions models and traffic aggregation for data transfer.
//
// Converts byte counts into grams of CO2 with either the OneByte or the
// Sustainable Web Design model, and rolls those estimates up over a page's
// traffic manifest. Pure and synchronous; no I/O beyond the embedded
// intensity tables.

pub mod aggregate;
pub mod co2;
pub mod constants;
pub mod error;
pub mod hosting;
pub mod intensity;
pub mod manifest;
pub mod model;
pub mod options;

// ── Primary re-exports ──────────────────────────────────────────────
pub use co2::{Co2, Co2Config, EstimateTrace, EstimationModel, ModelName, ResultShape};
pub use error::CoreError;
pub use hosting::GreenDomainSet;
pub use manifest::TrafficManifest;

pub use aggregate::{
    ContentTypeEmissions, DomainEmissions, PageReport, PartyEmissions, ResourceEmissions,
};
pub use intensity::{GridIntensityTable, IntensityKind};
pub use model::{
    Breakdown, Component, EmissionsByComponent, EnergyByComponent, Estimate, HostingSignal,
    OneByte, SustainableWebDesign,
};
pub use options::{
    CachingVariant, ComponentIntensity, EstimateOptions, GridIntensityOptions, IntensitySource,
    ResolvedIntensity, VisitRatios,
};
