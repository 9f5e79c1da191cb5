// ── Grid intensity tables ──
//
// Country-level carbon intensity of electricity, g CO2/kWh. The tables are
// generated ahead of time from the Ember (average) and UNFCCC (marginal)
// datasets and embedded at compile time; they are parsed once on first use
// and never mutated afterwards.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Measurement methodology behind a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IntensityKind {
    Average,
    Marginal,
}

/// A country → intensity table with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridIntensityTable {
    #[serde(rename = "type")]
    pub kind: IntensityKind,
    pub source: String,
    pub year: String,
    /// Keyed by upper-case ISO 3166-1 alpha-3 code, or by region name.
    pub data: BTreeMap<String, f64>,
}

impl GridIntensityTable {
    /// Look up a country or region. Matching is case-insensitive.
    pub fn get(&self, country: &str) -> Option<f64> {
        self.data.get(&country.trim().to_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.data.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

static AVERAGE: LazyLock<GridIntensityTable> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../data/average-intensities-2021.json"))
        .expect("embedded average intensity table is valid JSON")
});

static MARGINAL: LazyLock<GridIntensityTable> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../data/marginal-intensities-2021.json"))
        .expect("embedded marginal intensity table is valid JSON")
});

/// Average grid intensities (Ember, 2021).
pub fn average_intensity() -> &'static GridIntensityTable {
    &AVERAGE
}

/// Marginal grid intensities (UNFCCC, 2021).
pub fn marginal_intensity() -> &'static GridIntensityTable {
    &MARGINAL
}

/// The table for a given methodology.
pub fn table(kind: IntensityKind) -> &'static GridIntensityTable {
    match kind {
        IntensityKind::Average => average_intensity(),
        IntensityKind::Marginal => marginal_intensity(),
    }
}
