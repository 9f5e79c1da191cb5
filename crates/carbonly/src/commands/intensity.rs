//! `intensity` command handler.

use serde::Serialize;
use tabled::Tabled;

use carbonly_core::{IntensityKind, intensity};

use crate::cli::{IntensityArgs, IntensityKindArg};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

/// One table entry, with the table's provenance.
#[derive(Serialize)]
struct IntensityEntry {
    country: String,
    intensity: f64,
    #[serde(rename = "type")]
    kind: IntensityKind,
    year: String,
}

#[derive(Tabled)]
struct IntensityRow {
    #[tabled(rename = "Code")]
    country: String,
    #[tabled(rename = "g CO2/kWh")]
    intensity: String,
}

impl From<&IntensityEntry> for IntensityRow {
    fn from(e: &IntensityEntry) -> Self {
        Self {
            country: e.country.clone(),
            intensity: format!("{:.2}", e.intensity),
        }
    }
}

pub fn handle(args: &IntensityArgs, ctx: &Context) -> Result<(), CliError> {
    let kind = match args.kind {
        IntensityKindArg::Average => IntensityKind::Average,
        IntensityKindArg::Marginal => IntensityKind::Marginal,
    };
    let table = intensity::table(kind);
    let entry = |country: &str, value: f64| IntensityEntry {
        country: country.to_owned(),
        intensity: value,
        kind,
        year: table.year.clone(),
    };

    let out = if let Some(country) = &args.country {
        let value = table.get(country).ok_or_else(|| CliError::Validation {
            field: "country".into(),
            reason: format!(
                "no {kind} intensity for '{country}'; \
                 run `carbonly intensity --kind {kind}` to list codes"
            ),
        })?;
        let found = entry(&country.trim().to_uppercase(), value);
        output::render_single(
            ctx.output,
            &found,
            |e| {
                format!(
                    "Country:  {}\nValue:    {:.2} g CO2/kWh\nTable:    {} ({}, {})",
                    e.country, e.intensity, e.kind, table.source, e.year
                )
            },
            |e| e.intensity.to_string(),
        )
    } else {
        let entries: Vec<IntensityEntry> = table.iter().map(|(c, v)| entry(c, v)).collect();
        output::render_list(
            ctx.output,
            &entries,
            |e| IntensityRow::from(e),
            |e| format!("{}\t{}", e.country, e.intensity),
        )
    };

    output::print_output(&out, ctx.quiet);
    Ok(())
}
