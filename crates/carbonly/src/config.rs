//! CLI-side configuration: resolve the config file, then let global flags
//! override what it says.

use std::path::PathBuf;

use clap::ValueEnum;

use carbonly_config::Config;
use carbonly_core::Co2;

use crate::cli::{CachingArg, ColorMode, GlobalOpts, ModelArg, OutputFormat, ResultsArg};
use crate::error::CliError;
use crate::output;

/// Everything a command handler needs after flags and config are merged.
pub struct Context {
    pub config: Config,
    pub path: PathBuf,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Context {
    pub fn co2(&self) -> Result<Co2, CliError> {
        Ok(Co2::new(self.config.to_co2_config()?))
    }
}

/// Config file in effect: `--config` / `CARBONLY_CONFIG`, else the platform path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(carbonly_config::config_path)
}

pub fn resolve(global: &GlobalOpts) -> Result<Context, CliError> {
    let path = config_path(global);
    let mut config = carbonly_config::load_config_from(&path)?;
    apply_overrides(&mut config, global);

    let output = match global.output {
        Some(format) => format,
        None => parse_enum::<OutputFormat>("defaults.output", &config.defaults.output)?,
    };
    let color = match global.color {
        Some(mode) => mode,
        None => parse_enum::<ColorMode>("defaults.color", &config.defaults.color)?,
    };

    Ok(Context {
        config,
        path,
        output,
        color: output::should_color(color),
        quiet: global.quiet,
    })
}

fn apply_overrides(config: &mut Config, global: &GlobalOpts) {
    let estimate = &mut config.estimate;
    if let Some(model) = global.model {
        estimate.model = match model {
            ModelArg::Swd => "swd",
            ModelArg::OneByte => "1byte",
        }
        .into();
    }
    if let Some(results) = global.results {
        estimate.results = match results {
            ResultsArg::Total => "total",
            ResultsArg::Segments => "segments",
        }
        .into();
    }
    if let Some(caching) = global.caching {
        estimate.caching = match caching {
            CachingArg::Complementary => "complementary",
            CachingArg::Independent => "independent",
        }
        .into();
    }
}

fn parse_enum<E: ValueEnum>(field: &str, value: &str) -> Result<E, CliError> {
    E::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}
