//! Config subcommand handlers.

use carbonly_config::{Config, save_config_to};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match &args.command {
        ConfigCommand::Init { force } => {
            let path = config::config_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            save_config_to(&Config::default(), &path)?;
            if !global.quiet {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let ctx = config::resolve(global)?;
            let out = match ctx.output {
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&ctx.config).map_err(|e| CliError::Config {
                        message: e.to_string(),
                    })?
                }
                format => {
                    output::render_single(format, &ctx.config, |_| String::new(), |_| String::new())
                }
            };
            output::print_output(out.trim_end(), ctx.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = config::config_path(global);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
