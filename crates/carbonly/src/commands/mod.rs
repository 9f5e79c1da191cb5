//! Command handlers, one module per top-level subcommand.

pub mod config_cmd;
pub mod estimate;
pub mod hosting;
pub mod intensity;
pub mod page;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Route a command that needs resolved settings to its handler.
pub async fn dispatch(cmd: &Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Bytes(args) => estimate::handle_bytes(args, ctx),
        Command::Visit(args) => estimate::handle_visit(args, ctx),
        Command::Page(args) => page::handle(args, ctx).await,
        Command::Intensity(args) => intensity::handle(args, ctx),
        Command::Hosting(args) => hosting::handle(args, ctx).await,
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
