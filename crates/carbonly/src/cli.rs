//! Clap derive structures for the `carbonly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man pages, so it depends on nothing
//! but clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// carbonly -- estimate the CO2 of moving data over the internet
#[derive(Debug, Parser)]
#[command(
    name = "carbonly",
    version,
    about = "Estimate the CO2 emissions of data transfer",
    long_about = "Estimate the CO2 emissions of transferring data, of page visits, \
        and of whole pages from a captured traffic manifest.\n\n\
        Supports the Sustainable Web Design model (default) and the OneByte model.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the platform default
    #[arg(long, env = "CARBONLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Estimation model (overrides config)
    #[arg(long, short = 'm', global = true)]
    pub model: Option<ModelArg>,

    /// Result granularity (overrides config)
    #[arg(long, short = 'r', global = true)]
    pub results: Option<ResultsArg>,

    /// Visit caching assumptions (overrides config)
    #[arg(long, global = true)]
    pub caching: Option<CachingArg>,

    /// Output format (overrides config)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output (overrides config)
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelArg {
    /// Sustainable Web Design, component weighted
    Swd,
    /// OneByte, flat ratio per byte
    #[value(name = "1byte")]
    OneByte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResultsArg {
    /// Total grams only
    Total,
    /// Per-component breakdown
    #[value(alias = "segment")]
    Segments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CachingArg {
    /// Returning visits are 1 - first visits (0.75 / 0.25)
    Complementary,
    /// First and returning visits set separately (0.8 / 0.2)
    Independent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Emissions for transferring a number of bytes
    #[command(alias = "b")]
    Bytes(EstimateArgs),

    /// Emissions per page visit, with caching applied
    #[command(alias = "v")]
    Visit(EstimateArgs),

    /// Emissions of a page from a traffic manifest (pagexray JSON)
    #[command(alias = "p")]
    Page(PageArgs),

    /// Look up grid carbon intensity by country
    #[command(alias = "i")]
    Intensity(IntensityArgs),

    /// Check whether domains are green hosted
    Hosting(HostingArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Estimates ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EstimateArgs {
    /// Number of bytes transferred
    pub bytes: u64,

    /// The data is served from green infrastructure
    #[arg(long, short = 'g')]
    pub green: bool,

    /// Include the variables used in the calculation
    #[arg(long, short = 't')]
    pub trace: bool,
}

// ── Page ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Path to the manifest JSON, or - for stdin
    pub manifest: PathBuf,

    /// Which aggregate to show
    #[arg(long, short = 'b', default_value = "summary")]
    pub by: PageView,

    /// Domain to treat as green (repeatable)
    #[arg(long = "green-domain", short = 'g')]
    pub green_domains: Vec<String>,

    /// JSON file with a list of green domains
    #[arg(long)]
    pub green_file: Option<PathBuf>,

    /// Ask the greencheck API which manifest domains are green
    #[arg(long)]
    pub check_hosting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageView {
    /// Page total and party split
    Summary,
    /// Emissions per domain
    Domains,
    /// Emissions per content type
    Types,
    /// The ten heaviest assets
    Resources,
    /// First-party vs third-party
    Party,
}

// ── Intensity ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IntensityArgs {
    /// ISO 3166-1 alpha-3 country code; omit to list the table
    pub country: Option<String>,

    /// Which table to read
    #[arg(long, short = 'k', default_value = "average")]
    pub kind: IntensityKindArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IntensityKindArg {
    /// Average grid intensity
    Average,
    /// Marginal grid intensity
    Marginal,
}

// ── Hosting ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HostingArgs {
    #[command(subcommand)]
    pub command: HostingCommand,
}

#[derive(Debug, Subcommand)]
pub enum HostingCommand {
    /// Check one or more domains against the greencheck API
    Check {
        /// Domains to check
        #[arg(required = true)]
        domains: Vec<String>,

        /// Greencheck API base URL (overrides config)
        #[arg(long)]
        endpoint: Option<String>,

        /// Request timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
