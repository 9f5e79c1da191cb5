//! CLI error types with miette diagnostics.
//!
//! Maps core, API and config errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use carbonly_config::ConfigError;
use carbonly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Estimation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(carbonly::invalid_model),
        help("Pass --model swd or --model 1byte, or fix `model` under [estimate] in your config.")
    )]
    InvalidModel { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(carbonly::unsupported),
        help("Per-visit estimates need the Sustainable Web Design model: --model swd")
    )]
    Unsupported { message: String },

    #[error("{message}")]
    #[diagnostic(code(carbonly::invalid_argument))]
    InvalidArgument { message: String },

    // ── Manifest ─────────────────────────────────────────────────────
    #[error("Cannot read manifest {path}")]
    #[diagnostic(
        code(carbonly::manifest),
        help("The manifest must be pagexray-style JSON with `domains` and `assets`.")
    )]
    Manifest {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{message}")]
    #[diagnostic(
        code(carbonly::invalid_manifest),
        help("Check the asset URLs and `firstPartyRegEx` in the manifest.")
    )]
    InvalidManifest { message: String },

    // ── Hosting ──────────────────────────────────────────────────────
    #[error("Could not reach the greencheck API at {url}")]
    #[diagnostic(
        code(carbonly::connection_failed),
        help(
            "Check your network connection or point `endpoint` under [hosting] at a \
             reachable greencheck service."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Greencheck request timed out after {seconds}s")]
    #[diagnostic(
        code(carbonly::timeout),
        help("Increase the timeout with --timeout or `timeout` under [hosting].")
    )]
    Timeout { seconds: u64 },

    #[error("{message}")]
    #[diagnostic(code(carbonly::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(carbonly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(carbonly::config_exists),
        help("Use `carbonly config init --force` to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(carbonly::config),
        help("Check the file printed by `carbonly config path`.")
    )]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(carbonly::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidModel { .. }
            | Self::InvalidArgument { .. }
            | Self::Validation { .. }
            | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidConfiguration { .. } => Self::InvalidModel { message },
            CoreError::UnsupportedOperation { .. } => Self::Unsupported { message },
            CoreError::InvalidArgument { .. } => Self::InvalidArgument { message },
            CoreError::InvalidAssetUrl { .. } | CoreError::InvalidFirstPartyPattern { .. } => {
                Self::InvalidManifest { message }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Model(core) => core.into(),
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

// ── API error → CliError mapping ─────────────────────────────────────

impl CliError {
    /// Map a greencheck failure, naming the endpoint that was tried.
    pub fn from_api(err: carbonly_api::Error, url: &str) -> Self {
        match err {
            carbonly_api::Error::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            carbonly_api::Error::Transport(e) => Self::ConnectionFailed {
                url: url.to_owned(),
                source: Box::new(e),
            },
            carbonly_api::Error::InvalidUrl(e) => Self::Validation {
                field: "hosting.endpoint".into(),
                reason: e.to_string(),
            },
            other => Self::Api {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let unknown: CliError = CoreError::InvalidConfiguration {
            model: "x".into(),
        }
        .into();
        assert_eq!(unknown.exit_code(), exit_code::USAGE);

        let unsupported: CliError = CoreError::UnsupportedOperation {
            operation: "per_visit",
            alternative: "per_byte",
        }
        .into();
        assert_eq!(unsupported.exit_code(), exit_code::UNSUPPORTED);
    }

    #[test]
    fn api_timeout_maps_to_timeout_code() {
        let err = CliError::from_api(
            carbonly_api::Error::Timeout { timeout_secs: 3 },
            "https://example.org",
        );
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }
}
