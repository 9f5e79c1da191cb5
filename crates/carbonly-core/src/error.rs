// ── Core error types ──
//
// Every failure the estimation engine can raise. All of them are raised
// synchronously at the point of violation; nothing is retried and no
// partial result is returned.

use thiserror::Error;

/// Documentation page listing the available models.
pub const MODELS_DOC_URL: &str = "https://developers.thegreenwebfoundation.org/co2js/models/";

/// Documentation page listing the available methods.
pub const METHODS_DOC_URL: &str = "https://developers.thegreenwebfoundation.org/co2js/methods/";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Caller errors ────────────────────────────────────────────────
    /// A boolean greenness flag was expected but something else was passed.
    #[error("{message}")]
    InvalidArgument { message: String },

    // ── Construction errors ──────────────────────────────────────────
    #[error(
        "\"{model}\" is not a valid model. Please use \"1byte\" for the OneByte model, \
         and \"swd\" for the Sustainable Web Design model.\nSee {MODELS_DOC_URL} to learn \
         more about the models available."
    )]
    InvalidConfiguration { model: String },

    // ── Capability errors ────────────────────────────────────────────
    #[error(
        "The {operation}() method is not supported in the model you are using. \
         Try using {alternative}() instead.\nSee {METHODS_DOC_URL} to learn more \
         about the methods available."
    )]
    UnsupportedOperation {
        operation: &'static str,
        alternative: &'static str,
    },

    // ── Manifest errors ──────────────────────────────────────────────
    #[error("Cannot resolve a host for asset URL '{url}': {reason}")]
    InvalidAssetUrl { url: String, reason: String },

    #[error("Invalid first-party pattern '{pattern}': {reason}")]
    InvalidFirstPartyPattern { pattern: String, reason: String },
}
