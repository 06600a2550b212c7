//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use megaport_config::ConfigError;
use megaport_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Megaport API: {message}")]
    #[diagnostic(
        code(megaport::connection_failed),
        help(
            "Check network access to the API endpoint.\n\
             Try: megaport --environment staging locations"
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(megaport::auth_failed),
        help(
            "Fetch a fresh token with: megaport token\n\
             Then export MEGAPORT_TOKEN or store it with: megaport token --save"
        )
    )]
    AuthFailed { message: String },

    #[error("No token available to reset")]
    #[diagnostic(
        code(megaport::no_token),
        help("To reset the token, export MEGAPORT_TOKEN with your current token or pass --token.")
    )]
    NoToken,

    // ── Resources ────────────────────────────────────────────────────
    #[error("Product '{identifier}' not found")]
    #[diagnostic(
        code(megaport::not_found),
        help("Run: megaport product list to see products owned by the account")
    )]
    NotFound { identifier: String },

    #[error("{message}")]
    #[diagnostic(
        code(megaport::lookup),
        help("Adjust the --name regex or add filters to narrow the match.")
    )]
    Lookup { message: String },

    #[error("VLAN {vlan} is in use on {port_uid}")]
    #[diagnostic(code(megaport::vlan_in_use))]
    VlanInUse { port_uid: String, vlan: u16 },

    // ── Provider ─────────────────────────────────────────────────────
    #[error("Request rejected by Megaport: {message}")]
    #[diagnostic(code(megaport::rejected))]
    Rejected { message: String },

    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(megaport::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(megaport::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(megaport::profile_not_found),
        help("Available profiles: {available}\nConfig file: {path}")
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(megaport::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(megaport::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Aborted")]
    #[diagnostic(code(megaport::aborted))]
    Aborted,

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(megaport::timeout),
        help(
            "Nothing was rolled back; the product may still converge.\n\
             Raise operation_timeout_secs in the profile or check again later."
        )
    )]
    Timeout { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to render output: {0}")]
    #[diagnostic(code(megaport::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoToken => exit_code::AUTH,
            Self::NotFound { .. } | Self::Lookup { .. } => exit_code::NOT_FOUND,
            Self::VlanInUse { .. } | Self::Rejected { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Config(ConfigError::NoCredentials { .. }) => exit_code::AUTH,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { message } => CliError::ConnectionFailed { message },
            CoreError::Authentication { message } => CliError::AuthFailed { message },
            CoreError::NotFound { identifier } => CliError::NotFound { identifier },
            CoreError::Lookup { message } => CliError::Lookup { message },
            CoreError::VlanUnavailable { vlan, product_uid } => CliError::VlanInUse {
                port_uid: product_uid,
                vlan,
            },
            CoreError::ValidationRejected { message } => CliError::Rejected { message },
            CoreError::InvalidIntent { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            err @ CoreError::Timeout { .. } => CliError::Timeout {
                message: err.to_string(),
            },
            CoreError::Remote { status, message } => CliError::ApiError { status, message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<megaport_api::Error> for CliError {
    fn from(err: megaport_api::Error) -> Self {
        CoreError::from(err).into()
    }
}
