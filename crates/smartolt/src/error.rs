//! CLI error types with miette diagnostics.
//!
//! Maps API and config errors into user-facing errors with actionable help
//! text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use smartolt_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to SmartOLT at {url}")]
    #[diagnostic(
        code(smartolt::connection_failed),
        help(
            "Check the base URL and your network connection.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: smartolt_api::error::BoxError,
    },

    #[error("Could not set up TLS: {reason}")]
    #[diagnostic(
        code(smartolt::tls_error),
        help("Check ca_cert in your profile, or use --insecure (-k) for testing.")
    )]
    TlsError { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(smartolt::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(smartolt::auth_failed),
        help(
            "Verify the API token for profile '{profile}'.\n\
             Run: smartolt config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(smartolt::no_credentials),
        help(
            "Configure a token with: smartolt config init\n\
             Or pass --token / set SMARTOLT_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Remote ───────────────────────────────────────────────────────

    #[error("Not found: {message}")]
    #[diagnostic(
        code(smartolt::not_found),
        help("Run: smartolt onu list to see known ONU ids")
    )]
    NotFound { message: String },

    /// Message from the service, shown verbatim.
    #[error("{message}")]
    #[diagnostic(code(smartolt::api_error), help("SmartOLT answered with HTTP status {status}"))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from SmartOLT: {message}")]
    #[diagnostic(
        code(smartolt::unexpected_response),
        help("Run again with -vv to log the request.")
    )]
    UnexpectedResponse { message: String },

    /// API error not yet attached to a request context.
    #[error(transparent)]
    #[diagnostic(code(smartolt::api))]
    Api(#[from] smartolt_api::Error),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(smartolt::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(smartolt::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: smartolt config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(smartolt::no_config),
        help(
            "Create one with: smartolt config init\n\
             Or pass --url and --token.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(smartolt::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(smartolt::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(smartolt::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(smartolt::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NoConfig { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            Self::Api(err) if err.is_transport() => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── API error → CliError mapping ─────────────────────────────────────

/// What the CLI knows about the request that failed.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl RequestContext {
    /// Attach request context to an API error. Other errors pass through.
    pub fn contextualize(&self, err: CliError) -> CliError {
        match err {
            CliError::Api(api) => self.classify(api),
            other => other,
        }
    }

    fn classify(&self, err: smartolt_api::Error) -> CliError {
        use smartolt_api::Error as ApiErr;

        if err.is_timeout() {
            return CliError::Timeout {
                seconds: self.timeout_secs,
            };
        }
        if err.is_unauthorized() {
            return CliError::AuthFailed {
                profile: self.profile.clone(),
                message: err.to_string(),
            };
        }
        if err.is_not_found() {
            return CliError::NotFound {
                message: err.to_string(),
            };
        }

        match err {
            ApiErr::Transport(source) => CliError::ConnectionFailed {
                url: self.url.clone(),
                source,
            },
            ApiErr::Tls(reason) => CliError::TlsError { reason },
            ApiErr::Api { status, message } => CliError::ApiError { status, message },
            err @ ApiErr::Status { status } => CliError::ApiError {
                status,
                message: err.to_string(),
            },
            ApiErr::Deserialization { message, .. } => CliError::UnexpectedResponse { message },
            ApiErr::InvalidUrl(e) => CliError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },
            ApiErr::InvalidToken(reason) => CliError::Validation {
                field: "token".into(),
                reason,
            },
        }
    }
}
