//! CLI error types with miette diagnostics.
//!
//! Maps `webthings_api::Error` variants into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("No reachable gateway endpoint")]
    #[diagnostic(
        code(webthings::unreachable),
        help(
            "Tried {primary} and then {fallback}.\n\
             Check the gateway domain and port, or set --fallback to a local address."
        )
    )]
    Unreachable { primary: String, fallback: String },

    #[error("Could not connect to gateway at {url}")]
    #[diagnostic(
        code(webthings::connection_failed),
        help("The endpoint answered the probe but the request failed. Retry, or run with -vv.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(webthings::tls_error),
        help(
            "A gateway on the local network usually has a self-signed certificate.\n\
             Use --insecure (-k) to accept it, or set ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(webthings::timeout),
        help("Increase the timeout with --timeout or check gateway responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Gateway rejected the token (HTTP {status})")]
    #[diagnostic(
        code(webthings::auth_failed),
        help(
            "Create a new token in the gateway UI (Settings > Developer > Create local authorization)\n\
             and store it with: webthings config set-token"
        )
    )]
    AuthFailed { status: u16 },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(webthings::no_credentials),
        help(
            "Pass --token, set WEBTHINGS_TOKEN, or store one with: webthings config set-token"
        )
    )]
    NoCredentials { profile: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Gateway returned HTTP {status}")]
    #[diagnostic(code(webthings::api_error), help("Response body: {body}"))]
    GatewayError { status: u16, body: String },

    #[error("Unexpected response from gateway: {message}")]
    #[diagnostic(
        code(webthings::unexpected_response),
        help("Make sure the address points at a WebThings gateway.")
    )]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid gateway address '{address}': {reason}")]
    #[diagnostic(
        code(webthings::invalid_address),
        help("Addresses look like https://gateway.example.com or http://gateway.local:8080")
    )]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(webthings::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(webthings::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: webthings --gateway <domain> config add <name>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No gateway configured")]
    #[diagnostic(
        code(webthings::no_config),
        help(
            "Pass --gateway <domain>, or create a profile with:\n\
             webthings --gateway <domain> config add default --set-default\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(webthings::config))]
    Config(Box<figment::Error>),

    #[error("Failed to serialize config: {0}")]
    #[diagnostic(code(webthings::config_write))]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(webthings::keyring))]
    Keyring(#[from] keyring::Error),

    // ── IO ────────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unreachable { .. } | Self::ConnectionFailed { .. } | Self::TlsError { .. } => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::InvalidAddress { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── webthings_api::Error → CliError mapping ──────────────────────────

impl From<webthings_api::Error> for CliError {
    fn from(err: webthings_api::Error) -> Self {
        use webthings_api::Error as ApiError;

        match err {
            ApiError::InvalidAddress { address, reason } => {
                CliError::InvalidAddress { address, reason }
            }

            ApiError::InvalidUrl(e) => CliError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            ApiError::Unreachable { primary, fallback } => {
                CliError::Unreachable { primary, fallback }
            }

            ApiError::Transport(e) => {
                let url = e
                    .url()
                    .map_or_else(|| "(unknown)".to_owned(), ToString::to_string);
                if e.is_timeout() {
                    CliError::Timeout { url }
                } else {
                    CliError::ConnectionFailed {
                        url,
                        source: Box::new(e),
                    }
                }
            }

            ApiError::Tls(message) => CliError::TlsError { message },

            ApiError::InvalidToken { message } => CliError::Validation {
                field: "token".into(),
                reason: message,
            },

            ApiError::Http {
                status: status @ (401 | 403),
                ..
            } => CliError::AuthFailed { status },

            ApiError::Http { status, body } => CliError::GatewayError { status, body },

            ApiError::Deserialization { message, .. } => {
                CliError::UnexpectedResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_exit_codes() {
        let cases = [
            (
                webthings_api::Error::Unreachable {
                    primary: "https://things.example.com/".into(),
                    fallback: "https://gateway.local/".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                webthings_api::Error::Http {
                    status: 401,
                    body: String::new(),
                },
                exit_code::AUTH,
            ),
            (
                webthings_api::Error::Http {
                    status: 500,
                    body: "boom".into(),
                },
                exit_code::GENERAL,
            ),
            (
                webthings_api::Error::InvalidAddress {
                    address: "not a url".into(),
                    reason: "contains whitespace or control characters".into(),
                },
                exit_code::USAGE,
            ),
        ];

        for (api_err, expected) in cases {
            let cli_err = CliError::from(api_err);
            assert_eq!(cli_err.exit_code(), expected, "{cli_err:?}");
        }
    }
}
