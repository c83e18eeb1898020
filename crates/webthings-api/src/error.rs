use thiserror::Error;

/// Top-level error type for the `webthings-api` crate.
///
/// Covers every failure mode of the gateway client: address validation,
/// endpoint resolution, transport, and the `/things` response itself.
/// The CLI maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Addressing ──────────────────────────────────────────────────
    /// The string is not a usable gateway address.
    #[error("Invalid gateway address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Resolution ──────────────────────────────────────────────────
    /// Neither the primary nor the fallback host answered the probe.
    #[error("Gateway unreachable (tried {primary} and {fallback})")]
    Unreachable { primary: String, fallback: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The gateway token cannot be carried in an HTTP header.
    #[error("Invalid gateway token: {message}")]
    InvalidToken { message: String },

    // ── API ─────────────────────────────────────────────────────────
    /// The gateway answered with something other than HTTP 200.
    #[error("Gateway returned HTTP {status}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the gateway rejected the token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Nothing in this crate retries on its own; callers decide.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Unreachable { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The HTTP status code, if the gateway produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
