// ── Gateway connection configuration ──
//
// Describes *where* the gateway lives and how to authenticate with it.
// Carries the token but never touches disk. The CLI (or any embedding
// application) constructs a `GatewayConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;

use crate::endpoint::Scheme;

/// Fallback host tried when the primary domain does not answer.
///
/// The gateway advertises itself under this mDNS name on the local network.
pub const DEFAULT_FALLBACK_DOMAIN: &str = "gateway.local";

/// Default gateway port (HTTPS).
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Default port for plain-HTTP gateways.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Upper bound for a single reachability probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Configuration for talking to a single WebThings gateway.
///
/// Immutable once built. The token is a [`SecretString`], so the derived
/// `Debug` output never contains it.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Primary gateway domain (e.g. `things.example.com`).
    pub domain: String,
    /// Token generated from the gateway UI.
    pub token: SecretString,
    /// Reach the gateway over HTTPS. Default: `true`.
    pub use_tls: bool,
    /// Secondary host, typically a local-network name. Default: `gateway.local`.
    pub fallback_domain: String,
    /// Gateway port. Default: 443.
    pub port: u16,
    /// Timeout for each reachability probe. Default: 1000 ms.
    pub probe_timeout: Duration,
}

impl GatewayConfig {
    /// Build a config with the documented defaults.
    pub fn new(domain: impl Into<String>, token: SecretString) -> Self {
        Self {
            domain: domain.into(),
            token,
            use_tls: true,
            fallback_domain: DEFAULT_FALLBACK_DOMAIN.into(),
            port: DEFAULT_HTTPS_PORT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_fallback_domain(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_domain = fallback.into();
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// The URL scheme implied by `use_tls`.
    pub fn scheme(&self) -> Scheme {
        if self.use_tls {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> SecretString {
        SecretString::from("super-secret-token".to_string())
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = GatewayConfig::new("things.example.com", token());
        assert!(cfg.use_tls);
        assert_eq!(cfg.port, 443);
        assert_eq!(cfg.fallback_domain, "gateway.local");
        assert_eq!(cfg.probe_timeout, Duration::from_millis(1000));
        assert_eq!(cfg.scheme(), Scheme::Https);
    }

    #[test]
    fn builder_overrides() {
        let cfg = GatewayConfig::new("things.example.com", token())
            .with_tls(false)
            .with_port(8080)
            .with_fallback_domain("192.168.1.20")
            .with_probe_timeout(Duration::from_millis(250));
        assert_eq!(cfg.scheme(), Scheme::Http);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.fallback_domain, "192.168.1.20");
        assert_eq!(cfg.probe_timeout, Duration::from_millis(250));
    }

    #[test]
    fn debug_output_redacts_token() {
        let cfg = GatewayConfig::new("things.example.com", token());
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret-token"), "{rendered}");
        assert!(rendered.contains("things.example.com"));
    }
}
