// Transport configuration for building the gateway's reqwest::Client.
//
// TLS verification and request timeout live here so the client module
// only deals with the `/things` exchange itself.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

const USER_AGENT: &str = concat!("webthings-api/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (gateways on the local network are often self-signed).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Whole-request timeout for API calls. Probes have their own timeout.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` that sends `headers` on every request.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_verifies_certificates() {
        let transport = TransportConfig::default();
        assert_eq!(transport.tls, TlsMode::System);
        assert_eq!(transport.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let transport = TransportConfig::default()
            .with_tls(TlsMode::CustomCa("/nonexistent/webthings-ca.pem".into()));
        let result = transport.build_client_with_headers(HeaderMap::new());
        assert!(matches!(result, Err(Error::Tls(_))), "{result:?}");
    }

    #[test]
    fn builds_with_insecure_tls() {
        let transport = TransportConfig::default()
            .with_tls(TlsMode::DangerAcceptInvalid)
            .with_timeout(Duration::from_secs(5));
        assert!(transport.build_client_with_headers(HeaderMap::new()).is_ok());
    }
}
