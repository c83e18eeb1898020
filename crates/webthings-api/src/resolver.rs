// Endpoint resolution: primary domain first, fallback second, else nothing.
//
// The selection is recomputed on every `resolve()` call; the resolver
// only holds the two candidate URLs, which are pure functions of config.

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::config::GatewayConfig;
use crate::endpoint::candidate_url;
use crate::error::Error;
use crate::probe::{ReachabilityProbe, TcpProbe};

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The primary domain answered.
    Primary(Url),
    /// The primary domain did not answer but the fallback did.
    Fallback(Url),
    /// Neither candidate answered.
    Unreachable,
}

impl Resolution {
    /// The selected base URL, if any.
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Primary(url) | Self::Fallback(url) => Some(url),
            Self::Unreachable => None,
        }
    }

    pub fn into_url(self) -> Option<Url> {
        match self {
            Self::Primary(url) | Self::Fallback(url) => Some(url),
            Self::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        !matches!(self, Self::Unreachable)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(url) => write!(f, "primary ({url})"),
            Self::Fallback(url) => write!(f, "fallback ({url})"),
            Self::Unreachable => f.write_str("unreachable"),
        }
    }
}

/// Picks the first reachable candidate out of primary and fallback.
pub struct EndpointResolver<P = TcpProbe> {
    primary: Url,
    /// `None` when the fallback domain cannot form a URL; it then never answers.
    fallback: Option<Url>,
    fallback_domain: String,
    timeout: Duration,
    probe: P,
}

impl EndpointResolver<TcpProbe> {
    /// Build a resolver that probes with [`TcpProbe`].
    pub fn new(config: &GatewayConfig) -> Result<Self, Error> {
        Self::with_probe(config, TcpProbe)
    }
}

impl<P: ReachabilityProbe> EndpointResolver<P> {
    /// Build a resolver with a custom probe.
    ///
    /// Fails with [`Error::InvalidAddress`] if the primary domain cannot form
    /// a valid URL; this is the only error the resolver ever returns. A bad
    /// fallback domain is logged and treated as unreachable.
    pub fn with_probe(config: &GatewayConfig, probe: P) -> Result<Self, Error> {
        let scheme = config.scheme();
        let primary = candidate_url(scheme, &config.domain, config.port)?;
        let fallback = match candidate_url(scheme, &config.fallback_domain, config.port) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(
                    fallback = %config.fallback_domain,
                    error = %e,
                    "fallback domain is not usable, only the primary will be probed"
                );
                None
            }
        };

        Ok(Self {
            primary,
            fallback,
            fallback_domain: config.fallback_domain.clone(),
            timeout: config.probe_timeout,
            probe,
        })
    }

    pub fn primary_url(&self) -> &Url {
        &self.primary
    }

    pub fn fallback_url(&self) -> Option<&Url> {
        self.fallback.as_ref()
    }

    /// The fallback URL, or the raw domain when it could not form one.
    pub fn fallback_label(&self) -> String {
        self.fallback.as_ref().map_or_else(
            || format!("{} (invalid address)", self.fallback_domain),
            ToString::to_string,
        )
    }

    /// Probe the primary, then (only if needed) the fallback.
    pub async fn resolve(&self) -> Resolution {
        if self.probe.is_reachable(&self.primary, self.timeout).await {
            info!(url = %self.primary, "using primary gateway endpoint");
            return Resolution::Primary(self.primary.clone());
        }

        if let Some(ref fallback) = self.fallback {
            if self.probe.is_reachable(fallback, self.timeout).await {
                info!(url = %fallback, "primary unreachable, using fallback endpoint");
                return Resolution::Fallback(fallback.clone());
            }
        }

        warn!(
            primary = %self.primary,
            fallback = %self.fallback_label(),
            "no reachable gateway endpoint"
        );
        Resolution::Unreachable
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use secrecy::SecretString;

    use super::*;

    /// Probe that answers from a fixed set of hosts and records call order.
    struct ScriptedProbe {
        reachable: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProbe {
        fn new(reachable: &[&str]) -> Self {
            Self {
                reachable: reachable.iter().map(|h| (*h).to_owned()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ReachabilityProbe for ScriptedProbe {
        async fn is_reachable(&self, url: &Url, _timeout: Duration) -> bool {
            let host = url.host_str().unwrap_or_default().to_owned();
            let reachable = self.reachable.contains(&host);
            self.calls.lock().unwrap().push(host);
            reachable
        }
    }

    fn config() -> GatewayConfig {
        GatewayConfig::new("things.example.com", SecretString::from("t".to_string()))
    }

    #[tokio::test]
    async fn primary_wins_when_reachable() {
        let resolver = EndpointResolver::with_probe(
            &config(),
            ScriptedProbe::new(&["things.example.com", "gateway.local"]),
        )
        .unwrap();

        let resolution = resolver.resolve().await;

        assert_eq!(
            resolution,
            Resolution::Primary(Url::parse("https://things.example.com/").unwrap())
        );
        // Fallback is never probed once the primary answers.
        assert_eq!(resolver.probe.calls(), vec!["things.example.com"]);
    }

    #[tokio::test]
    async fn fallback_used_when_primary_down() {
        let resolver =
            EndpointResolver::with_probe(&config(), ScriptedProbe::new(&["gateway.local"]))
                .unwrap();

        let resolution = resolver.resolve().await;

        assert_eq!(
            resolution,
            Resolution::Fallback(Url::parse("https://gateway.local/").unwrap())
        );
        assert_eq!(
            resolver.probe.calls(),
            vec!["things.example.com", "gateway.local"]
        );
    }

    #[tokio::test]
    async fn unreachable_when_both_down() {
        let resolver =
            EndpointResolver::with_probe(&config(), ScriptedProbe::new(&[])).unwrap();

        let resolution = resolver.resolve().await;

        assert_eq!(resolution, Resolution::Unreachable);
        assert!(resolution.url().is_none());
        assert!(!resolution.is_reachable());
    }

    #[tokio::test]
    async fn every_resolve_probes_again() {
        let resolver =
            EndpointResolver::with_probe(&config(), ScriptedProbe::new(&["things.example.com"]))
                .unwrap();

        resolver.resolve().await;
        resolver.resolve().await;

        assert_eq!(resolver.probe.calls().len(), 2);
    }

    #[test]
    fn candidates_share_scheme_and_port() {
        let cfg = config().with_tls(false).with_port(8080);
        let resolver = EndpointResolver::new(&cfg).unwrap();
        assert_eq!(resolver.primary_url().as_str(), "http://things.example.com:8080/");
        assert_eq!(
            resolver.fallback_url().map(Url::as_str),
            Some("http://gateway.local:8080/")
        );
    }

    #[test]
    fn plain_http_on_port_80_omits_port() {
        let cfg = config().with_tls(false).with_port(80);
        let resolver = EndpointResolver::new(&cfg).unwrap();
        assert_eq!(
            resolver.fallback_url().map(Url::as_str),
            Some("http://gateway.local/")
        );
    }

    #[test]
    fn invalid_primary_fails_construction() {
        let cfg = GatewayConfig::new("not a host", SecretString::from("t".to_string()));
        assert!(matches!(
            EndpointResolver::new(&cfg),
            Err(Error::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_fallback_still_resolves_primary() {
        let cfg = config().with_fallback_domain("my_gateway.lan");
        let resolver =
            EndpointResolver::with_probe(&cfg, ScriptedProbe::new(&["things.example.com"]))
                .unwrap();

        assert!(resolver.fallback_url().is_none());
        assert_eq!(resolver.fallback_label(), "my_gateway.lan (invalid address)");
        assert!(matches!(resolver.resolve().await, Resolution::Primary(_)));
    }

    #[tokio::test]
    async fn invalid_fallback_is_never_probed() {
        let cfg = config().with_fallback_domain("my_gateway.lan");
        let resolver = EndpointResolver::with_probe(&cfg, ScriptedProbe::new(&[])).unwrap();

        assert_eq!(resolver.resolve().await, Resolution::Unreachable);
        assert_eq!(resolver.probe.calls(), vec!["things.example.com"]);
    }

    #[test]
    fn display_names_the_branch() {
        let url = Url::parse("https://gateway.local/").unwrap();
        assert_eq!(
            Resolution::Fallback(url).to_string(),
            "fallback (https://gateway.local/)"
        );
        assert_eq!(Resolution::Unreachable.to_string(), "unreachable");
    }
}
