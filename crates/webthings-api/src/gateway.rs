// Gateway facade: resolve an endpoint, then talk to it.
//
// Resolution always runs before the fetch, and runs again on every call;
// the client is built against whichever candidate answered this time.

use tracing::debug;

use crate::client::GatewayClient;
use crate::config::GatewayConfig;
use crate::error::Error;
use crate::model::Thing;
use crate::probe::{ReachabilityProbe, TcpProbe};
use crate::resolver::{EndpointResolver, Resolution};
use crate::transport::TransportConfig;

/// A configured gateway: primary and fallback candidates plus credentials.
pub struct Gateway<P = TcpProbe> {
    config: GatewayConfig,
    transport: TransportConfig,
    resolver: EndpointResolver<P>,
}

impl Gateway<TcpProbe> {
    pub fn new(config: GatewayConfig, transport: TransportConfig) -> Result<Self, Error> {
        Self::with_probe(config, transport, TcpProbe)
    }
}

impl<P: ReachabilityProbe> Gateway<P> {
    pub fn with_probe(
        config: GatewayConfig,
        transport: TransportConfig,
        probe: P,
    ) -> Result<Self, Error> {
        let resolver = EndpointResolver::with_probe(&config, probe)?;
        Ok(Self {
            config,
            transport,
            resolver,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn resolver(&self) -> &EndpointResolver<P> {
        &self.resolver
    }

    /// Run one resolution attempt.
    pub async fn resolve(&self) -> Resolution {
        self.resolver.resolve().await
    }

    /// Resolve, then build a client for the selected endpoint.
    ///
    /// [`Resolution::Unreachable`] becomes [`Error::Unreachable`] here.
    pub async fn connect(&self) -> Result<GatewayClient, Error> {
        let Some(base_url) = self.resolve().await.into_url() else {
            return Err(Error::Unreachable {
                primary: self.resolver.primary_url().to_string(),
                fallback: self.resolver.fallback_label(),
            });
        };

        debug!(%base_url, "building gateway client");
        GatewayClient::new(base_url, &self.config.token, &self.transport)
    }

    /// Resolve an endpoint and list its things.
    pub async fn fetch_things(&self) -> Result<Vec<Thing>, Error> {
        self.connect().await?.fetch_things().await
    }
}
