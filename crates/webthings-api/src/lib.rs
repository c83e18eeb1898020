// webthings-api: Async Rust client for the WebThings gateway REST API
//
// Resolves the gateway endpoint (primary domain with a local-network
// fallback), probes reachability, and lists the gateway's things.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod model;
pub mod probe;
pub mod resolver;
pub mod transport;
pub mod validate;

pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use endpoint::{Scheme, candidate_url};
pub use error::Error;
pub use gateway::Gateway;
pub use model::Thing;
pub use probe::{ReachabilityProbe, TcpProbe};
pub use resolver::{EndpointResolver, Resolution};
pub use transport::{TlsMode, TransportConfig};
pub use validate::{is_valid_address, validate_address};
