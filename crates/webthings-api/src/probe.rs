// Reachability probing.
//
// A probe answers one question: does the host behind this URL respond
// within the timeout? Every failure (DNS, refused, timeout) is `false`.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{TcpStream, lookup_host};
use tracing::debug;
use url::Url;

/// Timed network-level check against the host of a candidate URL.
///
/// Implementations must not retry and must resolve within `timeout`.
pub trait ReachabilityProbe: Send + Sync {
    fn is_reachable(&self, url: &Url, timeout: Duration) -> impl Future<Output = bool> + Send;
}

/// Probe that resolves the host and opens a TCP connection to the URL's
/// port (explicit, or the scheme default).
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

impl ReachabilityProbe for TcpProbe {
    async fn is_reachable(&self, url: &Url, timeout: Duration) -> bool {
        let Some(host) = url.host_str() else {
            debug!(%url, "no host to probe");
            return false;
        };
        let Some(port) = url.port_or_known_default() else {
            debug!(%url, "no port to probe");
            return false;
        };
        // `host_str` keeps the brackets around IPv6 literals.
        let host = host.trim_start_matches('[').trim_end_matches(']');

        debug!(host, port, ?timeout, "probing gateway");

        match tokio::time::timeout(timeout, connect_any(host, port)).await {
            Ok(Ok(addr)) => {
                debug!(host, %addr, "gateway reachable");
                true
            }
            Ok(Err(e)) => {
                debug!(host, error = %e, "gateway not reachable");
                false
            }
            Err(_) => {
                debug!(host, "gateway probe timed out");
                false
            }
        }
    }
}

/// Try each resolved address in turn; the first successful connect wins.
async fn connect_any(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut last_err = None;
    for addr in lookup_host((host, port)).await? {
        match TcpStream::connect(addr).await {
            Ok(_stream) => return Ok(addr),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
    }))
}
