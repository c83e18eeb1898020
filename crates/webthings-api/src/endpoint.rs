// Candidate base-URL construction.
//
// A candidate is `{scheme}://{host}[:{port}]/`, with the port left out
// when it is the scheme's default. Candidates are derived on demand from
// a `GatewayConfig`; nothing here remembers which one was selected.

use std::fmt;
use std::net::Ipv6Addr;

use url::{Host, Url};

use crate::config::{DEFAULT_HTTP_PORT, DEFAULT_HTTPS_PORT};
use crate::error::Error;
use crate::validate::validate_address;

/// Transport scheme for the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// The port implied when none is written in the URL.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Http => DEFAULT_HTTP_PORT,
            Self::Https => DEFAULT_HTTPS_PORT,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a candidate base URL for `host`.
///
/// The result goes through [`validate_address`], so a malformed host
/// surfaces as [`Error::InvalidAddress`] rather than a broken URL. `host`
/// must be a bare host: a port, path, userinfo, query or fragment smuggled
/// into it is rejected.
///
/// ```
/// use webthings_api::{Scheme, candidate_url};
///
/// let url = candidate_url(Scheme::Https, "things.example.com", 443).unwrap();
/// assert_eq!(url.as_str(), "https://things.example.com/");
///
/// let url = candidate_url(Scheme::Http, "gateway.local", 8080).unwrap();
/// assert_eq!(url.as_str(), "http://gateway.local:8080/");
/// ```
pub fn candidate_url(scheme: Scheme, host: &str, port: u16) -> Result<Url, Error> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::InvalidAddress {
            address: String::new(),
            reason: "gateway host is empty".into(),
        });
    }

    // Bare IPv6 literals need brackets inside a URL authority.
    let ipv6 = host.parse::<Ipv6Addr>().ok();
    let authority_host = if ipv6.is_some() {
        format!("[{host}]")
    } else {
        host.to_owned()
    };

    let expected_port = (port != scheme.default_port()).then_some(port);
    let raw = match expected_port {
        Some(port) => format!("{scheme}://{authority_host}:{port}"),
        None => format!("{scheme}://{authority_host}"),
    };

    let url = validate_address(&raw)?;
    let invalid = |reason: &str| Error::InvalidAddress {
        address: raw.clone(),
        reason: reason.to_owned(),
    };

    let same_host = match (url.host(), ipv6) {
        (Some(Host::Ipv6(parsed)), Some(addr)) => parsed == addr,
        (Some(_), None) => url
            .host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(host)),
        _ => false,
    };
    if !same_host {
        return Err(invalid("gateway host must be a bare host name or IP address"));
    }
    if url.port() != expected_port {
        return Err(invalid("gateway host must not carry its own port"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("gateway host must not contain user info"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("gateway host must not contain a path, query or fragment"));
    }

    Ok(url)
}
