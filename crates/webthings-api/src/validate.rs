//! Gateway address validation.
//!
//! An address must pass two checks: a web-URL pattern check on the raw
//! string, then a structured parse with [`url::Url`]. Only `http` and
//! `https` addresses with a host are accepted.

use url::{Host, Url};

use crate::error::Error;

const MAX_LABEL_LEN: usize = 63;

/// Validate `address` and return the parsed URL.
///
/// ```
/// use webthings_api::validate_address;
///
/// assert!(validate_address("https://gateway.example.com").is_ok());
/// assert!(validate_address("not a url").is_err());
/// ```
pub fn validate_address(address: &str) -> Result<Url, Error> {
    let invalid = |reason: &str| Error::InvalidAddress {
        address: address.to_owned(),
        reason: reason.to_owned(),
    };

    if address.is_empty() {
        return Err(invalid("address is empty"));
    }
    if address.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid("contains whitespace or control characters"));
    }
    if !has_web_scheme(address) {
        return Err(invalid("expected an http:// or https:// address"));
    }

    let url = Url::parse(address).map_err(|e| invalid(&e.to_string()))?;

    match url.host() {
        None => return Err(invalid("missing host")),
        Some(Host::Domain(domain)) => check_domain(domain).map_err(invalid)?,
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => {}
    }

    Ok(url)
}

/// Two-valued form of [`validate_address`].
pub fn is_valid_address(address: &str) -> bool {
    validate_address(address).is_ok()
}

fn has_web_scheme(address: &str) -> bool {
    let lower = address.get(..8).unwrap_or(address).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn check_domain(domain: &str) -> Result<(), &'static str> {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.is_empty() {
        return Err("missing host");
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err("host contains an empty label");
        }
        if label.len() > MAX_LABEL_LEN {
            return Err("host label exceeds 63 characters");
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err("host contains characters outside [A-Za-z0-9-]");
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err("host label starts or ends with '-'");
        }
    }
    Ok(())
}
