// HTTP client for the gateway's `/things` endpoint.
//
// Auth: `Authorization: Bearer <token>` default header, marked sensitive.
// The gateway serves its web UI on the same paths unless the request asks
// for JSON, so `Accept: application/json` is sent on every request.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Error;
use crate::model::Thing;
use crate::transport::TransportConfig;

const THINGS_PATH: &str = "/things";

/// Async client bound to one resolved gateway base URL.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a resolved base URL, the gateway token, and transport config.
    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken {
                message: format!("invalid header value: {e}"),
            })?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The gateway base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /things` — every thing the gateway knows, in gateway order.
    pub async fn fetch_things(&self) -> Result<Vec<Thing>, Error> {
        let url = self.url(THINGS_PATH)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(|e| {
            warn!(error = %e, "things request failed without a response");
            Error::Transport(e)
        })?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            // The status is the error; a body that fails to arrive is just empty.
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "things request rejected by gateway");
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let things: Vec<Thing> = match serde_json::from_str(&body) {
            Ok(things) => things,
            Err(e) => {
                return Err(Error::Deserialization {
                    message: e.to_string(),
                    body,
                });
            }
        };

        info!(count = things.len(), "fetched things from gateway");
        Ok(things)
    }
}
