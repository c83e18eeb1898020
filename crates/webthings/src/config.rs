//! CLI-owned configuration: TOML profiles, token resolution, and
//! translation to `webthings_api::GatewayConfig`.
//!
//! The library never sees these types -- it receives a pre-built
//! `GatewayConfig` and `TransportConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use webthings_api::config::{DEFAULT_FALLBACK_DOMAIN, DEFAULT_HTTP_PORT, DEFAULT_HTTPS_PORT};
use webthings_api::{GatewayConfig, TlsMode, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Keyring service name for stored tokens.
pub const KEYRING_SERVICE: &str = "webthings";

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named gateway profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_probe_timeout_ms() -> u64 {
    1000
}

/// A named gateway profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Gateway domain (e.g., "things.example.com").
    pub domain: String,

    /// Gateway port. Defaults to the scheme's port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Use HTTPS (default true).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,

    /// Fallback domain (default "gateway.local").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_domain: Option<String>,

    /// Token (plaintext -- prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override request timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override probe timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_timeout_ms: Option<u64>,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path: `--config` flag, else XDG / platform conventions.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    if let Some(ref path) = global.config {
        return path.clone();
    }
    ProjectDirs::from("io", "webthings", "webthings").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("webthings");
    p
}

// ── Config loading / saving ──────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// A missing file yields the defaults; a malformed file is an error.
/// Environment keys use `__` as the nesting separator, e.g.
/// `WEBTHINGS_DEFAULTS__TIMEOUT=10`.
pub fn load_config(path: &Path) -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WEBTHINGS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config(path: &Path, cfg: &Config) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate the active profile + global flags into library configs.
///
/// Flag values take priority over profile values, which take priority
/// over `[defaults]`. Without a profile, `--gateway` alone is enough.
pub fn resolve_settings(
    global: &GlobalOpts,
    cfg: &Config,
    path: &Path,
) -> Result<(GatewayConfig, TransportConfig), CliError> {
    let profile_name = active_profile_name(global, cfg);
    let profile = cfg.profiles.get(&profile_name);

    if profile.is_none() && global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    let empty = Profile::default();
    let profile = profile.unwrap_or(&empty);

    // 1. Domain (flag > env > profile)
    let domain = global
        .gateway
        .clone()
        .or_else(|| Some(profile.domain.clone()).filter(|d| !d.is_empty()))
        .ok_or_else(|| CliError::NoConfig {
            path: path.display().to_string(),
        })?;

    // 2. Scheme and port
    let use_tls = !global.plain_http && profile.tls.unwrap_or(true);
    let default_port = if use_tls {
        DEFAULT_HTTPS_PORT
    } else {
        DEFAULT_HTTP_PORT
    };
    let port = global.port.or(profile.port).unwrap_or(default_port);

    // 3. Fallback
    let fallback = global
        .fallback
        .clone()
        .or_else(|| profile.fallback_domain.clone())
        .unwrap_or_else(|| DEFAULT_FALLBACK_DOMAIN.into());

    // 4. Token
    let token = resolve_token(profile, &profile_name, global)?;

    // 5. Probe timeout
    let probe_ms = global
        .probe_timeout_ms
        .or(profile.probe_timeout_ms)
        .unwrap_or(cfg.defaults.probe_timeout_ms);

    let gateway = GatewayConfig::new(domain, token)
        .with_tls(use_tls)
        .with_port(port)
        .with_fallback_domain(fallback)
        .with_probe_timeout(Duration::from_millis(probe_ms));

    // 6. Transport
    let tls = if global.insecure || profile.insecure.unwrap_or(cfg.defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    let transport = TransportConfig::default()
        .with_tls(tls)
        .with_timeout(Duration::from_secs(timeout));

    Ok((gateway, transport))
}

// ── Credential helpers ───────────────────────────────────────────────

/// Keyring entry name for a profile's token.
pub fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/token")
}

/// Resolve the gateway token from the credential chain.
fn resolve_token(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    // 1. CLI flag / WEBTHINGS_TOKEN
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }

    // 2. Profile's token_env -> env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}
