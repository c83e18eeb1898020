//! Config subcommand handlers.

use std::fmt::Write;

use webthings_api::{Scheme, candidate_url};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, KEYRING_SERVICE, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
    }
    cfg
}

/// Format config for display. Expects an already-redacted config.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "probe_timeout_ms = {}", cfg.defaults.probe_timeout_ms);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "domain = \"{}\"", p.domain);
        if let Some(port) = p.port {
            let _ = writeln!(out, "port = {port}");
        }
        if let Some(tls) = p.tls {
            let _ = writeln!(out, "tls = {tls}");
        }
        if let Some(ref fallback) = p.fallback_domain {
            let _ = writeln!(out, "fallback_domain = \"{fallback}\"");
        }
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ms) = p.probe_timeout_ms {
            let _ = writeln!(out, "probe_timeout_ms = {ms}");
        }
    }

    out.trim_end().to_owned()
}

/// Build a profile from the global connection flags.
fn profile_from_flags(global: &GlobalOpts, token_env: Option<String>) -> Result<Profile, CliError> {
    let domain = global.gateway.clone().ok_or_else(|| CliError::Validation {
        field: "gateway".into(),
        reason: "pass --gateway <domain> to describe the profile".into(),
    })?;

    // Same candidate the gateway will build at run time.
    let scheme = if global.plain_http {
        Scheme::Http
    } else {
        Scheme::Https
    };
    let port = global.port.unwrap_or(scheme.default_port());
    candidate_url(scheme, &domain, port)?;

    Ok(Profile {
        domain,
        port: global.port,
        tls: global.plain_http.then_some(false),
        fallback_domain: global.fallback.clone(),
        token: None,
        token_env,
        ca_cert: None,
        insecure: global.insecure.then_some(true),
        timeout: global.timeout,
        probe_timeout_ms: global.probe_timeout_ms,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config(&path)?);
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Add {
            name,
            token_env,
            set_default,
        } => {
            let mut cfg = config::load_config(&path)?;
            let profile = profile_from_flags(global, token_env)?;

            let first = cfg.profiles.is_empty();
            cfg.profiles.insert(name.clone(), profile);
            if set_default || first {
                cfg.default_profile = Some(name.clone());
            }

            config::save_config(&path, &cfg)?;
            if !global.quiet {
                eprintln!("✓ Profile '{name}' written to {}", path.display());
                eprintln!("  Store its token with: webthings --profile {name} config set-token");
            }
            Ok(())
        }

        ConfigCommand::SetToken => {
            let cfg = config::load_config(&path)?;
            let profile_name = config::active_profile_name(global, &cfg);

            let token = match global.token {
                Some(ref token) => token.clone(),
                None => rpassword::prompt_password(format!("Token for '{profile_name}': "))?,
            };
            let token = token.trim();
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }

            let entry = keyring::Entry::new(KEYRING_SERVICE, &config::keyring_user(&profile_name))?;
            entry.set_password(token)?;
            if !global.quiet {
                eprintln!("✓ Token for profile '{profile_name}' stored in system keyring");
            }
            Ok(())
        }
    }
}
