//! `resolve`: report which candidate endpoint answers right now.

use std::fmt::Write;

use serde::Serialize;
use webthings_api::{Gateway, Resolution};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ResolveReport {
    selected: &'static str,
    url: String,
    primary: String,
    fallback: String,
}

fn detail(r: &ResolveReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Selected:  {}", r.selected);
    let _ = writeln!(out, "URL:       {}", r.url);
    let _ = writeln!(out, "Primary:   {}", r.primary);
    let _ = write!(out, "Fallback:  {}", r.fallback);
    out
}

pub async fn handle(gateway: &Gateway, global: &GlobalOpts) -> Result<(), CliError> {
    let resolver = gateway.resolver();
    let primary = resolver.primary_url().to_string();
    let fallback = resolver.fallback_label();

    let (selected, url) = match gateway.resolve().await {
        Resolution::Primary(url) => ("primary", url),
        Resolution::Fallback(url) => ("fallback", url),
        Resolution::Unreachable => return Err(CliError::Unreachable { primary, fallback }),
    };

    let report = ResolveReport {
        selected,
        url: url.to_string(),
        primary,
        fallback,
    };
    let out = output::render_single(&global.output, &report, detail, |r| r.url.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
