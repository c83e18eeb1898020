//! Things command handlers.

use tabled::Tabled;
use webthings_api::{Gateway, Thing};

use crate::cli::{GlobalOpts, ThingsArgs, ThingsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ThingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Properties")]
    properties: usize,
    #[tabled(rename = "Href")]
    href: String,
}

impl From<&Thing> for ThingRow {
    fn from(t: &Thing) -> Self {
        Self {
            id: t.id.clone().unwrap_or_default(),
            title: t.display_name().unwrap_or_default().to_owned(),
            types: t.types.join(", "),
            properties: t.properties.len(),
            href: t.href.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    gateway: &Gateway,
    args: ThingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ThingsCommand::List => {
            let things = gateway.fetch_things().await?;
            let out = output::render_list(&global.output, &things, |t| ThingRow::from(t), |t| {
                t.identifier().unwrap_or_default().to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
