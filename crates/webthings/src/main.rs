mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use webthings_api::Gateway;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Offline commands
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Validate(ref args) => commands::validate::handle(args, &cli.global),
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "webthings", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the gateway
        cmd => {
            let path = config::config_path(&cli.global);
            let cfg = config::load_config(&path)?;
            let (gateway_config, transport) = config::resolve_settings(&cli.global, &cfg, &path)?;
            let gateway = Gateway::new(gateway_config, transport)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &gateway, &cli.global).await
        }
    }
}
