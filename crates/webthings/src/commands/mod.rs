//! Command dispatch: bridges CLI args -> gateway calls -> output formatting.

pub mod config_cmd;
pub mod resolve;
pub mod things;
pub mod validate;

use webthings_api::Gateway;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    gateway: &Gateway,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Things(args) => things::handle(gateway, args, global).await,
        Command::Resolve => resolve::handle(gateway, global).await,
        // Handled before a gateway is built
        Command::Validate(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
