//! `validate`: offline address check, no gateway needed.

use crate::cli::{GlobalOpts, ValidateArgs};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ValidateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let url = webthings_api::validate_address(&args.address)?;
    output::print_output(url.as_str(), global.quiet);
    Ok(())
}
