//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`health`]. Each handler lives in its
//! own submodule.

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::FormRelayError;

pub async fn dispatch(cli: Cli) -> Result<(), FormRelayError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  formrelay v{version} \u{2014} multipart form relay for the HubSpot forms API\n\n  \
         No command provided. To get started:\n\n    \
         formrelay run                     Start the relay on 0.0.0.0:3000\n    \
         formrelay health                  Check a running instance\n    \
         formrelay --help                  See all commands and options\n"
    );
}
