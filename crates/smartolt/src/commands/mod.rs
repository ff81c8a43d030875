//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod config_cmd;
pub mod odb;
pub mod onu;
pub mod speed_profiles;
pub mod util;

use smartolt_api::SmartOltClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &SmartOltClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Onu(args) => onu::handle(client, args, global).await,
        Command::Odb(args) => odb::handle(client, args, global).await,
        Command::SpeedProfiles => speed_profiles::handle(client, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
