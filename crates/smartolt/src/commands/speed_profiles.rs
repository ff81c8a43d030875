//! Speed profile command handler.

use smartolt_api::{SmartOltClient, SpeedProfile};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SpeedProfileRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Type")]
    profile_type: String,
}

impl From<&SpeedProfile> for SpeedProfileRow {
    fn from(p: &SpeedProfile) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            speed: p.speed.clone(),
            direction: p.direction.clone(),
            profile_type: p.profile_type.clone(),
        }
    }
}

pub async fn handle(client: &SmartOltClient, global: &GlobalOpts) -> Result<(), CliError> {
    let profiles = client.speed_profiles().await?;
    let out = output::render_list(
        &global.output_format(),
        &profiles,
        |p| SpeedProfileRow::from(p),
        |p| p.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
