//! Distribution box command handlers.

use smartolt_api::{Odb, OdbAvailability, SmartOltClient};
use tabled::Tabled;

use crate::cli::{GlobalOpts, OdbArgs, OdbCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OdbRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Ports")]
    ports: i64,
}

impl From<&Odb> for OdbRow {
    fn from(o: &Odb) -> Self {
        Self {
            id: o.id.clone(),
            name: o.name.clone(),
            zone: o.zone_id.clone(),
            ports: o.ports,
        }
    }
}

#[derive(Tabled)]
struct AvailabilityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Total")]
    total: i64,
    #[tabled(rename = "Used")]
    used: i64,
    #[tabled(rename = "Available")]
    available: String,
}

fn availability_row(a: &OdbAvailability, color: bool) -> AvailabilityRow {
    AvailabilityRow {
        id: a.odb_id.clone(),
        name: a.odb_name.clone(),
        total: a.total_ports,
        used: a.used_ports,
        available: output::paint_available(a.available_ports, color),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &SmartOltClient,
    args: OdbArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.output_format();

    let out = match args.command {
        OdbCommand::List => {
            let odbs = client.odbs().await?;
            output::render_list(&format, &odbs, |o| OdbRow::from(o), |o| o.id.clone())?
        }
        OdbCommand::Availability => {
            let color = output::should_color(&global.color);
            let report = client.odb_availability().await?;
            output::render_list(
                &format,
                &report,
                |a| availability_row(a, color),
                |a| format!("{}\t{}", a.odb_id, a.available_ports),
            )?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
