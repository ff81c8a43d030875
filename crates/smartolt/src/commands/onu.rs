//! ONU command handlers.

use chrono::TimeDelta;
use smartolt_api::{
    AuthorizeOnu, GponChannel, OnuDetails, OnuListItem, OnuMode, OnuSignal, OnuStatus, PonType,
    SmartOltClient, UnconfiguredOnu,
};
use tabled::Tabled;

use crate::cli::{
    AuthorizeArgs, GlobalOpts, GponChannelArg, OnuArgs, OnuCommand, OnuModeArg, PonTypeArg,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OnuRow {
    #[tabled(rename = "External ID")]
    id: String,
    #[tabled(rename = "ODB")]
    odb: String,
}

impl From<&OnuListItem> for OnuRow {
    fn from(o: &OnuListItem) -> Self {
        Self {
            id: o.unique_external_id.clone(),
            odb: o.odb_name.clone(),
        }
    }
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SN")]
    sn: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Change")]
    last_change: String,
}

fn status_row(s: &OnuStatus, color: bool) -> StatusRow {
    StatusRow {
        id: s.id.clone(),
        sn: s.sn.clone(),
        location: format!("{}/{}/{}/{}", s.olt_id, s.board, s.port, s.onu),
        status: output::paint_status(&s.status, color),
        last_change: s.last_status_change.clone(),
    }
}

#[derive(Tabled)]
struct UnconfiguredRow {
    #[tabled(rename = "SN")]
    sn: String,
    #[tabled(rename = "PON")]
    pon_type: String,
    #[tabled(rename = "Board")]
    board: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Type")]
    onu_type: String,
}

impl From<&UnconfiguredOnu> for UnconfiguredRow {
    fn from(u: &UnconfiguredOnu) -> Self {
        Self {
            sn: u.sn.clone(),
            pon_type: u.pon_type.clone(),
            board: u.board.clone(),
            port: u.port.clone(),
            onu_type: u.onu_type_name.clone(),
        }
    }
}

#[derive(Tabled)]
struct IdRow {
    #[tabled(rename = "External ID")]
    id: String,
}

// ── Detail views ────────────────────────────────────────────────────

fn detail(d: &OnuDetails) -> String {
    let mut lines = vec![
        format!("External ID: {}", d.external_id),
        format!("SN:          {}", d.sn),
        format!("Name:        {}", d.name),
        format!("OLT:         {} ({})", d.olt_name, d.olt_id),
        format!("Location:    board {} port {} onu {}", d.board, d.port, d.onu),
        format!("Type:        {}", d.onu_type_name),
        format!("Zone:        {}", d.zone_name),
        format!("ODB:         {}", util::or_dash(Some(d.odb_name.as_str()))),
        format!("Address:     {}", util::or_dash(d.address.as_deref())),
        format!("Mode:        {} / {}", d.mode, d.wan_mode),
        format!("IP:          {}", util::or_dash(d.ip_address.as_deref())),
        format!("Admin:       {}", d.administrative_status),
    ];
    for sp in &d.service_ports {
        lines.push(format!(
            "Service {}:   vlan {} up {} down {}",
            sp.port, sp.vlan, sp.upload_speed, sp.download_speed
        ));
    }
    lines.join("\n")
}

fn signal_detail(s: &OnuSignal) -> String {
    [
        format!("Signal:    {}", s.onu_signal),
        format!("Value:     {}", s.onu_signal_value),
        format!("1310 nm:   {}", util::or_dash(Some(s.onu_signal_1310.as_str()))),
        format!("1490 nm:   {}", util::or_dash(Some(s.onu_signal_1490.as_str()))),
    ]
    .join("\n")
}

// ── Argument mapping ────────────────────────────────────────────────

fn authorize_request(args: AuthorizeArgs) -> AuthorizeOnu {
    AuthorizeOnu {
        olt_id: args.olt_id,
        pon_type: match args.pon_type {
            PonTypeArg::Gpon => PonType::Gpon,
            PonTypeArg::Epon => PonType::Epon,
        },
        gpon_channel: match args.channel {
            GponChannelArg::Gpon => GponChannel::Gpon,
            GponChannelArg::XgPon => GponChannel::XgPon,
            GponChannelArg::XgsPon => GponChannel::XgsPon,
        },
        board: args.board,
        port: args.port,
        sn: args.sn,
        vlan: args.vlan,
        onu_type: args.onu_type,
        zone: args.zone,
        odb: args.odb,
        name: args.name,
        address_or_comment: args.address,
        onu_mode: match args.mode {
            OnuModeArg::Routing => OnuMode::Routing,
            OnuModeArg::Bridging => OnuMode::Bridging,
        },
        onu_external_id: args.external_id,
    }
}

fn reboot_age(days: i64) -> Result<TimeDelta, CliError> {
    if days < 0 {
        return Err(CliError::Validation {
            field: "days".into(),
            reason: "must not be negative".into(),
        });
    }
    TimeDelta::try_days(days).ok_or_else(|| CliError::Validation {
        field: "days".into(),
        reason: format!("{days} is out of range"),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &SmartOltClient,
    args: OnuArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = global.output_format();
    let color = output::should_color(&global.color);

    match args.command {
        OnuCommand::Details { id } => {
            let onu = client.onu_details(&id).await?;
            let out = output::render_single(&format, &onu, detail, |d| d.external_id.clone())?;
            output::print_output(&out, global.quiet);
        }

        OnuCommand::Signal { id } => {
            let signal = client.onu_signal(&id).await?;
            let out = output::render_single(&format, &signal, signal_detail, |s| {
                s.onu_signal_value.clone()
            })?;
            output::print_output(&out, global.quiet);
        }

        OnuCommand::List => {
            let onus = client.all_onus().await?;
            let out = output::render_list(&format, &onus, |o| OnuRow::from(o), |o| {
                o.unique_external_id.clone()
            })?;
            output::print_output(&out, global.quiet);
        }

        OnuCommand::Statuses { olt_id } => {
            let statuses = client.onu_statuses(olt_id).await?;
            let out = output::render_list(
                &format,
                &statuses,
                |s| status_row(s, color),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
        }

        OnuCommand::NeedsReboot { days, olt_id } => {
            let ids = client
                .onus_online_longer_than(olt_id, reboot_age(days)?)
                .await?;
            let out = output::render_list(
                &format,
                &ids,
                |id| IdRow { id: id.clone() },
                |id| id.clone(),
            )?;
            output::print_output(&out, global.quiet);
        }

        OnuCommand::Unconfigured { olt_id } => {
            let onus = client.unconfigured_onus(olt_id).await?;
            let out = output::render_list(
                &format,
                &onus,
                |u| UnconfiguredRow::from(u),
                |u| u.sn.clone(),
            )?;
            output::print_output(&out, global.quiet);
        }

        OnuCommand::Reboot { id } => {
            if !util::confirm("reboot", &format!("Reboot ONU {id}?"), global.yes)? {
                return Ok(());
            }
            client.reboot_onu(&id).await?;
            output::print_done(&format!("Reboot requested for {id}"), global.quiet, color);
        }

        OnuCommand::Enable { id } => {
            client.enable_onu(&id).await?;
            output::print_done(&format!("Enabled {id}"), global.quiet, color);
        }

        OnuCommand::Disable { id } => {
            if !util::confirm(
                "disable",
                &format!("Disable ONU {id}? The subscriber loses service."),
                global.yes,
            )? {
                return Ok(());
            }
            client.disable_onu(&id).await?;
            output::print_done(&format!("Disabled {id}"), global.quiet, color);
        }

        OnuCommand::Speed {
            id,
            download,
            upload,
        } => {
            client.update_speed_profile(&id, &download, &upload).await?;
            output::print_done(
                &format!("Speed profiles of {id} set to {download} down / {upload} up"),
                global.quiet,
                color,
            );
        }

        OnuCommand::Authorize(args) => {
            let request = authorize_request(args);
            client.authorize_onu(&request).await?;
            output::print_done(
                &format!("Authorized {} as {}", request.sn, request.onu_external_id),
                global.quiet,
                color,
            );
        }
    }
    Ok(())
}
