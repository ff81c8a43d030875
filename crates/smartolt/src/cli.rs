//! Clap derive structures for the `smartolt` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// smartolt -- manage SmartOLT fiber networks from the command line
#[derive(Debug, Parser)]
#[command(
    name = "smartolt",
    version,
    about = "Manage SmartOLT fiber networks from the command line",
    long_about = "Inspect ONUs, act on them, and report distribution box \
        occupancy through the SmartOLT cloud API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "SMARTOLT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL, e.g. https://acme.smartolt.com/api (overrides profile)
    #[arg(long, short = 'u', env = "SMARTOLT_URL", global = true)]
    pub url: Option<String>,

    /// API token (overrides profile credentials)
    #[arg(long, env = "SMARTOLT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "SMARTOLT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SMARTOLT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SMARTOLT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Selected output format, table when unset.
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or_default()
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect and control ONUs
    #[command(alias = "o")]
    Onu(OnuArgs),

    /// Distribution boxes and their port availability
    Odb(OdbArgs),

    /// List the account's speed profiles
    #[command(alias = "sp")]
    SpeedProfiles,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ONU
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OnuArgs {
    #[command(subcommand)]
    pub command: OnuCommand,
}

#[derive(Debug, Subcommand)]
pub enum OnuCommand {
    /// Show full details of one ONU
    #[command(alias = "get")]
    Details {
        /// ONU external id
        id: String,
    },

    /// Show optical signal levels of one ONU
    Signal {
        /// ONU external id
        id: String,
    },

    /// List all ONUs with their distribution box
    #[command(alias = "ls")]
    List,

    /// List ONU statuses on an OLT
    Statuses {
        /// OLT id
        #[arg(long, default_value_t = 1)]
        olt_id: u32,
    },

    /// List ONUs online longer than a threshold (reboot candidates)
    NeedsReboot {
        /// Minimum uptime in days
        #[arg(long, default_value_t = 14)]
        days: i64,

        /// OLT id
        #[arg(long, default_value_t = 1)]
        olt_id: u32,
    },

    /// List ONUs detected but not yet authorized on an OLT
    Unconfigured {
        /// OLT id
        olt_id: u32,
    },

    /// Reboot an ONU
    Reboot {
        /// ONU external id
        id: String,
    },

    /// Enable an ONU
    Enable {
        /// ONU external id
        id: String,
    },

    /// Disable an ONU
    Disable {
        /// ONU external id
        id: String,
    },

    /// Assign download and upload speed profiles by name
    Speed {
        /// ONU external id
        id: String,

        /// Download speed profile name
        #[arg(long)]
        download: String,

        /// Upload speed profile name
        #[arg(long)]
        upload: String,
    },

    /// Authorize an ONU on a PON port
    Authorize(AuthorizeArgs),
}

#[derive(Debug, Args)]
pub struct AuthorizeArgs {
    /// OLT id
    #[arg(long)]
    pub olt_id: String,

    /// Board number
    #[arg(long)]
    pub board: String,

    /// PON port number
    #[arg(long)]
    pub port: String,

    /// ONU serial number
    #[arg(long)]
    pub sn: String,

    /// ONU type name, e.g. HG8546M
    #[arg(long)]
    pub onu_type: String,

    /// Zone name
    #[arg(long)]
    pub zone: String,

    /// Customer name
    #[arg(long)]
    pub name: String,

    /// Service VLAN
    #[arg(long)]
    pub vlan: String,

    /// External id to assign
    #[arg(long)]
    pub external_id: String,

    /// PON type
    #[arg(long, value_enum, default_value = "gpon")]
    pub pon_type: PonTypeArg,

    /// GPON channel
    #[arg(long, value_enum, default_value = "gpon")]
    pub channel: GponChannelArg,

    /// ONU mode
    #[arg(long, value_enum, default_value = "routing")]
    pub mode: OnuModeArg,

    /// Distribution box name
    #[arg(long)]
    pub odb: Option<String>,

    /// Address or free-form comment
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PonTypeArg {
    Gpon,
    Epon,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GponChannelArg {
    Gpon,
    XgPon,
    XgsPon,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OnuModeArg {
    Routing,
    Bridging,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ODB
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OdbArgs {
    #[command(subcommand)]
    pub command: OdbCommand,
}

#[derive(Debug, Subcommand)]
pub enum OdbCommand {
    /// List distribution boxes
    #[command(alias = "ls")]
    List,

    /// Show total, used and available ports per distribution box
    #[command(alias = "avail")]
    Availability,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
