mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use smartolt_api::SmartOltClient;
use tracing_subscriber::EnvFilter;

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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    cli.global.output = Some(config::output_format(&cli.global, &cfg));

    match cli.command {
        // Config commands don't need an API connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;

            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "smartolt", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let (client_config, ctx) = config::client_config(&cli.global, &cfg)?;
            tracing::debug!(url = %ctx.url, profile = %ctx.profile, "using API");

            let result = match SmartOltClient::new(&client_config) {
                Ok(client) => {
                    tracing::debug!(command = ?cmd, "dispatching command");
                    commands::dispatch(cmd, &client, &cli.global).await
                }
                Err(err) => Err(err.into()),
            };
            result.map_err(|err| ctx.contextualize(err))
        }
    }
}
