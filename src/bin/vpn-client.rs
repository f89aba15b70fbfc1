//! vpn-client CLI: drive the simulated connection and query its history.

use std::process::ExitCode;

use vpn_client::cli::{self, Cli, Command};
use vpn_client::config::Config;
use vpn_client::engine::Engine;
use vpn_client::storage::JsonFileStore;
use vpn_client::telemetry::{TelemetryConfig, init_telemetry};

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args(std::env::args_os()).unwrap_or_else(|err| err.exit());
    let mut stdout = std::io::stdout().lock();

    let command = match cli.command {
        None => {
            cli::write_usage(&mut stdout)?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Unknown(args)) => {
            cli::write_unknown(&mut stdout, &args)?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(command) => command,
    };

    let config = Config::from_env()?.with_events_file(cli.events_file);
    init_telemetry(TelemetryConfig {
        default_level: config.log_level.clone(),
    })?;

    let mut engine = Engine::new(JsonFileStore::new(&config.events_file));
    Ok(cli::execute(command, &mut engine, &mut stdout)?)
}
