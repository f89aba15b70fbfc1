//! Command-line surface: argument types and the verb router.
//!
//! Output goes to a caller-supplied writer so the router can be driven
//! from tests the same way the binary drives it with stdout.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, Subcommand};

use crate::engine::{Direction, Engine, StatusReport};
use crate::error::Result;
use crate::history::HistoryQuery;

pub const USAGE: &str = "Usage: vpn-client <command> [options]";
pub const COMMANDS: [&str; 4] = ["status", "up", "down", "history"];

#[derive(Debug, Parser)]
#[command(
    name = "vpn-client",
    about = "Simulated VPN client with an event log",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Path to the event log (overrides VPN_EVENTS_FILE)
    #[arg(long, global = true)]
    pub events_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current status and uptime
    Status,
    /// Bring the connection up
    Up,
    /// Take the connection down
    Down,
    /// List recorded events
    History {
        /// Earliest day to include (YYYY-MM-DD)
        #[arg(short, long)]
        from: Option<String>,
        /// Latest day to include (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,
        /// Sort by timestamp: asc or desc
        #[arg(short, long)]
        sort: Option<String>,
        /// Only show events with this status
        #[arg(short = 'S', long)]
        status: Option<String>,
    },
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Cli {
    /// Parse `argv` (program name first).
    ///
    /// An unrecognized flag in command position becomes
    /// [`Command::Unknown`] instead of a clap usage error.
    pub fn parse_args<I, T>(argv: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let err = match Cli::try_parse_from(&argv) {
            Ok(cli) => return Ok(cli),
            Err(err) => err,
        };
        if err.kind() != ErrorKind::UnknownArgument {
            return Err(err);
        }

        let first = argv.get(1).map(|arg| arg.to_string_lossy().into_owned());
        let invalid = match err.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(arg)) => Some(arg.as_str()),
            _ => None,
        };
        match (first, invalid) {
            (Some(first), Some(invalid))
                if first == invalid || first.starts_with(&format!("{invalid}=")) =>
            {
                Ok(Cli {
                    events_file: None,
                    command: Some(Command::Unknown(vec![first])),
                })
            }
            _ => Err(err),
        }
    }
}

/// Usage text printed when no command is given.
pub fn write_usage(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{USAGE}")?;
    writeln!(out, "Commands:")?;
    for command in COMMANDS {
        writeln!(out, "  {command}")?;
    }
    Ok(())
}

/// `Unknown command: ...` for anything the parser did not recognize.
pub fn write_unknown(out: &mut dyn Write, args: &[String]) -> Result<()> {
    let name = args.first().map(String::as_str).unwrap_or_default();
    writeln!(out, "Unknown command: {name}")?;
    Ok(())
}

/// Dispatch one command against `engine`.
///
/// Returns a failing exit code when `status` finds no events.
pub fn execute(command: Command, engine: &mut Engine, out: &mut dyn Write) -> Result<ExitCode> {
    match command {
        Command::Status => {
            let report = engine.status()?;
            writeln!(out, "{report}")?;
            if report == StatusReport::NoEvents {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Up => {
            engine.transition(Direction::Up, out)?;
        }
        Command::Down => {
            engine.transition(Direction::Down, out)?;
        }
        Command::History {
            from,
            to,
            sort,
            status,
        } => {
            let query = HistoryQuery {
                from,
                to,
                sort,
                status,
            };
            let events = engine.history(&query)?;
            if events.is_empty() {
                writeln!(out, "No events found")?;
            }
            for event in &events {
                writeln!(out, "{event}")?;
            }
        }
        Command::Unknown(args) => write_unknown(out, &args)?,
    }
    Ok(ExitCode::SUCCESS)
}
