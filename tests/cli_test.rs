//! Router tests: parse argv with clap, run against a temp event log,
//! check what lands on the output stream.

use std::process::ExitCode;

use tempfile::TempDir;
use vpn_client::cli::{self, Cli, Command};
use vpn_client::engine::{Engine, FixedOutcome, ScriptedOutcome};
use vpn_client::error::Error;
use vpn_client::storage::JsonFileStore;

fn engine(dir: &TempDir) -> Engine {
    Engine::new(JsonFileStore::new(dir.path().join("events.json")))
        .with_outcomes(FixedOutcome::success())
}

fn run(engine: &mut Engine, args: &[&str]) -> (Result<ExitCode, Error>, String) {
    let argv = std::iter::once("vpn-client").chain(args.iter().copied());
    let cli = Cli::parse_args(argv).expect("arguments should parse");
    let mut out = Vec::new();
    let result = match cli.command {
        Some(command) => cli::execute(command, engine, &mut out),
        None => cli::write_usage(&mut out).map(|_| ExitCode::SUCCESS),
    };
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn no_arguments_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let (result, output) = run(&mut engine(&dir), &[]);

    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert!(output.contains("Usage: vpn-client <command> [options]"));
    for command in ["status", "up", "down", "history"] {
        assert!(output.contains(&format!("  {command}\n")));
    }
}

#[test]
fn unknown_command_is_named() {
    let dir = tempfile::tempdir().unwrap();
    let (result, output) = run(&mut engine(&dir), &["does not exist"]);

    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert_eq!(output, "Unknown command: does not exist\n");
}

#[test]
fn help_is_an_unknown_command() {
    let dir = tempfile::tempdir().unwrap();
    let (result, output) = run(&mut engine(&dir), &["help"]);

    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert_eq!(output, "Unknown command: help\n");
}

#[test]
fn unknown_flag_in_command_position_is_an_unknown_command() {
    let cli = Cli::parse_args(["vpn-client", "-x"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Unknown(ref args)) if args == &["-x"]));

    let dir = tempfile::tempdir().unwrap();
    let (result, output) = run(&mut engine(&dir), &["-x"]);
    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert_eq!(output, "Unknown command: -x\n");
}

#[test]
fn unknown_flag_after_a_command_is_still_a_usage_error() {
    let err = Cli::parse_args(["vpn-client", "history", "--bogus"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
}

#[test]
fn status_with_no_events_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let (result, output) = run(&mut engine(&dir), &["status"]);

    assert_eq!(result.unwrap(), ExitCode::FAILURE);
    assert_eq!(output, "No events found\n");
}

#[test]
fn up_then_up_again() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine(&dir);

    let (_, output) = run(&mut engine, &["up"]);
    assert_eq!(output, "Starting...\nStatus: UP\n");

    let (_, output) = run(&mut engine, &["up"]);
    assert_eq!(output, "Already UP\n");

    let (result, output) = run(&mut engine, &["status"]);
    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert!(output.starts_with("Status: UP\nUptime: "));
}

#[test]
fn history_on_empty_log() {
    let dir = tempfile::tempdir().unwrap();
    let (_, output) = run(&mut engine(&dir), &["history"]);
    assert_eq!(output, "No events found\n");
}

#[test]
fn history_outside_date_range_finds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine(&dir);
    run(&mut engine, &["up"]).0.unwrap();

    let (_, output) = run(
        &mut engine,
        &["history", "--from", "1999-01-01", "--to", "1999-12-31"],
    );
    assert_eq!(output, "No events found\n");
}

#[test]
fn history_lists_only_the_requested_status() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::new(JsonFileStore::new(dir.path().join("events.json")))
        .with_outcomes(ScriptedOutcome::new([true, true, true]));
    run(&mut engine, &["up"]).0.unwrap();
    run(&mut engine, &["down"]).0.unwrap();
    run(&mut engine, &["up"]).0.unwrap();

    let (_, output) = run(&mut engine, &["history", "-S", "STARTING", "--sort", "desc"]);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert!(line.starts_with("Status: STARTING, Timestamp: "), "{line}");
    }
}

#[test]
fn history_with_invalid_status_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine(&dir);
    run(&mut engine, &["up"]).0.unwrap();

    let (result, output) = run(&mut engine, &["history", "--status", "INVALID_STATUS"]);
    let err = result.unwrap_err();
    assert!(matches!(err, Error::UnknownStatus(ref t) if t == "INVALID_STATUS"));
    assert!(output.is_empty());
}

#[test]
fn history_with_invalid_month_fails_naming_the_date() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine(&dir);
    run(&mut engine, &["up"]).0.unwrap();

    let (result, output) = run(
        &mut engine,
        &["history", "--from", "2024-31-12", "--to", "2024-12-31"],
    );
    let message = result.unwrap_err().to_string();
    assert!(message.contains("2024-31-12"));
    assert!(message.contains("month (valid values 1 - 12): 31"));
    assert!(output.is_empty());
}

#[test]
fn events_file_flag_is_global() {
    let cli = Cli::parse_args(["vpn-client", "status", "--events-file", "/tmp/x.json"]).unwrap();
    assert_eq!(cli.events_file.as_deref(), Some(std::path::Path::new("/tmp/x.json")));
    assert!(matches!(cli.command, Some(Command::Status)));
}
