//! # vpn-client
//!
//! Simulated VPN client backed by an append-only event log.
//!
//! `up` and `down` record a transient STARTING/STOPPING event followed by a
//! randomly drawn outcome; `status` resolves the latest not-failed event;
//! `history` filters and sorts the log.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod model;
pub mod storage;
pub mod telemetry;
