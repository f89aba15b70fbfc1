//! Typed configuration from environment variables.
//!
//! Loads once at startup. Every value has a default, so a bare shell works.

use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_EVENTS_FILE: &str = "events.json";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub events_file: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let events_file = match std::env::var("VPN_EVENTS_FILE") {
            Ok(path) if path.trim().is_empty() => {
                return Err(Error::Config(
                    "VPN_EVENTS_FILE is set but empty".to_string(),
                ));
            }
            Ok(path) => PathBuf::from(path),
            Err(_) => PathBuf::from(DEFAULT_EVENTS_FILE),
        };

        Ok(Self {
            events_file,
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Replace the events file when one was given on the command line.
    pub fn with_events_file(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.events_file = path;
        }
        self
    }
}
