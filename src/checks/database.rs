//! Database settings display and connectivity checks

use anyhow::Context;
use tracing::debug;

use super::{Check, CheckOutcome};
use crate::config::{DatabaseSettings, Settings, DEFAULT_DATABASE_ALIAS};
use crate::database::DatabaseProbe;

const NOT_SET: &str = "Not set";

fn default_database(settings: &Settings) -> anyhow::Result<&DatabaseSettings> {
    settings
        .default_database()
        .with_context(|| format!("database alias '{DEFAULT_DATABASE_ALIAS}' is not configured"))
}

fn or_not_set(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_SET)
}

/// Summarises the default database settings; never fails once the alias exists
pub struct DatabaseConfigCheck;

impl Check for DatabaseConfigCheck {
    fn name(&self) -> &'static str {
        "Database Config"
    }

    fn run(&self, settings: &Settings) -> anyhow::Result<CheckOutcome> {
        let db = default_database(settings)?;

        let mut info = format!(
            "Database Engine: {}\nDatabase Name: {}",
            or_not_set(db.engine.as_deref()),
            or_not_set(db.name.as_deref()),
        );

        if !db.is_file_based() {
            let port = db.port.map(|p| p.to_string());
            info.push_str(&format!("\nDatabase User: {}", or_not_set(db.user.as_deref())));
            info.push_str(&format!("\nDatabase Host: {}", or_not_set(db.host.as_deref())));
            info.push_str(&format!("\nDatabase Port: {}", or_not_set(port.as_deref())));
        }

        Ok(CheckOutcome::pass(info))
    }
}

/// Runs `SELECT 1` against the default database
pub struct DatabaseConnectionCheck {
    probe: Box<dyn DatabaseProbe>,
}

impl DatabaseConnectionCheck {
    pub fn new(probe: Box<dyn DatabaseProbe>) -> Self {
        Self { probe }
    }
}

impl Check for DatabaseConnectionCheck {
    fn name(&self) -> &'static str {
        "Database Connection"
    }

    fn run(&self, settings: &Settings) -> anyhow::Result<CheckOutcome> {
        let db = default_database(settings)?;

        match self.probe.ping(db) {
            Ok(()) => Ok(CheckOutcome::pass("Database connection successful!")),
            Err(e) => {
                debug!(error = %e.format_for_log(), "Connection probe failed");
                Ok(CheckOutcome::fail(format!("Database connection failed: {e}")))
            }
        }
    }
}
