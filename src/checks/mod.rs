//! Configuration checks
//!
//! Each check inspects one aspect of the loaded settings and classifies it.
//! A check that cannot even evaluate its setting returns an error instead of
//! an outcome; the runner reports those separately from plain failures.

mod database;
mod security;

pub use database::{DatabaseConfigCheck, DatabaseConnectionCheck};
pub use security::{AllowedHostsCheck, DebugModeCheck, SecretKeyCheck};

use crate::config::Settings;
use crate::database::DatabaseProbe;

/// Result of a check that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// A single named configuration check
pub trait Check {
    /// Display name, e.g. `SECRET_KEY`
    fn name(&self) -> &'static str;

    /// Evaluate the check against the settings
    fn run(&self, settings: &Settings) -> anyhow::Result<CheckOutcome>;
}

/// The full check list in report order
pub fn standard_checks(probe: Box<dyn DatabaseProbe>) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(SecretKeyCheck),
        Box::new(DebugModeCheck),
        Box::new(AllowedHostsCheck),
        Box::new(DatabaseConfigCheck),
        Box::new(DatabaseConnectionCheck::new(probe)),
    ]
}
