//! Secret key, debug flag and host whitelist checks

use anyhow::Context;

use super::{Check, CheckOutcome};
use crate::config::Settings;

/// Flags placeholder secret keys
pub struct SecretKeyCheck;

impl Check for SecretKeyCheck {
    fn name(&self) -> &'static str {
        "SECRET_KEY"
    }

    fn run(&self, settings: &Settings) -> anyhow::Result<CheckOutcome> {
        let secret_key = settings
            .app
            .secret_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .context("SECRET_KEY setting must not be empty")?;

        if secret_key.starts_with(&settings.checks.insecure_key_prefix) {
            return Ok(CheckOutcome::fail(
                "Warning: Using default insecure SECRET_KEY. Generate a new one for production!",
            ));
        }
        Ok(CheckOutcome::pass("SECRET_KEY is configured."))
    }
}

/// Reports the debug flag; never fails
pub struct DebugModeCheck;

impl Check for DebugModeCheck {
    fn name(&self) -> &'static str {
        "DEBUG Mode"
    }

    fn run(&self, settings: &Settings) -> anyhow::Result<CheckOutcome> {
        if settings.app.debug {
            return Ok(CheckOutcome::pass("DEBUG mode is ON (suitable for development)."));
        }
        Ok(CheckOutcome::pass("DEBUG mode is OFF (suitable for production)."))
    }
}

/// Production deployments need an explicit host whitelist
pub struct AllowedHostsCheck;

impl Check for AllowedHostsCheck {
    fn name(&self) -> &'static str {
        "ALLOWED_HOSTS"
    }

    fn run(&self, settings: &Settings) -> anyhow::Result<CheckOutcome> {
        let hosts = &settings.app.allowed_hosts;

        if hosts.is_empty() && !settings.app.debug {
            return Ok(CheckOutcome::fail(
                "ALLOWED_HOSTS is empty. This is required when DEBUG=False.",
            ));
        }

        let listed = if hosts.is_empty() {
            "Any (DEBUG mode)".to_string()
        } else {
            hosts.join(", ")
        };
        Ok(CheckOutcome::pass(format!("ALLOWED_HOSTS: {listed}")))
    }
}
