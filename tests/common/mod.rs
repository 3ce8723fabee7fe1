//! Common test utilities and fixtures
//!
//! Every command runs inside a scratch directory with HOME pointed at it, so
//! no settings file from the developer's machine leaks into a test.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

const PORTAL_VARS: &[&str] = &[
    "PORTAL_SETTINGS",
    "PORTAL_APP_NAME",
    "PORTAL_SECRET_KEY",
    "PORTAL_DEBUG",
    "PORTAL_ALLOWED_HOSTS",
    "PORTAL_DB_ENGINE",
    "PORTAL_DB_NAME",
    "PORTAL_DB_USER",
    "PORTAL_DB_PASSWORD",
    "PORTAL_DB_HOST",
    "PORTAL_DB_PORT",
    "PORTAL_CONNECT_TIMEOUT_SECS",
    "PORTAL_LOG_LEVEL",
    "PORTAL_LOG_FILE",
    "PORTAL_LOG_JSON",
    "RUST_LOG",
];

/// Isolated scratch directory for one test
pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Write a file into the scratch directory
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Create an empty SQLite database file
    pub fn sqlite_db(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        fs::File::create(&path).unwrap();
        path
    }

    /// The binary, with a clean environment rooted in the scratch directory
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("portal-check").unwrap();
        for var in PORTAL_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.root.path())
            .env("HOME", self.root.path())
            .env("XDG_CONFIG_HOME", self.path("xdg"));
        cmd
    }
}

/// Settings for a production-ready portal backed by the given SQLite file
pub fn healthy_settings(db_path: &std::path::Path) -> String {
    format!(
        r#"
[app]
name = "RHCI Portal"
secret_key = "n7kd9-production-secret-0f3a"
debug = false
allowed_hosts = ["portal.example.com", "www.portal.example.com"]

[databases.default]
engine = "django.db.backends.sqlite3"
name = "{}"
"#,
        db_path.display()
    )
}
