//! Toolkit settings: `toolkit.json` in a context's config folder, with
//! environment overrides.

use std::path::Path;

use serde::Deserialize;
use tracing::{warn, Level};

use crate::context::ProjectContext;
use crate::errors::RigkitResult;
use crate::filesystem::{find_file, ScanMode};

pub const SETTINGS_FILE_STEM: &str = "toolkit";
pub const LOG_LEVEL_ENV: &str = "RIGKIT_LOG";
pub const STRICT_SCANS_ENV: &str = "RIGKIT_STRICT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `trace`, `debug`, `info`, `warn` or `error`.
    pub log_level: String,
    /// Treat missing folders as errors instead of empty results.
    pub strict_scans: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            strict_scans: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Read `toolkit.json` from `config_dir` (defaults when absent), then
    /// apply environment overrides.
    pub fn load(config_dir: impl AsRef<Path>) -> RigkitResult<Self> {
        let settings = match find_file(config_dir, SETTINGS_FILE_STEM, "json", ScanMode::Lenient)? {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        Ok(settings.with_env_overrides())
    }

    /// Settings from the context's config folder, or the environment when
    /// the context has none.
    pub fn for_context(context: &ProjectContext) -> RigkitResult<Self> {
        match context.config_path() {
            Some(config_dir) => Self::load(config_dir),
            None => Ok(Self::from_env()),
        }
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(LOG_LEVEL_ENV).ok(),
            std::env::var(STRICT_SCANS_ENV).ok(),
        )
    }

    fn with_overrides(mut self, log_level: Option<String>, strict_scans: Option<String>) -> Self {
        if let Some(level) = log_level {
            let level = level.trim().to_lowercase();
            if !level.is_empty() {
                self.log_level = level;
            }
        }
        if let Some(flag) = strict_scans {
            match parse_flag(&flag) {
                Some(strict) => self.strict_scans = strict,
                None => warn!("Ignoring {STRICT_SCANS_ENV}={flag:?}"),
            }
        }
        self
    }

    pub fn scan_mode(&self) -> ScanMode {
        if self.strict_scans {
            ScanMode::Strict
        } else {
            ScanMode::Lenient
        }
    }

    /// The configured level, `INFO` when it does not parse.
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}
