use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{EnergyError, Result};
use crate::models::{FillMode, Period};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Analysis of household electricity consumption
#[derive(Parser, Debug, Clone)]
#[command(
    name = "household-energy",
    about = "Analysis of household electricity consumption",
    version
)]
pub struct Settings {
    /// Measurement file (10 comma-separated fields per row)
    pub file: Option<PathBuf>,

    /// How corrupted measurements are resolved
    #[arg(long, default_value = "drop", value_parser = ["drop", "forward-fill", "backward-fill"])]
    pub fill_mode: String,

    /// Aggregation period
    #[arg(long, default_value = "minute", value_parser = ["minute", "hour", "day", "month", "hour-of-the-day"])]
    pub period: String,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub output: String,

    /// Skip the statistics table
    #[arg(long)]
    pub no_stats: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,

    /// Problems met while merging persisted settings, logged once logging is up.
    #[arg(skip)]
    pub startup_warnings: Vec<String>,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.household-energy/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".household-energy").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        Self::try_load_from(path).unwrap_or_default()
    }

    /// Like [`load_from`](Self::load_from), but a file that exists and does
    /// not parse is an error.
    pub fn try_load_from(path: &Path) -> Result<Self> {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Ok(Self::default());
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                settings
                    .startup_warnings
                    .push(format!("Failed to clear {}: {}", config_path.display(), e));
            }
            return settings;
        }

        let last = match LastUsedParams::try_load_from(config_path) {
            Ok(last) => last,
            Err(e) => {
                settings.startup_warnings.push(format!(
                    "Ignoring unreadable settings file {}: {}",
                    config_path.display(),
                    e
                ));
                LastUsedParams::default()
            }
        };

        // clap keys args by field name (underscores), not the flag spelling.
        if settings.file.is_none() {
            settings.file = last.file;
        }
        if !is_arg_explicitly_set(&matches, "fill_mode") {
            if let Some(v) = last.fill_mode.filter(|v| v.parse::<FillMode>().is_ok()) {
                settings.fill_mode = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "period") {
            if let Some(v) = last.period.filter(|v| v.parse::<Period>().is_ok()) {
                settings.period = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "output") {
            if let Some(v) = last.output.filter(|v| v == "table" || v == "json") {
                settings.output = v;
            }
        }

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            settings
                .startup_warnings
                .push(format!("Failed to persist settings: {}", e));
        }

        settings
    }

    pub fn fill_mode(&self) -> Result<FillMode> {
        self.fill_mode.parse()
    }

    pub fn period(&self) -> Result<Period> {
        self.period.parse()
    }

    /// The measurement file, required once CLI and persisted values are merged.
    pub fn data_file(&self) -> Result<&Path> {
        self.file.as_deref().ok_or_else(|| {
            EnergyError::Config("no measurement file given and none remembered".to_string())
        })
    }

    pub fn wants_json(&self) -> bool {
        self.output == "json"
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            file: s.file.clone(),
            fill_mode: Some(s.fill_mode.clone()),
            period: Some(s.period.clone()),
            output: Some(s.output.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
