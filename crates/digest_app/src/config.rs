//! RON configuration for the `digest` binary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use digest_engine::FetchSettings;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "digest.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub origin: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub store_path: PathBuf,
    pub catalog_path: PathBuf,
    pub counter_path: PathBuf,
    pub export_dir: PathBuf,
    /// Local time of the daily post, `HH:MM`.
    pub daily_time: String,
    pub message_limit: usize,
    pub card_limit: usize,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            endpoint: fetch.endpoint,
            origin: fetch.origin,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_response_bytes: fetch.max_bytes,
            store_path: PathBuf::from("problems.json"),
            catalog_path: PathBuf::from("leetcode_data.csv"),
            counter_path: PathBuf::from("current_problem.txt"),
            export_dir: PathBuf::from("export"),
            daily_time: "07:00".to_string(),
            message_limit: 2000,
            card_limit: 1950,
            log_destination: LogDestination::Terminal,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path`, or `digest.ron` in the working directory when `path` is
    /// `None`. Only the implicit default file may be absent. Returns the file
    /// the settings came from, `None` when the defaults were used.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        match path {
            Some(path) => Self::read(path.to_path_buf(), true),
            None => Self::read(PathBuf::from(DEFAULT_CONFIG_FILE), false),
        }
    }

    fn read(path: PathBuf, explicit: bool) -> Result<(Self, Option<PathBuf>)> {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
                return Ok((Self::default(), None));
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };
        let config: AppConfig =
            ron::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config.daily_time()?;
        Ok((config, Some(path)))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            endpoint: self.endpoint.clone(),
            origin: self.origin.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn daily_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.daily_time.trim(), "%H:%M")
            .with_context(|| format!("daily_time {:?} is not HH:MM", self.daily_time))
    }

    /// Configured level, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> LevelFilter {
        digest_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .context("serializing config")
    }
}
