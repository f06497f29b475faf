use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use litsearch_core::{DEFAULT_MAX_RESULTS, MAX_RESULTS_MAX, MAX_RESULTS_MIN};
use litsearch_engine::StreamSettings;
use serde::{Deserialize, Serialize};

use super::cli::Cli;

const DEFAULT_SETTINGS_FILE: &str = "litsearch.ron";

/// Settings file contents. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    /// `None` skips the stop notification.
    pub stop_endpoint: Option<String>,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub connect_timeout_secs: u64,
    pub default_max_results: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let stream = StreamSettings::default();
        Self {
            endpoint: stream.endpoint,
            stop_endpoint: stream.stop_endpoint,
            export_dir: PathBuf::from("."),
            log_file: PathBuf::from("litsearch.log"),
            connect_timeout_secs: stream.connect_timeout.as_secs(),
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Settings {
    /// Reads `path`, or `litsearch.ron` when no path is given. Only the
    /// implicit default file may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_SETTINGS_FILE);
                if path.exists() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing settings file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut settings: Settings = ron::from_str(text)?;
        settings.default_max_results = settings
            .default_max_results
            .clamp(MAX_RESULTS_MIN, MAX_RESULTS_MAX);
        Ok(settings)
    }

    /// Command-line flags win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(endpoint) = &cli.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(dir) = &cli.export_dir {
            self.export_dir = dir.clone();
        }
    }

    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings {
            endpoint: self.endpoint.clone(),
            stop_endpoint: self.stop_endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}
