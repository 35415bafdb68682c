use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cardsearch_engine::DEFAULT_BASE_URL;
use client_logging::LogDestination;
use log::LevelFilter;
use serde::Deserialize;

pub(crate) const CONFIG_FILENAME: &str = "cardsearch.ron";
pub(crate) const API_URL_ENV: &str = "CARDSEARCH_API_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub(crate) enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Settings read from `cardsearch.ron` in the working directory.
///
/// ```ron
/// (
///     api_base_url: "http://localhost:8000",
///     log_target: File,
///     verbose: false,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct ClientConfig {
    pub(crate) api_base_url: String,
    pub(crate) log_target: LogTarget,
    pub(crate) verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            log_target: LogTarget::default(),
            verbose: false,
        }
    }
}

impl ClientConfig {
    pub(crate) fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

/// Loads the config file from `dir` if present, then applies the
/// `CARDSEARCH_API_URL` override. A missing file yields defaults; an
/// unreadable or malformed one is an error.
pub(crate) fn load_config(dir: &Path, api_url_override: Option<String>) -> Result<ClientConfig> {
    let path = dir.join(CONFIG_FILENAME);
    let mut config = match fs::read_to_string(&path) {
        Ok(text) => ron::from_str::<ClientConfig>(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => ClientConfig::default(),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    if let Some(url) = api_url_override {
        let url = url.trim();
        if !url.is_empty() {
            config.api_base_url = url.to_string();
        }
    }
    Ok(config)
}
