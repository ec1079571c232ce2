use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::agents::{DEFAULT_AGENT_COUNT, DEFAULT_REPLY_DELAY};
use crate::search::DEFAULT_SEARCH_DELAY;
use crate::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub agent_count: usize,
    pub reply_delay_ms: u64,
    pub search_delay_ms: u64,
    pub discard_superseded_searches: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_count: DEFAULT_AGENT_COUNT,
            reply_delay_ms: DEFAULT_REPLY_DELAY.as_millis() as u64,
            search_delay_ms: DEFAULT_SEARCH_DELAY.as_millis() as u64,
            discard_superseded_searches: false,
            log_level: "info".to_string(),
        }
    }
}

/// Runtime knobs handed to [`crate::Home`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub agent_count: usize,
    pub reply_delay: Duration,
    pub search_delay: Duration,
    pub discard_superseded_searches: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().settings()
    }
}

impl Config {
    /// Load from the default location, falling back to defaults if no file exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.agent_count == 0 {
            return Err(Error::Config("agent_count must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            agent_count: self.agent_count,
            reply_delay: Duration::from_millis(self.reply_delay_ms),
            search_delay: Duration::from_millis(self.search_delay_ms),
            discard_superseded_searches: self.discard_superseded_searches,
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(Error::NoConfigDir)?;
        Ok(config_dir.join("agentdeck").join("config.json"))
    }
}
