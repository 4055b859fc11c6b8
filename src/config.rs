//! Application configuration management.
//!
//! This module handles loading and saving the dashboard configuration:
//! where the sync backend's API lives, which path is the login view, and
//! where session state is persisted.
//!
//! Configuration is stored at `~/.config/syncboard/config.json`; the
//! `SYNCBOARD_API_URL` and `SYNCBOARD_LOGIN_PATH` environment variables
//! (including via a `.env` file) override it.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/state directory paths
pub(crate) const APP_NAME: &str = "syncboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// State file name holding the persisted session fields
const STATE_FILE: &str = "state.json";

/// Default base URL of the sync backend's REST API.
/// The backend binds 0.0.0.0:8080 out of the box and serves under /api.
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";

/// Default path of the login view
const DEFAULT_LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub login_path: String,
    /// Overrides the default state file location when set.
    pub state_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            state_file: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Pick up a .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("SYNCBOARD_API_URL") {
            config.api_base_url = url;
        }
        if let Ok(login_path) = std::env::var("SYNCBOARD_LOGIN_PATH") {
            config.login_path = login_path;
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Location of the persisted session state file.
    pub fn state_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.state_file {
            return Ok(path.clone());
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(STATE_FILE))
    }
}
