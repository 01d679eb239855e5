//! Configuration management for hypoview using the prefer crate.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{navigation::DEFAULT_PER_PAGE, SessionMode};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the hypothesis REST API.
    pub api_url: String,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds. None waits indefinitely.
    pub request_timeout: Option<u64>,
    /// Directory CSV exports are written to by the CLI.
    pub export_dir: PathBuf,
    /// Address the viewer server binds to.
    pub host: String,
    pub port: u16,
    /// Which client flavour the viewer session starts in.
    pub mode: SessionMode,
    /// Page size for hypothesis loads.
    pub per_page: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let export_dir = dirs::download_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));

        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: format!("hypoview/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: None,
            export_dir,
            host: "127.0.0.1".to_string(),
            port: 8080,
            mode: SessionMode::default(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Export directory; `~` is expanded.
    #[serde(default)]
    pub export_dir: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// "topics" or "sorting".
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Discovers hypoview config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("hypoview").await {
            Ok(pref_config) => Config {
                api_url: pref_config.get("api_url").ok(),
                user_agent: pref_config.get("user_agent").ok(),
                request_timeout: pref_config.get("request_timeout").ok(),
                export_dir: pref_config.get("export_dir").ok(),
                host: pref_config.get("host").ok(),
                port: pref_config.get("port").ok(),
                mode: pref_config.get("mode").ok(),
                per_page: pref_config.get("per_page").ok(),
            },
            Err(_) => {
                tracing::debug!("No hypoview config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.api_url {
            settings.api_url = url.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = Some(timeout);
        }
        if let Some(ref dir) = self.export_dir {
            let path = shellexpand::tilde(dir);
            settings.export_dir = PathBuf::from(path.as_ref());
        }
        if let Some(ref host) = self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(ref mode) = self.mode {
            match mode.parse() {
                Ok(mode) => settings.mode = mode,
                Err(e) => tracing::warn!("Ignoring config mode: {}", e),
            }
        }
        if let Some(per_page) = self.per_page {
            settings.per_page = per_page.max(1);
        }
    }
}

/// Load settings from configuration.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
