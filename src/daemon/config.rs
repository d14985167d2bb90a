use std::{ffi::OsString, path::PathBuf};

use anyhow::{Result, bail};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tokio::fs::read_to_string;
use tracing::warn;
use vmreg::{api::ApiServerConfig, events::EventSettings};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing, skip_deserializing)]
    pub config_path: Option<PathBuf>,

    #[serde(rename = "api")]
    pub api_config: ApiConfig,

    #[serde(rename = "events")]
    pub events_config: EventsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(rename = "host")]
    pub host: String,
    #[serde(rename = "port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventsConfig {
    #[serde(rename = "count")]
    pub count: usize,
    #[serde(rename = "interval-secs")]
    pub interval_secs: u32,
    #[serde(rename = "user")]
    pub user: String,
    #[serde(rename = "action")]
    pub action: String,
    #[serde(rename = "uri")]
    pub uri: String,
}

impl Default for EventsConfig {
    fn default() -> Self {
        let settings = EventSettings::default();
        Self {
            count: settings.count,
            interval_secs: settings.interval.num_seconds() as u32,
            user: settings.user,
            action: settings.action,
            uri: settings.uri,
        }
    }
}

impl From<&EventsConfig> for EventSettings {
    fn from(config: &EventsConfig) -> Self {
        EventSettings {
            count: config.count,
            interval: TimeDelta::seconds(config.interval_secs as i64),
            user: config.user.clone(),
            action: config.action.clone(),
            uri: config.uri.clone(),
        }
    }
}

impl From<&ApiConfig> for ApiServerConfig {
    fn from(config: &ApiConfig) -> Self {
        ApiServerConfig {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

/// The path named on the command line, else the one in `VMREG_CONFIG`.
fn explicit_config_path(
    path_override: Option<PathBuf>,
    env_path: Option<OsString>,
) -> Option<PathBuf> {
    path_override.or_else(|| env_path.map(PathBuf::from))
}

/// Default locations, most specific first.
fn default_config_paths() -> Result<Vec<PathBuf>> {
    let mut paths = vec![std::env::current_dir()?.join("vmreg.toml")];

    // $HOME/.config/vmreg/config.toml on linux
    if let Some(project_dirs) = directories::ProjectDirs::from("", "", "vmreg") {
        paths.push(project_dirs.config_dir().join("config.toml"));
    }

    paths.push(PathBuf::from("/etc/vmreg/config.toml"));
    Ok(paths)
}

fn resolve_config_path(
    explicit: Option<PathBuf>,
    candidates: &[PathBuf],
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Config file {} does not exist", path.display());
        }
        return Ok(Some(path));
    }

    for path in candidates {
        if path.exists() {
            return Ok(Some(path.clone()));
        }
        warn!("No config found at {}", path.display());
    }

    Ok(None)
}

impl Config {
    pub async fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let explicit = explicit_config_path(path_override, std::env::var_os("VMREG_CONFIG"));
        let config_path = resolve_config_path(explicit, &default_config_paths()?)?;
        Self::load_from(config_path).await
    }

    async fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let Some(config_path) = config_path else {
            warn!("Using default config");
            return Ok(Config::default());
        };

        let config_str = read_to_string(&config_path).await?;
        let mut config: Self = toml::from_str(&config_str)?;
        config.config_path = Some(config_path);

        Ok(config)
    }
}
