use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Locations of the five line-oriented input files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_subscribe_path")]
    pub subscribe: PathBuf,
    #[serde(default = "default_alias_path")]
    pub alias: PathBuf,
    #[serde(default = "default_logo_path")]
    pub logo: PathBuf,
    #[serde(default = "default_template_path")]
    pub template: PathBuf,
    #[serde(default = "default_epg_path")]
    pub epg: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_m3u_output_path")]
    pub m3u_path: PathBuf,
    #[serde(default = "default_txt_output_path")]
    pub txt_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout per subscription (humantime, e.g. "10s")
    #[serde(default = "default_fetch_timeout")]
    pub timeout: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Upper bound on simultaneously in-flight subscription fetches
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_admin_token")]
    pub admin_token: String,
    /// Run one aggregation as soon as the server starts
    #[serde(default = "default_update_on_start")]
    pub update_on_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Refuse to aggregate while the input files have validation errors
    #[serde(default = "default_strict_validation")]
    pub strict: bool,
}

fn default_subscribe_path() -> PathBuf {
    PathBuf::from(DEFAULT_SUBSCRIBE_PATH)
}

fn default_alias_path() -> PathBuf {
    PathBuf::from(DEFAULT_ALIAS_PATH)
}

fn default_logo_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOGO_PATH)
}

fn default_template_path() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE_PATH)
}

fn default_epg_path() -> PathBuf {
    PathBuf::from(DEFAULT_EPG_PATH)
}

fn default_m3u_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_M3U_OUTPUT_PATH)
}

fn default_txt_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_TXT_OUTPUT_PATH)
}

fn default_fetch_timeout() -> String {
    DEFAULT_FETCH_TIMEOUT.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_admin_token() -> String {
    DEFAULT_ADMIN_TOKEN.to_string()
}

fn default_update_on_start() -> bool {
    DEFAULT_UPDATE_ON_START
}

fn default_strict_validation() -> bool {
    DEFAULT_STRICT_VALIDATION
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            subscribe: default_subscribe_path(),
            alias: default_alias_path(),
            logo: default_logo_path(),
            template: default_template_path(),
            epg: default_epg_path(),
        }
    }
}

impl SourcesConfig {
    /// All input files rooted at one directory, using the default file names
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            subscribe: dir.join("subscribe.txt"),
            alias: dir.join("alias.txt"),
            logo: dir.join("logo.txt"),
            template: dir.join("template.txt"),
            epg: dir.join("epg.txt"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            m3u_path: default_m3u_output_path(),
            txt_path: default_txt_output_path(),
        }
    }
}

impl OutputConfig {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            m3u_path: dir.join("output.m3u"),
            txt_path: dir.join("output.txt"),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            user_agent: default_user_agent(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl FetchConfig {
    pub fn timeout_duration(&self) -> AppResult<Duration> {
        humantime::parse_duration(&self.timeout).map_err(|e| {
            AppError::configuration(format!("invalid fetch.timeout '{}': {e}", self.timeout))
        })
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            admin_token: default_admin_token(),
            update_on_start: default_update_on_start(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict: default_strict_validation(),
        }
    }
}

impl Config {
    /// Layer defaults, an optional TOML file and `IPTV_AGGREGATOR_*`
    /// environment variables (nested keys split on `__`, e.g.
    /// `IPTV_AGGREGATOR_WEB__PORT`). The plain `PORT` and `ADMIN_TOKEN`
    /// variables are honoured last.
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_file {
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
            } else {
                info!("Config file {} not found, using defaults", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }

        let mut config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| AppError::configuration(e.to_string()))?;

        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(port) => config.web.port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Ok(token) = std::env::var("ADMIN_TOKEN") {
            config.web.admin_token = token;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.fetch.timeout_duration()?;
        if self.fetch.max_concurrency == 0 {
            return Err(AppError::configuration("fetch.max_concurrency must be at least 1"));
        }
        if self.web.admin_token.is_empty() {
            return Err(AppError::configuration("web.admin_token must not be empty"));
        }
        Ok(())
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml_string(&self) -> AppResult<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::internal(e.to_string()))
    }
}
