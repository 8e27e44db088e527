use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use homedir::my_home;
use serde::{Deserialize, Serialize};

use crate::extract::DEFAULT_CDN_HOST;

const CONFIG_ENV: &str = "CLIPFEED_CONFIG";
const DEFAULT_LISTEN: &str = "0.0.0.0:5000";
const DEFAULT_BASE_URL: &str = "https://us.tiktok.com/api/topic/item_list/";
const DEFAULT_TAG_PARAM: &str = "topic";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// Browser/device fingerprint sent with every upstream request.
/// Values are inserted into the query string as-is, so they are stored
/// already percent-encoded.
const DEFAULT_FINGERPRINT: &[(&str, &str)] = &[
    ("aid", "1988"),
    ("app_language", "en"),
    ("app_name", "tiktok_web"),
    ("battery_info", "0.69"),
    ("browser_language", "en-US"),
    ("browser_name", "Mozilla"),
    ("browser_online", "true"),
    ("browser_platform", "MacIntel"),
    ("channel", "tiktok_web"),
    ("cookie_enabled", "true"),
    ("count", "9"),
    ("device_id", "7146004948433700398"),
    ("device_platform", "web_pc"),
    ("focus_state", "true"),
    ("from_page", "topics_gaming"),
    ("history_len", "9"),
    ("is_fullscreen", "false"),
    ("is_page_visible", "true"),
    ("language", "en"),
    ("os", "mac"),
    ("priority_region", ""),
    ("referer", ""),
    ("region", "US"),
    ("screen_height", "1120"),
    ("screen_width", "1792"),
    ("tz_name", "America%2FChicago"),
    ("webcast_language", "en"),
];

/// How the list of video urls is wrapped in the response body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// `{"urls": [...]}`
    #[default]
    Named,
    /// `[...]`
    Bare,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Query parameter that carries the caller's tag.
    #[serde(default = "default_tag_param")]
    pub tag_param: String,

    /// Fixed query parameters, emitted in name order.
    #[serde(default = "default_fingerprint")]
    pub params: BTreeMap<String, String>,

    /// Host anchoring the video url pattern.
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Proxy for upstream requests (http, https or socks5 url).
    /// Environment proxy variables are ignored.
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tag_param: default_tag_param(),
            params: default_fingerprint(),
            cdn_host: default_cdn_host(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            proxy: None,
        }
    }
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_tag_param() -> String {
    DEFAULT_TAG_PARAM.to_string()
}

fn default_fingerprint() -> BTreeMap<String, String> {
    DEFAULT_FINGERPRINT
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn default_cdn_host() -> String {
    DEFAULT_CDN_HOST.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub response_shape: ResponseShape,
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(skip_serializing, skip_deserializing)]
    path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            response_shape: ResponseShape::default(),
            upstream: UpstreamConfig::default(),
            path: PathBuf::new(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.listen.trim().is_empty() {
            bail!("listen address cannot be empty");
        }

        let upstream = &self.upstream;
        if upstream.base_url.trim().is_empty() {
            bail!("upstream.base_url cannot be empty");
        }
        if upstream.tag_param.trim().is_empty() {
            bail!("upstream.tag_param cannot be empty");
        }
        if upstream.cdn_host.trim().is_empty() {
            bail!("upstream.cdn_host cannot be empty");
        }
        if upstream.fetch_timeout_secs == 0 {
            bail!("upstream.fetch_timeout_secs must be greater than 0");
        }

        Ok(())
    }

    /// Loads the config at `path`, creating it with defaults first
    /// if it does not exist yet.
    pub fn load_with(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("creating default config at {}", path.display());
            let mut config = Self::default();
            config.path = path.to_path_buf();
            config.save()?;
        }

        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Self = serde_yml::from_str(&config_str)
            .with_context(|| format!("config {} is malformed", path.display()))?;

        config.path = path.to_path_buf();
        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let config_str = serde_yml::to_string(&self)?;
        std::fs::write(&self.path, config_str)
            .with_context(|| format!("failed to write config {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Where config.yaml lives: `--config`, then `$CLIPFEED_CONFIG`, then
/// `~/.config/clipfeed/config.yaml`.
pub fn config_path(arg: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    resolve_config_path(
        arg,
        std::env::var(CONFIG_ENV).ok(),
        my_home().ok().flatten(),
    )
}

pub fn resolve_config_path(
    arg: Option<PathBuf>,
    env: Option<String>,
    home: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = arg {
        return Ok(path);
    }

    if let Some(path) = env.filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let home = home.context("could not determine home directory")?;
    Ok(home.join(".config/clipfeed/config.yaml"))
}
