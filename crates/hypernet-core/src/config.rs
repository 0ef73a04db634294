use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure
///
/// Loaded from `config.toml` in the platform config dir. Anything missing
/// falls back to the values the live site ships with.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl SiteConfig {
    /// Load config from default location, defaults if there is none
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load from an explicit path, defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: SiteConfig = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    fn config_path() -> crate::Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("hypernet")
            .join("config.toml"))
    }

    pub fn origin(&self) -> crate::Result<Url> {
        Ok(Url::parse(&self.site.origin)?)
    }

    /// Resolve a site-relative path (or absolute URL) against the origin
    pub fn resolve(&self, path: &str) -> crate::Result<Url> {
        Ok(self.origin()?.join(path)?)
    }

    /// Whether the configured origin is a local development host
    pub fn is_dev_host(&self) -> bool {
        self.origin()
            .ok()
            .and_then(|u| u.host_str().map(|h| self.site.dev_hosts.iter().any(|d| d == h)))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    /// Origin the site is served from; decides what counts as same-origin
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Hosts treated as local development
    #[serde(default = "default_dev_hosts")]
    pub dev_hosts: Vec<String>,

    /// Where the cache worker script is registered from
    #[serde(default = "default_worker_script")]
    pub worker_script: String,
}

fn default_origin() -> String {
    "http://localhost:8000".to_string()
}

fn default_dev_hosts() -> Vec<String> {
    vec!["localhost".to_string(), "127.0.0.1".to_string()]
}

fn default_worker_script() -> String {
    "/sw.js".to_string()
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            dev_hosts: default_dev_hosts(),
            worker_script: default_worker_script(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// The contact form's action URL
    #[serde(default = "default_form_endpoint")]
    pub endpoint: String,
}

fn default_form_endpoint() -> String {
    "https://formspree.io/f/hypernet".to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint: default_form_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

fn default_max_events() -> usize {
    crate::logs::MAX_EVENTS
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            max_events: default_max_events(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Version tag; bump it and every older cache is dropped on activation
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Assets fetched into the cache at install time
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    #[serde(default = "default_sync_tag")]
    pub sync_tag: String,

    /// Where queued submissions are flushed to
    #[serde(default = "default_sync_endpoint")]
    pub sync_endpoint: String,

    #[serde(default = "default_notification_icon")]
    pub notification_icon: String,

    #[serde(default = "default_notification_badge")]
    pub notification_badge: String,

    #[serde(default = "default_notification_tag")]
    pub notification_tag: String,

    /// Title used when a push arrives without one
    #[serde(default = "default_title")]
    pub default_title: String,
}

fn default_cache_name() -> String {
    "hypernet-v1".to_string()
}

fn default_precache() -> Vec<String> {
    ["/", "/index.html", "/style.css", "/script.js", "/robots.txt", "/sitemap.xml"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_sync_tag() -> String {
    "sync-form-submissions".to_string()
}

fn default_sync_endpoint() -> String {
    "/api/submissions".to_string()
}

fn default_notification_icon() -> String {
    "/assets/icon.png".to_string()
}

fn default_notification_badge() -> String {
    "/assets/badge.png".to_string()
}

fn default_notification_tag() -> String {
    "hypernet-notification".to_string()
}

fn default_title() -> String {
    "Hypernet Update".to_string()
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: default_cache_name(),
            precache: default_precache(),
            sync_tag: default_sync_tag(),
            sync_endpoint: default_sync_endpoint(),
            notification_icon: default_notification_icon(),
            notification_badge: default_notification_badge(),
            notification_tag: default_notification_tag(),
            default_title: default_title(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// SQLite file for local storage and the asset cache.
    /// Defaults to `<data dir>/hypernet/site.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> crate::Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
                .join("hypernet")
                .join("site.db")),
        }
    }
}
