use std::time::Duration;

use common::config::StorageAppConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Generative-model provider settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// API key. Required unless `mock_mode` is set.
    #[serde(default)]
    pub api_key: String,
    /// Default: the public Gemini v1beta endpoint.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Default: "gemini-3-pro-image-preview".
    #[serde(default = "default_model")]
    pub model: String,
    /// Default: "1:1".
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    /// Default: 120.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Answer every request with a placeholder image instead of calling out.
    #[serde(default)]
    pub mock_mode: bool,
}

fn default_api_base() -> String {
    provider::gemini::DEFAULT_API_BASE.into()
}
fn default_model() -> String {
    "gemini-3-pro-image-preview".into()
}
fn default_aspect_ratio() -> String {
    "1:1".into()
}
fn default_request_timeout_secs() -> u64 {
    120
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            aspect_ratio: default_aspect_ratio(),
            request_timeout_secs: default_request_timeout_secs(),
            mock_mode: false,
        }
    }
}

/// Catalog listing and display settings.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Default page size. Default: 8.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Signed URL validity. Default: 3600 (1 hour).
    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,
    /// Path prefix used when a signed URL is unavailable. Default: "/download/".
    #[serde(default = "default_download_path_prefix")]
    pub download_path_prefix: String,
}

fn default_page_size() -> u64 {
    8
}
fn default_signed_url_ttl_secs() -> u64 {
    common::config::DEFAULT_SIGNED_URL_TTL.as_secs()
}
fn default_download_path_prefix() -> String {
    "/download/".into()
}

impl CatalogConfig {
    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            signed_url_ttl_secs: default_signed_url_ttl_secs(),
            download_path_prefix: default_download_path_prefix(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageAppConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load with an explicit config file path, falling back to
    /// `GALLERY_CONFIG` and then `config/config`.
    pub fn load_from(path: Option<&str>) -> Result<Self, ConfigError> {
        let config_path = path
            .map(str::to_string)
            .or_else(|| std::env::var("GALLERY_CONFIG").ok())
            .unwrap_or_else(|| "config/config".to_string());

        let s = Config::builder()
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.base_path", "./data/blobs")?
            .set_default("provider.model", default_model())?
            .set_default("provider.mock_mode", false)?
            .set_default("catalog.page_size", default_page_size())?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., GALLERY__PROVIDER__API_KEY)
            .add_source(Environment::with_prefix("GALLERY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
