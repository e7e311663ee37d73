use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_document_db_path")]
    pub document_db_path: String,

    /// Base URL of the hosted record store, e.g. `https://<project>.supabase.co`.
    pub record_store_url: Option<String>,
    /// Public (anon) key; safe to use from the terminal client.
    pub record_store_anon_key: Option<String>,
    /// Privileged key for the HTTP server only. Read from the environment, never saved.
    #[serde(default, skip_serializing)]
    pub record_store_service_key: Option<String>,

    /// Reject saves and deletes without a signed-in user.
    #[serde(default)]
    pub require_auth: bool,

    #[serde(default = "default_oauth_provider")]
    pub oauth_provider: String,
    pub oauth_redirect_url: Option<String>,

    #[serde(default = "default_bind")]
    pub bind: String,

    /// Download the blog page to summarize instead of using the sample text.
    #[serde(default = "default_fetch_content")]
    pub fetch_content: bool,
}

fn default_document_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nexium");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("content.db").to_string_lossy().to_string()
}

fn default_oauth_provider() -> String {
    "github".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_fetch_content() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_db_path: default_document_db_path(),
            record_store_url: None,
            record_store_anon_key: None,
            record_store_service_key: None,
            require_auth: false,
            oauth_provider: default_oauth_provider(),
            oauth_redirect_url: None,
            bind: default_bind(),
            fetch_content: default_fetch_content(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("document_db_path", &self.document_db_path)
            .field("record_store_url", &self.record_store_url)
            .field("record_store_anon_key", &redact(&self.record_store_anon_key))
            .field("record_store_service_key", &redact(&self.record_store_service_key))
            .field("require_auth", &self.require_auth)
            .field("oauth_provider", &self.oauth_provider)
            .field("oauth_redirect_url", &self.oauth_redirect_url)
            .field("bind", &self.bind)
            .field("fetch_content", &self.fetch_content)
            .finish()
    }
}

impl Config {
    /// Loads the config file (creating it on first run), then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Overrides fields from `NEXIUM_*` and `SUPABASE_*` variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup("NEXIUM_DOCUMENT_DB") {
            self.document_db_path = path;
        }
        if let Some(url) = lookup("SUPABASE_URL") {
            self.record_store_url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_ANON_KEY") {
            self.record_store_anon_key = Some(key);
        }
        if let Some(key) = lookup("SUPABASE_SERVICE_ROLE_KEY") {
            self.record_store_service_key = Some(key);
        }
        if let Some(flag) = lookup("NEXIUM_REQUIRE_AUTH") {
            self.require_auth = parse_flag("NEXIUM_REQUIRE_AUTH", &flag)?;
        }
        if let Some(bind) = lookup("NEXIUM_BIND") {
            self.bind = bind;
        }
        Ok(())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nexium")
            .join("config.toml")
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!("{name}: expected a boolean, got '{other}'"))),
    }
}
