//! Process configuration.
//!
//! Values are looked up by their environment variable name. A TOML file may
//! supply the same settings under the lowercase key (`target_roles = [...]`);
//! environment variables always win over the file. Empty values count as unset.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_SCRAPER_API_URL: &str = "http://api.scraperapi.com";
pub const DEFAULT_TARGET_ROLES: &str = "localization project manager";
pub const DEFAULT_TARGET_LOCATIONS: &str = "remote";
pub const DEFAULT_MIN_FIT_SCORE: u8 = 75;
/// 09:00 every day (seconds-first cron syntax).
pub const DEFAULT_SCHEDULE_CRON: &str = "0 0 9 * * *";
pub const DEFAULT_SCHEDULE_TIMEZONE: &str = "Asia/Kolkata";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One pipeline pass, then exit.
    Once,
    /// One pass at startup, then daily on the configured schedule.
    Scheduled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Postgrest { url: String, anon_key: String },
    Sqlite { url: String },
}

impl StorageConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StorageConfig::Postgrest { .. } => "supabase",
            StorageConfig::Sqlite { .. } => "sqlite",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scraper_api_key: String,
    pub scraper_api_url: String,
    pub storage: StorageConfig,
    pub target_roles: Vec<String>,
    pub target_locations: Vec<String>,
    pub min_fit_score: u8,
    pub run_mode: RunMode,
    pub schedule_cron: String,
    pub schedule_timezone: String,
}

impl AppConfig {
    pub fn load(source: &ConfigSource) -> Result<Self, ConfigError> {
        let scraper_api_key = source
            .get("SCRAPER_API_KEY")
            .ok_or_else(|| ConfigError::MissingField {
                field: "SCRAPER_API_KEY".to_string(),
            })?;

        let storage = storage_config(source).ok_or(ConfigError::MissingStorage)?;

        Ok(Self {
            scraper_api_key,
            scraper_api_url: source
                .get("SCRAPER_API_URL")
                .unwrap_or_else(|| DEFAULT_SCRAPER_API_URL.to_string()),
            storage,
            target_roles: target_roles(source),
            target_locations: target_locations(source),
            min_fit_score: min_fit_score(source),
            run_mode: run_mode(source),
            schedule_cron: source
                .get("SCHEDULE_CRON")
                .unwrap_or_else(|| DEFAULT_SCHEDULE_CRON.to_string()),
            schedule_timezone: source
                .get("SCHEDULE_TZ")
                .unwrap_or_else(|| DEFAULT_SCHEDULE_TIMEZONE.to_string()),
        })
    }

    pub fn with_run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }

    /// Location stamped on every parsed listing.
    pub fn primary_location(&self) -> &str {
        self.target_locations
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_TARGET_LOCATIONS)
    }
}

/// Presence check of the settings a run needs, without failing on missing ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub scraper_key_loaded: bool,
    pub storage_backend: Option<&'static str>,
    pub target_roles: Vec<String>,
    pub target_locations: Vec<String>,
}

impl SetupReport {
    pub fn inspect(source: &ConfigSource) -> Self {
        Self {
            scraper_key_loaded: source.get("SCRAPER_API_KEY").is_some(),
            storage_backend: storage_config(source).map(|s| s.backend_name()),
            target_roles: target_roles(source),
            target_locations: target_locations(source),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.scraper_key_loaded && self.storage_backend.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    read_env: bool,
    values: HashMap<String, String>,
}

impl ConfigSource {
    pub fn env() -> Self {
        Self {
            read_env: true,
            values: HashMap::new(),
        }
    }

    /// Environment variables layered over the settings of a TOML file.
    pub fn env_with_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut source = Self::from_toml_str(&text)?;
        source.read_env = true;
        Ok(source)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = text.parse()?;
        let values = table
            .into_iter()
            .filter_map(|(key, value)| toml_value_to_string(value).map(|v| (key.to_uppercase(), v)))
            .collect();

        Ok(Self {
            read_env: false,
            values,
        })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            read_env: false,
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let from_env = if self.read_env {
            std::env::var(key).ok()
        } else {
            None
        };

        from_env
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.values.get(key).cloned())
            .filter(|v| !v.trim().is_empty())
    }
}

fn toml_value_to_string(value: toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(toml_value_to_string).collect();
            Some(parts.join(","))
        }
        _ => None,
    }
}

fn storage_config(source: &ConfigSource) -> Option<StorageConfig> {
    let supabase_url = source.get("SUPABASE_URL");
    let supabase_key = source.get("SUPABASE_ANON_KEY");
    if let (Some(url), Some(anon_key)) = (supabase_url, supabase_key) {
        return Some(StorageConfig::Postgrest { url, anon_key });
    }
    source
        .get("DATABASE_URL")
        .map(|url| StorageConfig::Sqlite { url })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn list_or_default(source: &ConfigSource, key: &str, default: &str) -> Vec<String> {
    let items = source.get(key).map(|raw| split_list(&raw)).unwrap_or_default();
    if items.is_empty() {
        split_list(default)
    } else {
        items
    }
}

fn target_roles(source: &ConfigSource) -> Vec<String> {
    list_or_default(source, "TARGET_ROLES", DEFAULT_TARGET_ROLES)
}

fn target_locations(source: &ConfigSource) -> Vec<String> {
    list_or_default(source, "TARGET_LOCATIONS", DEFAULT_TARGET_LOCATIONS)
}

/// Reads the leading integer of `MIN_FIT_SCORE`, so "80.5" and "80abc" mean 80.
/// Anything without leading digits, or above 100, falls back to the default.
fn min_fit_score(source: &ConfigSource) -> u8 {
    let Some(raw) = source.get("MIN_FIT_SCORE") else {
        return DEFAULT_MIN_FIT_SCORE;
    };

    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u32>() {
        Ok(score) if score <= 100 => score as u8,
        _ => {
            warn!(
                "Invalid MIN_FIT_SCORE '{}', using default {}",
                raw, DEFAULT_MIN_FIT_SCORE
            );
            DEFAULT_MIN_FIT_SCORE
        }
    }
}

fn run_mode(source: &ConfigSource) -> RunMode {
    let environment = source.get("JOBSCOUT_ENV").or_else(|| source.get("NODE_ENV"));
    match environment.as_deref() {
        Some("production") => RunMode::Scheduled,
        _ => RunMode::Once,
    }
}
