use crate::core::rates::RatePolicy;
use crate::errors::{AppError, AppResult};
use crate::store::Backend;
use crate::utils::path::resolve_under;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub mod migrate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_json_file")]
    pub json_file: String,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub rate_policy: RatePolicy,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_database() -> String {
    Config::config_dir()
        .join("sitebook.sqlite")
        .to_string_lossy()
        .to_string()
}

fn default_json_file() -> String {
    Config::config_dir()
        .join("sitebook.json")
        .to_string_lossy()
        .to_string()
}

fn default_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "default".to_string())
}

fn default_currency() -> String {
    "Rs:".to_string()
}

fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            json_file: default_json_file(),
            backend: Backend::default(),
            user: default_user(),
            rate_policy: RatePolicy::default(),
            currency: default_currency(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("sitebook")
        } else {
            let home = env::var("HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."));
            home.join(".sitebook")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("sitebook.conf")
    }

    /// Load configuration from file, or return defaults if not found.
    /// Missing fields take their defaults.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut cfg: Config = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        // Store paths in the file may use ~ or be relative to the config dir.
        let dir = Self::config_dir();
        cfg.database = resolve_under(&dir, &cfg.database)
            .to_string_lossy()
            .to_string();
        cfg.json_file = resolve_under(&dir, &cfg.json_file)
            .to_string_lossy()
            .to_string();
        Ok(cfg)
    }

    /// File backing the active store (ignored by the memory backend).
    pub fn store_path(&self) -> &str {
        match self.backend {
            Backend::Json => &self.json_file,
            Backend::Sqlite | Backend::Memory => &self.database,
        }
    }

    /// Write the configuration file, creating the directory if needed.
    pub fn save(&self) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let path = Self::config_file();
        fs::write(&path, serde_yaml::to_string(self)?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = serde_yaml::from_str("user: mason\nbackend: json\n").unwrap();
        assert_eq!(cfg.user, "mason");
        assert_eq!(cfg.backend, Backend::Json);
        assert_eq!(cfg.rate_policy, RatePolicy::Live);
        assert_eq!(cfg.currency, "Rs:");
        assert_eq!(cfg.store_path(), cfg.json_file);
    }

    #[test]
    fn rate_policy_is_lowercase_in_yaml() {
        let cfg: Config = serde_yaml::from_str("rate_policy: snapshot\n").unwrap();
        assert_eq!(cfg.rate_policy, RatePolicy::Snapshot);
        let out = serde_yaml::to_string(&cfg).unwrap();
        assert!(out.contains("rate_policy: snapshot"));
        assert!(out.contains("backend: sqlite"));
    }
}
