//! Keep an existing config file in step with the fields the program knows.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Every top-level key a complete config file carries.
pub const KNOWN_FIELDS: &[&str] = &[
    "database",
    "json_file",
    "backend",
    "user",
    "rate_policy",
    "currency",
    "separator_char",
];

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(&content)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
    }
}

/// Known fields absent from the file at `path`.
pub fn missing_fields(path: &Path) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(path)?;
    Ok(KNOWN_FIELDS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String((*k).to_string())))
        .collect())
}

/// Add the missing fields with their default values. Existing values and
/// unknown keys are left untouched. Returns the fields that were added.
pub fn migrate_config(path: &Path) -> AppResult<Vec<&'static str>> {
    let mut map = read_mapping(path)?;
    let defaults = match serde_yaml::to_value(Config::default())? {
        Value::Mapping(m) => m,
        _ => Mapping::new(),
    };

    let mut added = Vec::new();
    for field in KNOWN_FIELDS {
        let key = Value::String((*field).to_string());
        if map.contains_key(&key) {
            continue;
        }
        if let Some(v) = defaults.get(&key) {
            map.insert(key, v.clone());
            added.push(*field);
        }
    }

    if !added.is_empty() {
        fs::write(path, serde_yaml::to_string(&Value::Mapping(map))?)?;
        tracing::info!(fields = ?added, path = %path.display(), "config migrated");
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_conf(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("sitebook-conf-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sitebook.conf");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reports_and_fills_missing_fields() {
        let path = temp_conf("fill", "user: mason\ncurrency: 'EUR'\n");

        let missing = missing_fields(&path).unwrap();
        assert!(missing.contains(&"backend"));
        assert!(!missing.contains(&"user"));

        let added = migrate_config(&path).unwrap();
        assert_eq!(added, missing);
        assert!(missing_fields(&path).unwrap().is_empty());

        let cfg: Config = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cfg.user, "mason");
        assert_eq!(cfg.currency, "EUR");
    }

    #[test]
    fn complete_file_is_left_alone() {
        let full = serde_yaml::to_string(&Config::default()).unwrap();
        let path = temp_conf("full", &full);
        assert!(migrate_config(&path).unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), full);
    }
}
