// Configuration management for Portico

pub mod env;
pub mod error;
pub mod loader;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared key-value configuration source.
///
/// Values are kept as JSON so that strings from the environment and typed
/// values from TOML/JSON files can live side by side.
#[derive(Clone, Default)]
pub struct ConfigManager {
    config: Arc<RwLock<HashMap<String, Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with environment variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config: Arc::default(),
            env_prefix: Some(prefix.into()),
        }
    }

    /// Load configuration from environment variables
    pub fn load_env(&self) -> Result<()> {
        let env_vars = EnvLoader::new(self.env_prefix.clone()).load()?;

        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in env_vars {
            config.insert(key, Value::String(value));
        }

        Ok(())
    }

    /// Load a `.env` file into the process environment, then the environment.
    pub fn load_dotenv(&self, path: Option<&str>) -> Result<()> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        } else {
            dotenvy::dotenv().ok();
        }
        self.load_env()
    }

    /// Merge the top-level keys of a configuration file.
    pub fn load_file(&self, path: impl AsRef<Path>, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).load_file(path)?;
        self.merge_value(data);
        Ok(())
    }

    /// Merge the top-level keys of an in-memory document.
    pub fn load_str(&self, content: &str, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).parse(content)?;
        self.merge_value(data);
        Ok(())
    }

    fn merge_value(&self, data: Value) {
        if let Value::Object(map) = data {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            config.extend(map);
        }
    }

    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.insert(key.to_string(), json_value);

        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .get_value(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value).map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Raw value for a key.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        config.get(key).cloned()
    }

    /// Raw value of the first key present among `keys`.
    ///
    /// Lets one setting be spelled `sessionTimeout` in a file and arrive as
    /// `sessiontimeout` from the environment.
    pub fn get_value_any(&self, keys: &[&str]) -> Option<Value> {
        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        keys.iter().find_map(|key| config.get(*key).cloned())
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        config.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let config = self.config.read().unwrap_or_else(PoisonError::into_inner);
        config.keys().cloned().collect()
    }

    /// Copy every entry of `other` over this manager's entries.
    pub fn merge(&self, other: &ConfigManager) {
        if Arc::ptr_eq(&self.config, &other.config) {
            return;
        }
        let entries: Vec<(String, Value)> = {
            let other_config = other.config.read().unwrap_or_else(PoisonError::into_inner);
            other_config
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.extend(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let manager = ConfigManager::new();
        manager.set("sessionTimeout", "600").unwrap();

        let value: String = manager.get("sessionTimeout").unwrap();
        assert_eq!(value, "600");
    }

    #[test]
    fn test_missing_key() {
        let manager = ConfigManager::new();
        assert!(matches!(
            manager.get_string("missing"),
            Err(ConfigError::KeyNotFound(_))
        ));
        assert_eq!(manager.get_or("missing", 1800i64), 1800);
    }

    #[test]
    fn test_wrong_type_is_deserialization_error() {
        let manager = ConfigManager::new();
        manager.set("sessionTimeout", "abc").unwrap();

        assert!(matches!(
            manager.get_int("sessionTimeout"),
            Err(ConfigError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_get_value_any_prefers_first_key() {
        let manager = ConfigManager::new();
        manager.set("sessiontimeout", "10").unwrap();
        manager.set("sessionTimeout", "20").unwrap();

        assert_eq!(
            manager.get_value_any(&["sessionTimeout", "sessiontimeout"]),
            Some(Value::String("20".into()))
        );
        assert_eq!(
            manager.get_value_any(&["session_timeout", "sessiontimeout"]),
            Some(Value::String("10".into()))
        );
        assert_eq!(manager.get_value_any(&["nope"]), None);
    }

    #[test]
    fn test_load_str_merges_top_level_keys() {
        let manager = ConfigManager::new();
        manager.set("sessionCookie", "OLD").unwrap();
        manager
            .load_str("sessionCookie = \"NEW\"\nsessionTimeout = 60\n", FileFormat::Toml)
            .unwrap();

        assert_eq!(manager.get_string("sessionCookie").unwrap(), "NEW");
        assert_eq!(manager.get_int("sessionTimeout").unwrap(), 60);
        assert!(manager.has("sessionTimeout"));
    }

    #[test]
    fn test_merge() {
        let base = ConfigManager::new();
        let overrides = ConfigManager::new();
        base.set("a", 1).unwrap();
        overrides.set("a", 2).unwrap();
        overrides.set("b", true).unwrap();

        base.merge(&overrides);
        base.merge(&base.clone());

        assert_eq!(base.get_int("a").unwrap(), 2);
        assert!(base.get_bool("b").unwrap());
        assert_eq!(base.keys().len(), 2);
    }
}
