use std::{
    env, fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    domain::DEFAULT_CATEGORIES,
    errors::{DashboardError, Result},
};

const APP_DIR: &str = "semester-dashboard";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Environment variable that overrides [`Config::api_base_url`].
pub const API_URL_ENV: &str = "SEMESTER_API_URL";

/// Colour scheme for the presentation layer. Never consulted by the session logic.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "Config::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "Config::default_categories")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            categories: Self::default_categories(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    fn default_api_base_url() -> String {
        "http://localhost:5000".into()
    }

    fn default_request_timeout_secs() -> u64 {
        10
    }

    fn default_categories() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect()
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(API_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.api_base_url = trimmed.to_string();
            }
        }
    }
}

/// Loads and saves [`Config`] as JSON on disk.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `<config_dir>/semester-dashboard/config.json` for the current user.
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| DashboardError::Config("unable to locate a config directory".into()))?;
        Self::with_base_dir(base.join(APP_DIR))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| {
                DashboardError::Config(format!("{}: {err}", self.path.display()))
            })
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| DashboardError::Config(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().join("cfg")).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.categories, vec!["Dues", "Event", "Uncategorized"]);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            api_base_url: "http://budget.internal:8080".into(),
            request_timeout_secs: 3,
            categories: vec!["Rent".into(), "Uncategorized".into()],
            theme: Theme::Dark,
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"theme":"dark"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn corrupt_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{not json").unwrap();
        assert_eq!(manager.load().unwrap_err().kind(), ErrorKind::Config);
    }
}
