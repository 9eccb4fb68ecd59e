use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CatalogError;

pub const DEFAULT_BASE_URL: &str = "https://0kadddxyh3.execute-api.us-east-1.amazonaws.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for reaching the Catalog API and writing logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: None,
        }
    }
}

impl Config {
    /// Load from `path`, or from the platform config dir when `path` is `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(CatalogError::Config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                p.to_path_buf()
            }
            None => match Self::config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let text = std::fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        self
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.timeout_secs == 0 {
            return Err(CatalogError::Config("timeout_secs must be at least 1".to_string()));
        }
        self.base_url()?;
        Ok(())
    }

    /// Base URL with a trailing slash so endpoint paths join beneath it.
    pub fn base_url(&self) -> Result<reqwest::Url, CatalogError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        reqwest::Url::parse(&raw)
            .map_err(|e| CatalogError::Config(format!("invalid base_url {:?}: {}", self.base_url, e)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Log destination for the interactive browser.
    pub fn log_path(&self) -> PathBuf {
        if let Some(ref p) = self.log_file {
            return p.clone();
        }
        project_dirs()
            .map(|d| d.cache_dir().join("movie-catalog-browser.log"))
            .unwrap_or_else(|| std::env::temp_dir().join("movie-catalog-browser.log"))
    }

    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|d| d.config_dir().join("config.json"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "moviedb", "movie-catalog-browser")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.base_url().unwrap().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout_secs": 3}}"#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout_secs": 0}}"#).unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = Config::default().with_overrides(Some("http://localhost:8080/api".into()), None);
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(None, Some(30));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
