use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "STOREFRONT_BASE_URL";

/// Storefront settings.
///
/// Read from `<config dir>/furniture-storefront/config.json` when present.
/// Missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog server root, without the `/api` prefix
    pub base_url: String,
    /// Category every listing query is scoped to
    pub category: String,
    pub request_timeout_secs: u64,
    /// Local image shown when a product or variant has no image
    pub placeholder_image: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            category: "Dining Table".to_string(),
            request_timeout_secs: 30,
            placeholder_image: PathBuf::from("assets/placeholder.png"),
        }
    }
}

impl Config {
    /// Load the user's config, falling back to defaults on any problem,
    /// then apply environment overrides.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("⚠️  {e}, using default settings");
                Self::default()
            }),
            _ => Self::default(),
        };

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.apply_base_url_override(&base_url);
        }

        config.ensure_valid_base_url();
        config
    }

    /// Read a config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Where the config file lives on this platform
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("furniture-storefront").join("config.json"))
    }

    fn apply_base_url_override(&mut self, base_url: &str) {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return;
        }
        log::info!("Using catalog at {base_url} from {BASE_URL_ENV}");
        self.base_url = base_url.to_string();
    }

    /// Replace a `base_url` that cannot be used as an HTTP root with the
    /// default one, so a typo never keeps the app from starting
    pub fn ensure_valid_base_url(&mut self) {
        let api = format!("{}/api/", self.base_url.trim_end_matches('/'));
        match url::Url::parse(&api) {
            Ok(url) if !url.cannot_be_a_base() => {}
            Ok(_) => self.fall_back_base_url("not a hierarchical URL"),
            Err(e) => self.fall_back_base_url(&e.to_string()),
        }
    }

    fn fall_back_base_url(&mut self, reason: &str) {
        let default = Self::default().base_url;
        log::warn!(
            "⚠️  Invalid catalog base_url {:?} ({}), using {}",
            self.base_url,
            reason,
            default
        );
        self.base_url = default;
    }

    /// Uploads folder that image ids are relative to
    pub fn uploads_url(&self) -> String {
        format!("{}/uploads/", self.base_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "base_url": "https://shop.example.com/" }}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.base_url, "https://shop.example.com/");
        assert_eq!(config.category, "Dining Table");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.uploads_url(), "https://shop.example.com/uploads/");
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_base_url_falls_back_to_default() {
        let mut config = Config::default();
        config.apply_base_url_override("foo");
        config.ensure_valid_base_url();
        assert_eq!(config.base_url, "http://localhost:3000");

        config.base_url = "mailto:shop@example.com".to_string();
        config.ensure_valid_base_url();
        assert_eq!(config.base_url, "http://localhost:3000");

        config.base_url = "https://shop.example.com/".to_string();
        config.ensure_valid_base_url();
        assert_eq!(config.base_url, "https://shop.example.com/");
    }

    #[test]
    fn test_base_url_override() {
        let mut config = Config::default();
        config.apply_base_url_override("   ");
        assert_eq!(config.base_url, "http://localhost:3000");

        config.apply_base_url_override("https://api.example.com");
        assert_eq!(config.base_url, "https://api.example.com");
    }
}
