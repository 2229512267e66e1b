// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Configuration loading with figment.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `advanced-form.toml` in the working directory (optional)
//! 3. Environment variables prefixed with `ADVANCED_FORM_`
//!
//! The storage URL and access key have no defaults; startup fails without them.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::logic::storage::StorageSettings;
use crate::logging::Verbosity;

const CONFIG_FILE_NAME: &str = "advanced-form.toml";
const ENV_PREFIX: &str = "ADVANCED_FORM_";

/// Bucket avatars are uploaded to.
pub const DEFAULT_BUCKET: &str = "advanced-form";
pub const DEFAULT_CACHE_CONTROL_SECS: u32 = 3600;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the storage service, e.g. `https://xyz.supabase.co`.
    pub storage_url: Option<String>,
    /// Access key sent with every upload. Never logged.
    pub storage_key: Option<String>,
    pub bucket: String,
    /// `Cache-Control` max-age applied to uploaded objects.
    pub cache_control_secs: u32,
    /// Replace existing objects with the same name instead of failing.
    pub upsert: bool,
    /// Request timeout for the upload.
    pub timeout_secs: u64,
    pub log_level: Verbosity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_url: None,
            storage_key: None,
            bucket: DEFAULT_BUCKET.to_string(),
            cache_control_secs: DEFAULT_CACHE_CONTROL_SECS,
            upsert: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: Verbosity::Normal,
        }
    }
}

// Hand-written so the access key never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("storage_url", &self.storage_url)
            .field("storage_key", &self.storage_key.as_ref().map(|_| "<redacted>"))
            .field("bucket", &self.bucket)
            .field("cache_control_secs", &self.cache_control_secs)
            .field("upsert", &self.upsert)
            .field("timeout_secs", &self.timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load from defaults, the config file in the working directory and the environment.
    ///
    /// # Errors
    ///
    /// Fails when a source cannot be parsed or the result does not validate.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Like [`Config::load`] but with an explicit config file path.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX));

        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check required settings and value ranges.
    pub fn validate(&self) -> Result<()> {
        self.storage_settings().map(|_| ())
    }

    /// Build the settings the storage client needs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSetting`] when the URL or key is absent or blank,
    /// and [`Error::ConfigValidation`] for malformed values.
    pub fn storage_settings(&self) -> Result<StorageSettings> {
        let raw_url = required(
            self.storage_url.as_deref(),
            "storage_url",
            "ADVANCED_FORM_STORAGE_URL",
        )?;
        let access_key = required(
            self.storage_key.as_deref(),
            "storage_key",
            "ADVANCED_FORM_STORAGE_KEY",
        )?;

        let base_url = Url::parse(raw_url).map_err(|err| Error::ConfigValidation {
            message: format!("storage_url is not a valid URL: {err}"),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.host_str().is_none() {
            return Err(Error::ConfigValidation {
                message: format!("storage_url must be an http(s) URL, got {raw_url}"),
            });
        }

        if self.bucket.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "bucket must not be empty".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }

        Ok(StorageSettings {
            base_url,
            access_key: access_key.to_string(),
            bucket: self.bucket.trim().to_string(),
            cache_control_secs: self.cache_control_secs,
            upsert: self.upsert,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn required<'a>(
    value: Option<&'a str>,
    setting: &'static str,
    env: &'static str,
) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingSetting { setting, env })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn from_toml(toml: &str) -> Result<Config> {
        Config::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::string(toml)),
        )
    }

    #[test]
    fn defaults_match_upload_policy() {
        let config = Config::default();
        assert_eq!(config.bucket, "advanced-form");
        assert_eq!(config.cache_control_secs, 3600);
        assert!(!config.upsert);
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = from_toml(r#"storage_url = "https://example.supabase.co""#).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingSetting {
                setting: "storage_key",
                ..
            }
        ));
    }

    #[test]
    fn blank_url_counts_as_missing() {
        let err = from_toml("storage_url = \"  \"\nstorage_key = \"k\"").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingSetting {
                setting: "storage_url",
                ..
            }
        ));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = from_toml("storage_url = \"ftp://example.com\"\nstorage_key = \"k\"").unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = from_toml(
            "storage_url = \"https://example.com\"\nstorage_key = \"k\"\ntimeout_secs = 0",
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn load_from_file_builds_storage_settings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("advanced-form.toml");
        fs::write(
            &path,
            "storage_url = \"https://example.supabase.co\"\nstorage_key = \"anon\"\nbucket = \"avatars\"\nlog_level = \"verbose\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).expect("config should load");
        let settings = config.storage_settings().unwrap();

        assert_eq!(settings.bucket, "avatars");
        assert_eq!(settings.access_key, "anon");
        assert_eq!(settings.base_url.host_str(), Some("example.supabase.co"));
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(config.log_level, Verbosity::Verbose);
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = Config {
            storage_key: Some("super-secret".into()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
