//! Configuration file handling.
//!
//! The configuration file is stored at `$GOFINANCES_HOME/config.json` and holds the storage
//! namespace, the location of the storage file, and the currency and language used when rendering
//! the dashboard.

use crate::error::{ErrorType, IntoResult};
use crate::format::{offset_from_minutes, CurrencyFormat, Language, Locale, Messages};
use crate::store::{FileStore, TransactionStore, DEFAULT_NAMESPACE};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_NAME: &str = "gofinances";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORAGE_JSON: &str = "storage.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$GOFINANCES_HOME` and from there it loads `$GOFINANCES_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, if needed, and writes an initial `config.json` with default
    /// settings.
    ///
    /// # Errors
    /// - Returns an error if `config.json` already exists or if any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the gofinances home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if utils::exists(&config_path).await? {
            bail!("A config file already exists at '{}'", config_path.display())
        }

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The gofinances home directory is missing, run 'gofinances init'")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn namespace(&self) -> &str {
        &self.config_file.namespace
    }

    /// Returns the stored `storage_file` if it is absolute, otherwise resolves it against the home
    /// directory.
    pub fn storage_path(&self) -> PathBuf {
        let p = &self.config_file.storage_file;
        if p.is_absolute() {
            return p.clone();
        }
        self.root.join(p)
    }

    /// Builds the locale described by the currency, language and offset settings.
    pub fn locale(&self) -> Result<Locale> {
        self.config_file.locale()
    }

    /// Opens the transaction store backed by the configured storage file.
    pub fn store(&self) -> TransactionStore {
        TransactionStore::new(
            Arc::new(FileStore::new(self.storage_path())),
            self.namespace(),
        )
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "gofinances",
///   "config_version": 1,
///   "namespace": "@gofinances",
///   "storage_file": "storage.json",
///   "currency": {
///     "symbol": "R$",
///     "grouping_separator": ",",
///     "decimal_separator": "."
///   },
///   "language": "en",
///   "utc_offset_minutes": 0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "gofinances"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Prefix of every storage key
    #[serde(default = "default_namespace")]
    namespace: String,

    /// Path to the storage file, relative to the home directory or absolute
    #[serde(default = "default_storage_file")]
    storage_file: PathBuf,

    /// How currency amounts are rendered
    #[serde(default)]
    currency: CurrencyFormat,

    /// Language of the dashboard messages
    #[serde(default)]
    language: Language,

    /// Offset from UTC, in minutes, at which dates are shown
    #[serde(default)]
    utc_offset_minutes: i32,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            namespace: default_namespace(),
            storage_file: default_storage_file(),
            currency: CurrencyFormat::default(),
            language: Language::default(),
            utc_offset_minutes: 0,
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_storage_file() -> PathBuf {
    PathBuf::from(STORAGE_JSON)
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if its settings are invalid
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file version {} is newer than this program supports ({})",
            config.config_version,
            CONFIG_VERSION
        );
        anyhow::ensure!(
            !config.namespace.trim().is_empty(),
            "The namespace in the config file cannot be empty"
        );
        let _ = config
            .locale()
            .with_context(|| format!("Invalid settings in config file {}", path.display()))?;

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn locale(&self) -> Result<Locale> {
        self.currency.validate().pub_result(ErrorType::Config)?;
        let offset = offset_from_minutes(self.utc_offset_minutes)
            .with_context(|| {
                format!(
                    "utc_offset_minutes must be less than a day, got {}",
                    self.utc_offset_minutes
                )
            })
            .pub_result(ErrorType::Config)?;
        Ok(Locale::new(
            self.currency.clone(),
            Messages::new(self.language, offset),
        ))
    }
}
