//! Configuration file handling.
//!
//! The configuration file is stored at `$REWARDS_HOME/config.json`. It selects the customer store,
//! the address the HTTP service binds to, and the default reward windows.

use crate::directory::{CustomerDirectory, InMemoryDirectory, SqliteDirectory, StoreKind};
use crate::rewards::DateWindow;
use crate::service::RewardService;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const APP_NAME: &str = "rewards";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const REWARDS_SQLITE: &str = "rewards.sqlite";
pub(crate) const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_YEAR: i32 = 2025;
const DEFAULT_TRAILING_MONTHS: u32 = 3;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$REWARDS_HOME` and from there it loads `$REWARDS_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the data directory and:
    /// - Writes an initial `config.json` using `store` and `bind_address` along with default
    ///   settings
    /// - Creates an empty SQLite database when `store` is [`StoreKind::Sqlite`]
    ///
    /// # Errors
    /// - Returns an error if a `config.json` already exists or any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        store: StoreKind,
        bind_address: Option<&str>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the rewards home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("A config file already exists at '{}'", config_path.display());
        }

        let config_file = ConfigFile {
            store,
            bind_address: bind_address.unwrap_or(DEFAULT_BIND_ADDRESS).to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        let sqlite_path = root.join(REWARDS_SQLITE);
        if store == StoreKind::Sqlite {
            SqliteDirectory::init(&sqlite_path)
                .await
                .context("Unable to create SQLite DB")?;
        }

        Ok(Self {
            root,
            config_path,
            config_file,
            sqlite_path,
        })
    }

    /// Validates that `rewards_home` and its config file exist, then loads the config file.
    pub async fn load(rewards_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = rewards_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Rewards home is missing, run 'rewards init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'rewards init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;
        debug!("Loaded config from {}", config_path.display());

        Ok(Self {
            sqlite_path: root.join(REWARDS_SQLITE),
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

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn store(&self) -> StoreKind {
        self.config_file.store
    }

    pub fn bind_address(&self) -> &str {
        &self.config_file.bind_address
    }

    /// The number of months covered by a request that names neither a start nor an end date.
    pub fn trailing_months(&self) -> u32 {
        self.config_file.trailing_months
    }

    /// The calendar-year window used by lookups that take no window.
    pub fn default_window(&self) -> Result<DateWindow> {
        DateWindow::calendar_year(self.config_file.default_year)
            .context("Invalid default_year in config file")
    }

    /// Opens the configured customer directory.
    pub async fn directory(&self) -> Result<Arc<dyn CustomerDirectory>> {
        let directory: Arc<dyn CustomerDirectory> = match self.store() {
            StoreKind::Memory => Arc::new(InMemoryDirectory::sample()?),
            StoreKind::Sqlite => Arc::new(self.sqlite_directory().await?),
        };
        Ok(directory)
    }

    /// Opens the SQLite directory.
    ///
    /// # Errors
    /// - The configured store is not SQLite.
    pub async fn sqlite_directory(&self) -> Result<SqliteDirectory> {
        if self.store() != StoreKind::Sqlite {
            bail!(
                "The configured store is '{}', the SQLite store is required",
                self.store()
            );
        }
        SqliteDirectory::load(&self.sqlite_path)
            .await
            .context("Unable to load SQLite DB")
    }

    /// Builds the reward service over the configured directory.
    pub async fn service(&self) -> Result<RewardService> {
        Ok(RewardService::new(
            self.directory().await?,
            self.default_window()?,
        ))
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "rewards",
///   "config_version": 1,
///   "store": "sqlite",
///   "bind_address": "127.0.0.1:8080",
///   "default_year": 2025,
///   "trailing_months": 3
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "rewards"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Where customers and their transactions are read from
    #[serde(default)]
    store: StoreKind,

    /// The socket address the HTTP service listens on
    #[serde(default = "default_bind_address")]
    bind_address: String,

    /// The calendar year summarized when no window is requested
    #[serde(default = "default_year")]
    default_year: i32,

    /// How far back a request without dates reaches from today
    #[serde(default = "default_trailing_months")]
    trailing_months: u32,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_year() -> i32 {
    DEFAULT_YEAR
}

fn default_trailing_months() -> u32 {
    DEFAULT_TRAILING_MONTHS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            store: StoreKind::default(),
            bind_address: default_bind_address(),
            default_year: DEFAULT_YEAR,
            trailing_months: DEFAULT_TRAILING_MONTHS,
        }
    }
}

impl ConfigFile {
    /// Loads and validates the config file at `path`.
    async fn load(path: &Path) -> Result<Self> {
        let content = utils::read(path).await?;
        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );
        Ok(config)
    }

    async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}
