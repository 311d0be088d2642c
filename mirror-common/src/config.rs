//! Bootstrap configuration and root folder resolution
//!
//! Every bootstrap value is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file never prevents startup; it is logged
//! and the compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MIRROR_ROOT_FOLDER";

/// Database file created inside the root folder
pub const DATABASE_FILE_NAME: &str = "mirror.db";

/// Default HTTP port for mirror-api
pub const DEFAULT_PORT: u16 = 5750;

/// Key-value store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Persistent `kv_store` table inside `mirror.db`
    #[default]
    Sqlite,
    /// Process-local map, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}' (expected 'sqlite' or 'memory')",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Compiled-in defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was compiled for
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            bind_address: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            storage: StorageBackend::Sqlite,
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub bind_address: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub storage: Option<StorageBackend>,

    /// TTF/OTF font used for artifact text
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    #[serde(default)]
    pub logging: TomlLogging,
}

/// `[logging]` table of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLogging {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Resolved logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration with graceful degradation
    ///
    /// An explicitly requested file must exist and parse. Without one, the
    /// platform config locations are probed and any failure falls back to
    /// an empty configuration.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            info!("Loaded configuration from {}", path.display());
            return Ok(config);
        }

        match default_config_path() {
            Some(path) => match Self::load(&path) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    Ok(config)
                }
                Err(e) => {
                    warn!("{} - using compiled defaults", e);
                    Ok(Self::default())
                }
            },
            None => {
                info!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Locate the platform config file, if one exists
///
/// Linux: `~/.config/mirror/config.toml`, then `/etc/mirror/config.toml`.
/// Other platforms: the user config directory only.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mirror").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/mirror/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/mirror (or /var/lib/mirror for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("mirror"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/mirror"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("mirror"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/mirror"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("mirror"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\mirror"))
    } else {
        PathBuf::from("./mirror_data")
    }
}

/// Resolves the root folder from CLI, environment, TOML and defaults
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_value = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        // Priority 4: OS-dependent compiled default
        default_root_folder()
    }
}

/// Creates the root folder and derives paths inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

/// Values given on the command line (or through clap-managed env vars)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub storage: Option<StorageBackend>,
    pub font_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved bootstrap configuration
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub font_path: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl BootstrapConfig {
    /// Merge CLI overrides, TOML values and compiled defaults
    pub fn resolve(cli: CliOverrides, toml: TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();

        let root_folder = RootFolderResolver::new()
            .with_cli_arg(cli.root_folder)
            .with_toml(&toml)
            .resolve();

        Self {
            root_folder,
            bind_address: cli
                .bind_address
                .or(toml.bind_address)
                .unwrap_or(defaults.bind_address),
            port: cli.port.or(toml.port).unwrap_or(defaults.port),
            storage: cli.storage.or(toml.storage).unwrap_or(defaults.storage),
            font_path: cli.font_path.or(toml.font_path),
            logging: LoggingConfig {
                level: cli
                    .log_level
                    .or(toml.logging.level)
                    .unwrap_or(defaults.log_level),
                file: toml.logging.file.or(defaults.log_file),
            },
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}
