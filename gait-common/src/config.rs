//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Environment variable naming the collection root folder
pub const ROOT_FOLDER_ENV: &str = "GAIT_ROOT_FOLDER";

/// Default first collection day
pub const DEFAULT_FIRST_DAY: u32 = 1;

/// Default number of collection days processed
pub const DEFAULT_DAY_COUNT: u32 = 2;

/// Default number of trials recorded per side
pub const DEFAULT_TRIALS_PER_SIDE: u32 = 5;

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// File extension for reports in this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(Error::InvalidInput(format!(
                "Unknown output format: {} (expected xlsx or csv)",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_first_day() -> u32 {
    DEFAULT_FIRST_DAY
}

fn default_day_count() -> u32 {
    DEFAULT_DAY_COUNT
}

fn default_trials_per_side() -> u32 {
    DEFAULT_TRIALS_PER_SIDE
}

/// Settings loaded from the optional TOML file
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Collection root folder
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// First collection day processed
    #[serde(default = "default_first_day")]
    pub first_day: u32,

    /// Number of consecutive collection days processed
    #[serde(default = "default_day_count")]
    pub day_count: u32,

    /// Trials recorded per side
    #[serde(default = "default_trials_per_side")]
    pub trials_per_side: u32,

    /// Folder receiving reports (defaults to the root folder)
    #[serde(default)]
    pub output_folder: Option<PathBuf>,

    /// Report file format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            first_day: DEFAULT_FIRST_DAY,
            day_count: DEFAULT_DAY_COUNT,
            trials_per_side: DEFAULT_TRIALS_PER_SIDE,
            output_folder: None,
            output_format: OutputFormat::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is tried and a missing file falls back to defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            let content = std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Read config {} failed: {}", path.display(), e))
            })?;
            info!("Configuration loaded from {}", path.display());
            return Self::from_toml_str(&content);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Read config {} failed: {}", path.display(), e))
                })?;
                info!("Configuration loaded from {}", path.display());
                Self::from_toml_str(&content)
            }
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.first_day == 0 {
            return Err(Error::Config("first_day must be >= 1".to_string()));
        }
        if self.day_count == 0 {
            return Err(Error::Config("day_count must be >= 1".to_string()));
        }
        if self.trials_per_side == 0 {
            return Err(Error::Config("trials_per_side must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// Default configuration file path for the platform
///
/// `<config_dir>/gait-analysis/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gait-analysis").join("config.toml"))
}

/// Where the resolved root folder came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    CommandLine,
    Environment,
    ConfigFile,
}

impl fmt::Display for RootSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RootSource::CommandLine => "command line",
            RootSource::Environment => "environment",
            RootSource::ConfigFile => "config file",
        };
        f.write_str(text)
    }
}

/// Root folder resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
///
/// Returns `None` when no source supplies a value; the caller decides
/// whether to prompt or abort.
pub struct RootFolderResolver {
    env_var_name: String,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::with_env_var(ROOT_FOLDER_ENV)
    }

    /// Resolver reading a custom environment variable
    pub fn with_env_var(env_var_name: &str) -> Self {
        Self {
            env_var_name: env_var_name.to_string(),
        }
    }

    pub fn resolve(
        &self,
        cli_arg: Option<&Path>,
        toml_config: &TomlConfig,
    ) -> Option<(PathBuf, RootSource)> {
        if let Some(path) = cli_arg {
            return Some((path.to_path_buf(), RootSource::CommandLine));
        }

        if let Ok(path) = std::env::var(&self.env_var_name) {
            if !path.trim().is_empty() {
                return Some((PathBuf::from(path), RootSource::Environment));
            }
        }

        toml_config
            .root_folder
            .as_ref()
            .map(|path| (path.clone(), RootSource::ConfigFile))
    }
}

impl Default for RootFolderResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a root folder: non-blank and an existing directory
pub fn validate_root_folder(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(Error::Config(
            "Root folder path must not be empty".to_string(),
        ));
    }

    if !path.is_dir() {
        return Err(Error::Config(format!(
            "Root folder not found: {}",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}
