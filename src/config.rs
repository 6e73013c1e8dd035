//! Configuration for trust-ledger.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (TRUST_LEDGER_HOME, TRUST_LEDGER_PARSE_MODE)
//! 2. Config file (.trust-ledger/config.yaml)
//! 3. Defaults (~/.trust-ledger, permissive parsing)
//!
//! Config file discovery:
//! - Searches current directory and parents for .trust-ledger/config.yaml
//! - `paths.home` is relative to the .trust-ledger/ directory
//! - `paths.exports` is relative to the project root (parent of .trust-ledger/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{Ledger, ParseMode};

const CONFIG_DIR: &str = ".trust-ledger";
const CONFIG_FILE: &str = "config.yaml";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub ledger: Option<LedgerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .trust-ledger/)
    pub home: Option<String>,
    /// Where evidence and ledger exports are written (relative to project root)
    pub exports: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    pub parse_mode: Option<ParseMode>,
    pub file_name: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Export directory for evidence and ledger files
    pub exports: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Ledger settings
    pub ledger: LedgerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSettings {
    pub parse_mode: ParseMode,
    pub file_name: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::Permissive,
            file_name: Ledger::EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Default ledger export path
    pub fn ledger_path(&self) -> PathBuf {
        self.exports.join(&self.ledger.file_name)
    }
}

/// Values read from the environment
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    home: Option<PathBuf>,
    parse_mode: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            home: std::env::var("TRUST_LEDGER_HOME").ok().map(PathBuf::from),
            parse_mode: std::env::var("TRUST_LEDGER_PARSE_MODE").ok(),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge file, environment and defaults into a resolved config
fn resolve(
    file: Option<(&Path, &ConfigFile)>,
    env: &EnvOverrides,
    default_home: PathBuf,
) -> Result<ResolvedConfig> {
    let (home, exports, mut ledger) = match file {
        Some((config_path, config)) => {
            let config_dir = config_path.parent().unwrap_or(Path::new("."));
            let project_root = config_dir.parent().unwrap_or(Path::new("."));

            let home = match (&env.home, &config.paths.home) {
                (Some(env_home), _) => env_home.clone(),
                (None, Some(home_path)) => resolve_path(config_dir, home_path),
                (None, None) => default_home,
            };

            let exports = config
                .paths
                .exports
                .as_deref()
                .map(|p| resolve_path(project_root, p))
                .unwrap_or_else(|| home.join("exports"));

            let defaults = LedgerSettings::default();
            let ledger = LedgerSettings {
                parse_mode: config
                    .ledger
                    .as_ref()
                    .and_then(|l| l.parse_mode)
                    .unwrap_or(defaults.parse_mode),
                file_name: config
                    .ledger
                    .as_ref()
                    .and_then(|l| l.file_name.clone())
                    .unwrap_or(defaults.file_name),
            };

            (home, exports, ledger)
        }
        None => {
            let home = env.home.clone().unwrap_or(default_home);
            let exports = home.join("exports");
            (home, exports, LedgerSettings::default())
        }
    };

    if let Some(mode) = &env.parse_mode {
        ledger.parse_mode = mode
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid TRUST_LEDGER_PARSE_MODE")?;
    }

    Ok(ResolvedConfig {
        home,
        exports,
        config_file: file.map(|(path, _)| path.to_path_buf()),
        ledger,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let env = EnvOverrides::from_env();

    match find_config_file() {
        Some(config_path) => {
            let config = load_config_file(&config_path)?;
            resolve(Some((config_path.as_path(), &config)), &env, default_home)
        }
        None => resolve(None, &env, default_home),
    }
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the export directory
pub fn exports_dir() -> Result<PathBuf> {
    Ok(config()?.exports.clone())
}

/// Get the default ledger file path
pub fn ledger_path() -> Result<PathBuf> {
    Ok(config()?.ledger_path())
}
