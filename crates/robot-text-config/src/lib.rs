use glob::Pattern;
use robot_text_engine::{DumpOptions, IoError, RobotVersion, scan_robot_files};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "robot-text";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid exclude pattern {pattern:?} in {config_path}: {source}")]
    InvalidExclude {
        config_path: PathBuf,
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Language version used when none is given on the command line.
    pub robot_version: RobotVersion,
    /// Directories scanned when no files are given.
    pub suite_roots: Vec<PathBuf>,
    /// Glob patterns skipped while scanning.
    pub exclude: Vec<String>,
    pub dump: DumpOptions,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        for pattern in &config.exclude {
            Pattern::new(pattern).map_err(|source| ConfigError::InvalidExclude {
                config_path: config_path.to_path_buf(),
                pattern: pattern.clone(),
                source,
            })?;
        }

        // Expand shell variables and tilde in suite roots
        config.suite_roots = config
            .suite_roots
            .into_iter()
            .map(|root| Self::expand_path(&root).unwrap_or(root))
            .collect();

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    /// `$XDG_CONFIG_HOME/robot-text/config.toml`, or the same below
    /// `~/.config` when the variable is unset.
    pub fn config_path() -> PathBuf {
        let config_dir = match std::env::var_os("XDG_CONFIG_HOME") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => PathBuf::from(shellexpand::tilde("~/.config").as_ref()),
        };
        config_dir.join(APP_DIR).join(CONFIG_FILE)
    }

    /// Whether `path` matches one of the exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude
            .iter()
            .filter_map(|pattern| Pattern::new(pattern).ok())
            .any(|pattern| pattern.matches_path(path))
    }

    /// Every suite and resource file below the configured roots, minus the
    /// excluded ones.
    pub fn suite_files(&self) -> Result<Vec<PathBuf>, IoError> {
        let mut files = Vec::new();
        for root in &self.suite_roots {
            files.extend(
                scan_robot_files(root)?
                    .into_iter()
                    .filter(|path| !self.is_excluded(path)),
            );
        }
        Ok(files)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
