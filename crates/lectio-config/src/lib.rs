//! `~/.config/lectio/config.toml`: where the scripture data lives and the
//! defaults the reader starts with.
//!
//! ```toml
//! data_path = "~/bible"
//! translation = "WEBBE"
//! render_mode = "sidenotes"
//! note_group = "study"
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use lectio_engine::{Backend, Library, RenderMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TRANSLATION: &str = "WEBBE";

const CONFIG_FILE: &str = "~/.config/lectio/config.toml";

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

    #[error("Invalid {field} in config file at {config_path}: {reason}")]
    InvalidValue {
        config_path: PathBuf,
        field: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root holding `Scripture/` and `notes/`.
    pub data_path: PathBuf,
    #[serde(default = "default_translation")]
    pub translation: String,
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(default)]
    pub include_apocrypha: bool,
    /// Note group shown by default; none means notes are not loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_group: Option<String>,
}

fn default_translation() -> String {
    DEFAULT_TRANSLATION.to_string()
}

impl Config {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            translation: default_translation(),
            render_mode: RenderMode::default(),
            include_apocrypha: false,
            note_group: None,
        }
    }

    /// Read and validate a config file. A missing file is `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ConfigReadError {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml(&content, config_path).map(Some)
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    fn from_toml(content: &str, config_path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config =
            toml::from_str(content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if let Err((field, reason)) = config.check() {
            return Err(ConfigError::InvalidValue {
                config_path: config_path.to_path_buf(),
                field,
                reason,
            });
        }

        if let Some(expanded) = expand(&config.data_path) {
            config.data_path = expanded;
        }
        Ok(config)
    }

    /// Both values end up as path components under `data_path`.
    fn check(&self) -> Result<(), (&'static str, String)> {
        let translation = &self.translation;
        if translation.is_empty()
            || !translation
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err((
                "translation",
                format!("{translation:?} must be a non-empty code of letters, digits, '-' or '_'"),
            ));
        }

        if let Some(group) = &self.note_group
            && (group.is_empty() || group == "." || group == ".." || group.contains(['/', '\\']))
        {
            return Err(("note_group", format!("{group:?} is not a directory name")));
        }

        Ok(())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", config_path.display()))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from(shellexpand::tilde(CONFIG_FILE).as_ref())
    }

    /// Library reading from the configured data path first, then `extra`
    /// directories in order.
    pub fn library(&self, extra: &[PathBuf]) -> Library {
        let backends = std::iter::once(&self.data_path)
            .chain(extra)
            .map(|dir| Backend::Directory(dir.clone()))
            .collect();
        Library::new(backends)
    }
}

/// `~` and `$VAR` expansion; None (path kept as written) when a variable is unset.
fn expand(path: &Path) -> Option<PathBuf> {
    shellexpand::full(&path.to_string_lossy())
        .ok()
        .map(|expanded| PathBuf::from(expanded.as_ref()))
}
