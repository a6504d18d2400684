use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub font: FontConfig,
    pub code: CodeConfig,
    pub layout: LayoutConfig,
    pub html: HtmlConfig,
    pub autosave: AutosaveConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub paper: String,
    pub numbers: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            paper: "a4".to_string(),
            numbers: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Body font family; Typst's default is used when unset.
    pub family: Option<String>,
    pub size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: None,
            size: 11.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    pub font: String,
    pub size: f64,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            font: "DejaVu Sans Mono".to_string(),
            size: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Lists with at most this many items are wrapped in an unbreakable block.
    pub keep_list_max: usize,
    pub keep_heading_with_next: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            keep_list_max: 5,
            keep_heading_with_next: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Page title used when the document has no heading.
    pub title: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    pub enabled: bool,
    /// Quiet period after the last edit; read by whoever schedules autosaves.
    pub idle_ms: u64,
    /// Autosave onto the open file instead of the fallback file.
    pub use_main_file_if_possible: bool,
    pub fallback_filename: String,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_ms: 1000,
            use_main_file_if_possible: true,
            fallback_filename: "minimd_autosave.md".to_string(),
        }
    }
}

impl Config {
    /// The configuration bundled with the binary.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Location of the per-user config file, if the platform has a config dir.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("minimd").join("config.toml"))
    }

    /// Load the user's config file if there is one, otherwise the compiled default.
    pub fn discover() -> Result<Self, ConfigError> {
        match Self::user_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("Using config from: {}", path.display());
                Self::load(&path)
            }
            _ => {
                log::debug!("Using default config");
                Ok(Self::compiled_default())
            }
        }
    }
}
