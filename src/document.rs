use std::fs;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::AutosaveConfig;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Document has no file path yet")]
    NoPath,
}

/// What an autosave attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutosaveOutcome {
    Disabled,
    /// Text is identical to the last autosave.
    Unchanged,
    Saved(PathBuf),
}

/// Read a markdown file, replacing invalid UTF-8 instead of failing.
pub fn read_markdown(path: &Path) -> Result<String, DocumentError> {
    let bytes = fs::read(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            log::warn!(
                "{} is not valid UTF-8, replacing invalid bytes",
                path.display()
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Keep `.md`/`.markdown`, otherwise switch the extension to `.md`.
pub fn markdown_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") => {
            path.to_path_buf()
        }
        _ => path.with_extension("md"),
    }
}

fn write_text(path: &Path, text: &str) -> Result<(), DocumentError> {
    fs::write(path, text).map_err(|source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn content_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// An edited markdown buffer and the file it belongs to.
#[derive(Debug, Default)]
pub struct Document {
    path: Option<PathBuf>,
    text: String,
    dirty: bool,
    last_autosaved: Option<u64>,
}

impl Document {
    /// An untitled document.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let text = read_markdown(path)?;
        log::debug!("Opened {}", path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            text,
            dirty: false,
            last_autosaved: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// Write to the current path. Untitled documents need [`Document::save_as`].
    pub fn save(&mut self) -> Result<&Path, DocumentError> {
        let path = self.path.as_deref().ok_or(DocumentError::NoPath)?;
        write_text(path, &self.text)?;
        log::info!("Saved {}", path.display());
        self.dirty = false;
        Ok(path)
    }

    /// Adopt `path` (with a markdown extension) and save there.
    pub fn save_as(&mut self, path: &Path) -> Result<&Path, DocumentError> {
        self.path = Some(markdown_path(path));
        self.save()
    }

    /// Where an autosave would go: the open file, or the fallback file in `fallback_dir`.
    pub fn autosave_target(&self, config: &AutosaveConfig, fallback_dir: &Path) -> PathBuf {
        match &self.path {
            Some(path) if config.use_main_file_if_possible => path.clone(),
            _ => fallback_dir.join(&config.fallback_filename),
        }
    }

    /// Save a copy unless autosave is off or nothing changed since the last one.
    pub fn autosave(
        &mut self,
        config: &AutosaveConfig,
        fallback_dir: &Path,
    ) -> Result<AutosaveOutcome, DocumentError> {
        if !config.enabled {
            return Ok(AutosaveOutcome::Disabled);
        }

        let hash = content_hash(&self.text);
        if self.last_autosaved == Some(hash) {
            return Ok(AutosaveOutcome::Unchanged);
        }

        let target = self.autosave_target(config, fallback_dir);
        write_text(&target, &self.text)?;
        log::debug!("Autosaved {}", target.display());
        self.last_autosaved = Some(hash);
        Ok(AutosaveOutcome::Saved(target))
    }
}
