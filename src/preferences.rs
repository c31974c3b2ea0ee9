//! Persisted UI language
//!
//! A single JSON document `{ "language": "<code>" }`. Nothing else is persisted.

use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Storage key for the language preference
pub const LANGUAGE_KEY: &str = "language";

/// Interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    Es,
    Ru,
    Zh,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::Ru => "ru",
            Language::Zh => "zh",
            Language::Ar => "ar",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ExplorerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "es" => Ok(Language::Es),
            "ru" => Ok(Language::Ru),
            "zh" => Ok(Language::Zh),
            "ar" => Ok(Language::Ar),
            other => Err(ExplorerError::UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(rename = "language")]
    language: Language,
}

#[derive(Debug, Clone)]
pub struct LanguageStore {
    path: PathBuf,
}

impl LanguageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored language, or the default when missing or unreadable
    pub fn load(&self) -> Language {
        match self.try_load() {
            Ok(Some(language)) => language,
            Ok(None) => Language::default(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable preferences");
                Language::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<Option<Language>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let stored: StoredPreferences = serde_json::from_str(&raw)?;
        Ok(Some(stored.language))
    }

    /// Write atomically: a temp file in the same directory is persisted over the target
    pub fn save(&self, language: Language) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let body = serde_json::to_string_pretty(&StoredPreferences { language })?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(body.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| ExplorerError::Io(e.error))?;
        debug!(path = %self.path.display(), %language, "language saved");
        Ok(())
    }
}
