use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

const PREFS_DIR: &str = "uzllf_terminal";
const PREFS_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PrefsFile {
    #[serde(default)]
    language: Option<String>,
}

/// Where the single persisted preference lives.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: Option<PathBuf>,
}

impl PrefsStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Uses the explicit override when given, else the XDG config location.
    pub fn resolve(override_path: Option<PathBuf>) -> Self {
        Self {
            path: override_path.or_else(default_prefs_path),
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Stored locale, if one was saved and is still a supported code.
    pub fn load_locale(&self) -> Option<Locale> {
        let path = self.path.as_ref()?;
        let raw = fs::read_to_string(path).ok()?;
        let prefs = serde_json::from_str::<PrefsFile>(&raw).ok()?;
        let code = prefs.language?;
        let locale = Locale::parse(&code);
        if locale.is_none() {
            tracing::warn!(code = %code, "ignoring unsupported stored language");
        }
        locale
    }

    pub fn save_locale(&self, locale: Locale) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("create preferences dir")?;
        }
        let prefs = PrefsFile {
            language: Some(locale.code().to_string()),
        };
        let json = serde_json::to_string(&prefs).context("serialize preferences")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).context("write preferences")?;
        fs::rename(&tmp, path).context("swap preferences")?;
        Ok(())
    }
}

fn default_prefs_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(PREFS_DIR).join(PREFS_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(PREFS_DIR)
            .join(PREFS_FILE),
    )
}
