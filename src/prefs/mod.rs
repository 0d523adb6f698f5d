//! Local persisted UI preferences.
//!
//! A small TOML document at a fixed path, read once at startup and written
//! on every change. This sits beside the resource cache, not inside it:
//! preferences are owned by this client, never fetched from the backend.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Operator-facing toggles persisted across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Show the guided tour on the next launch.
    pub guided_tour: bool,
    /// Currency code used when rendering money columns.
    pub currency: String,
    /// Directory CSV exports are written into.
    pub export_dir: PathBuf,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            guided_tour: true,
            currency: "EUR".to_string(),
            export_dir: PathBuf::from("exports"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("preferences file is not valid TOML: {0}")]
    Parse(String),
    #[error("failed to render preferences: {0}")]
    Render(String),
}

/// Preference store bound to one file.
pub struct PreferenceStore {
    path: PathBuf,
    current: RwLock<Preferences>,
}

impl PreferenceStore {
    /// Load preferences from `path`; a missing file means defaults.
    ///
    /// A present-but-corrupt file is an error rather than a silent reset;
    /// the operator's choices must not be discarded on a parse hiccup.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let current = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                toml::from_str(&contents).map_err(|e| PrefsError::Parse(e.to_string()))?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No preference file; using defaults");
                Preferences::default()
            }
            Err(err) => return Err(PrefsError::Io(err)),
        };
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current preferences, by value.
    pub async fn get(&self) -> Preferences {
        self.current.read().await.clone()
    }

    /// Apply a change and persist it before returning.
    ///
    /// The write guard is held across the file write so concurrent updates
    /// persist in the order they were applied.
    pub async fn update(
        &self,
        apply: impl FnOnce(&mut Preferences),
    ) -> Result<Preferences, PrefsError> {
        let mut guard = self.current.write().await;
        let mut next = guard.clone();
        apply(&mut next);
        if next != *guard {
            let rendered =
                toml::to_string_pretty(&next).map_err(|e| PrefsError::Render(e.to_string()))?;
            tokio::fs::write(&self.path, rendered).await?;
            *guard = next.clone();
            debug!(path = %self.path.display(), "Preferences persisted");
        }
        Ok(next)
    }

    pub async fn set_guided_tour(&self, enabled: bool) -> Result<(), PrefsError> {
        self.update(|prefs| prefs.guided_tour = enabled).await?;
        Ok(())
    }
}
