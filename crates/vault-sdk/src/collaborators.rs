//! Presentation-layer collaborators
//!
//! File dialogs and the ambient theme live outside the core. A desktop shell
//! would back these with native dialogs; the CLI backs them with arguments
//! and configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Asks the user for a file to register as evidence
pub trait FilePicker: Send + Sync {
    /// The chosen file, or `None` if the user cancelled
    fn pick_source_file(&self) -> Option<PathBuf>;
}

/// Asks the user where to write an export package
pub trait SaveTargetPicker: Send + Sync {
    /// The chosen destination, or `None` if the user cancelled
    fn choose_export_destination(&self) -> Option<PathBuf>;
}

/// Light or dark presentation theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reports the ambient theme preference
pub trait ThemeSource: Send + Sync {
    /// Current preference
    fn preference(&self) -> Theme;
}

/// A picker answering with a path decided up front
///
/// Serves both as [`FilePicker`] and [`SaveTargetPicker`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetPath(pub Option<PathBuf>);

impl PresetPath {
    /// Always answer with `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }

    /// Always cancel
    pub fn cancelled() -> Self {
        Self(None)
    }
}

impl FilePicker for PresetPath {
    fn pick_source_file(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

impl SaveTargetPicker for PresetPath {
    fn choose_export_destination(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

impl ThemeSource for Theme {
    fn preference(&self) -> Theme {
        *self
    }
}
