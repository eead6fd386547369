//! Shortcut model and `.desktop` serialization.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::fields::FieldList;
use crate::error::{RemoteAppsError, Result};

pub const DESKTOP_ENTRY_HEADER: &str = "[Desktop Entry]";

/// The primary `[Desktop Entry]` section.
#[derive(Debug, Clone, Default)]
pub struct DesktopEntry {
    pub fields: FieldList,
    /// Normalized 48x48 PNG resolved from the `Icon` field.
    pub icon_png: Option<Vec<u8>>,
}

/// A `[Desktop Action <label>]` section.
#[derive(Debug, Clone, Default)]
pub struct DesktopAction {
    pub action: String,
    pub fields: FieldList,
    pub icon_png: Option<Vec<u8>>,
}

impl DesktopAction {
    /// Create a new empty action with the given label.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    /// Section header line for this action.
    pub fn header(&self) -> String {
        format!("[Desktop Action {}]", self.action)
    }
}

/// A parsed descriptor file.
#[derive(Debug, Clone, Default)]
pub struct Shortcut {
    /// Source file this shortcut was parsed from.
    pub path: PathBuf,
    pub desktop_entry: DesktopEntry,
    pub desktop_actions: Vec<DesktopAction>,
}

impl Shortcut {
    /// Display name, the entry's `Name` field (empty if absent).
    pub fn name(&self) -> &str {
        self.desktop_entry.fields.get_or_empty("Name")
    }

    /// The entry's `Comment` field.
    pub fn comment(&self) -> Option<&str> {
        self.desktop_entry.fields.get("Comment")
    }

    /// The entry's raw `Exec` field.
    pub fn exec(&self) -> Option<&str> {
        self.desktop_entry.fields.get("Exec")
    }

    /// Normalized entry icon, if one was resolved.
    pub fn icon_png(&self) -> Option<&[u8]> {
        self.desktop_entry.icon_png.as_deref()
    }

    /// Render the descriptor text.
    ///
    /// Entry header and fields first, then every action preceded by a blank
    /// line. Icon images are not part of the text.
    pub fn to_desktop_string(&self) -> String {
        let mut content = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(content, "{}", DESKTOP_ENTRY_HEADER);
        for field in &self.desktop_entry.fields {
            let _ = writeln!(content, "{}={}", field.key, field.value);
        }

        for action in &self.desktop_actions {
            let _ = writeln!(content);
            let _ = writeln!(content, "{}", action.header());
            for field in &action.fields {
                let _ = writeln!(content, "{}={}", field.key, field.value);
            }
        }

        content
    }

    /// Write the descriptor text to `writer`.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<()> {
        writer.write_all(self.to_desktop_string().as_bytes())?;
        Ok(())
    }

    /// Write the descriptor text to a file, creating parent directories.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RemoteAppsError::Io {
                message: "create directory".to_string(),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| RemoteAppsError::Io {
            message: "create desktop file".to_string(),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

        self.write_to(&mut file).map_err(|e| match e {
            RemoteAppsError::Io { source, .. } => RemoteAppsError::Io {
                message: "write desktop file".to_string(),
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })?;

        debug!("Wrote desktop entry to {:?}", path);

        Ok(())
    }
}
