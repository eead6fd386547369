//! `.desktop` descriptor parsing.
//!
//! Lines are classified independently; a line matching several classes has
//! all of their effects applied in order: entry header, action header, field.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::desktop_entry::{DesktopAction, DesktopEntry, Shortcut};
use super::icon::IconResolver;
use crate::error::{RemoteAppsError, Result};

static ENTRY_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Desktop Entry\]").expect("entry header regex must compile"));
static ACTION_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[Desktop Action (.*)\]").expect("action header regex must compile")
});
static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)=(.*)$").expect("field regex must compile"));

/// Section the parser is currently filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Entry,
    Action,
}

/// Parses descriptor text into [`Shortcut`] values, resolving icons on the way.
#[derive(Debug, Clone, Default)]
pub struct ShortcutParser {
    icons: IconResolver,
}

impl ShortcutParser {
    /// Create a new parser using the given icon resolver.
    pub fn new(icons: IconResolver) -> Self {
        Self { icons }
    }

    /// Get the icon resolver.
    pub fn icons(&self) -> &IconResolver {
        &self.icons
    }

    /// Read and parse a descriptor file.
    pub fn parse_file(&self, path: &Path) -> Result<Shortcut> {
        let text = fs::read_to_string(path).map_err(|e| RemoteAppsError::io_with_path(e, path))?;
        self.parse(&text, path)
    }

    /// Parse descriptor text read from `path`.
    ///
    /// Fails with [`RemoteAppsError::InvalidShortcut`] when the entry section
    /// holds no fields. Icon failures are logged and leave the image empty;
    /// the `Icon` field itself is always kept.
    pub fn parse(&self, text: &str, path: impl Into<PathBuf>) -> Result<Shortcut> {
        let path = path.into();

        let mut entry = DesktopEntry::default();
        let mut actions: Vec<DesktopAction> = Vec::new();
        let mut current_action: Option<DesktopAction> = None;
        let mut last_action_header: Option<&str> = None;
        let mut section = Section::None;

        for line in text.lines() {
            if ENTRY_HEADER_RE.is_match(line) {
                section = Section::Entry;
            }

            if let Some(caps) = ACTION_HEADER_RE.captures(line) {
                section = Section::Action;
                if last_action_header != Some(line) {
                    if let Some(done) = current_action.take() {
                        actions.push(done);
                    }
                    current_action = Some(DesktopAction::new(&caps[1]));
                    last_action_header = Some(line);
                }
            }

            let Some(caps) = FIELD_RE.captures(line) else {
                continue;
            };
            let (key, value) = (&caps[1], &caps[2]);

            let (fields, icon_slot) = match (section, current_action.as_mut()) {
                (Section::Entry, _) => (&mut entry.fields, &mut entry.icon_png),
                (Section::Action, Some(action)) => (&mut action.fields, &mut action.icon_png),
                _ => {
                    warn!(
                        "Parsing desktop shortcut {:?}: found field outside of section: {}",
                        path, key
                    );
                    continue;
                }
            };

            if key == "Icon" {
                match self.icons.resolve(value) {
                    Ok(png) => *icon_slot = Some(png),
                    Err(e) => warn!("Icon for {:?} not resolved: {}", path, e),
                }
            }
            fields.push(key, value);
        }

        if let Some(done) = current_action.take() {
            actions.push(done);
        }

        if entry.fields.is_empty() {
            return Err(RemoteAppsError::InvalidShortcut { path });
        }

        debug!(
            "Parsed {:?}: {} entry fields, {} actions",
            path,
            entry.fields.len(),
            actions.len()
        );

        Ok(Shortcut {
            path,
            desktop_entry: entry,
            desktop_actions: actions,
        })
    }
}
