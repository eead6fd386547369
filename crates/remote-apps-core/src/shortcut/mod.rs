//! Desktop shortcut model, parsing and icon handling.
//!
//! Shortcuts are read from XDG `.desktop` descriptor files:
//! - [`ShortcutParser`] turns descriptor text into a [`Shortcut`]
//! - [`IconResolver`] turns `Icon=` references into 48x48 PNG data
//! - [`Shortcut::to_desktop_string`] writes the descriptor back out
//!
//! # Example
//!
//! ```rust,no_run
//! use remote_apps_core::shortcut::{IconResolver, ShortcutParser};
//! use std::path::Path;
//!
//! fn main() -> remote_apps_core::Result<()> {
//!     let parser = ShortcutParser::new(IconResolver::default());
//!     let shortcut = parser.parse_file(Path::new("/etc/skel/Desktop/editor.desktop"))?;
//!     println!("{} runs {:?}", shortcut.name(), shortcut.exec());
//!     Ok(())
//! }
//! ```

mod desktop_entry;
mod exec;
mod fields;
mod icon;
mod parser;

pub use desktop_entry::{DesktopAction, DesktopEntry, Shortcut, DESKTOP_ENTRY_HEADER};
pub use exec::{home_dir, prepare_exec};
pub use fields::{Field, FieldList};
pub use icon::{normalize_icon, IconResolver};
pub use parser::ShortcutParser;
