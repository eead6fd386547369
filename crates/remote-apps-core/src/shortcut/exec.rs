//! Expansion of `Exec=` field codes before launching.

use std::path::PathBuf;

/// Expand field codes of an `Exec` value into a shell command.
///
/// File codes (`%f`, `%F`) become `home`. URL, icon, name and location codes
/// are dropped.
pub fn prepare_exec(exec: &str, home: &str) -> String {
    let mut command = String::with_capacity(exec.len());
    let mut chars = exec.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            command.push(c);
            continue;
        }
        match chars.next() {
            Some('f' | 'F') => command.push_str(home),
            Some('%') => command.push('%'),
            Some('u' | 'U' | 'i' | 'c' | 'k') => {}
            Some(other) => {
                command.push('%');
                command.push(other);
            }
            None => command.push('%'),
        }
    }

    command.trim().to_string()
}

/// Home directory used for file field codes.
pub fn home_dir() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/"))
        .to_string_lossy()
        .into_owned()
}
