//! Centralized configuration for the remote apps core.
//!
//! This module provides configuration constants for descriptor discovery,
//! icon normalization, process launching and the HTTP server defaults.

use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Remote Apps";
}

/// Descriptor file discovery.
pub struct ShortcutConfig;

impl ShortcutConfig {
    /// Extension (without the dot) of descriptor files.
    pub const EXTENSION: &'static str = "desktop";
    pub const DEFAULT_WATCH_DIR: &'static str = "/etc/skel/Desktop";
}

/// Icon lookup and normalization.
pub struct IconConfig;

impl IconConfig {
    pub const THEME_ROOT: &'static str = "/usr/share/icons";
    /// Edge length of every normalized icon.
    pub const SIZE: u32 = 48;
    /// Extension of the portable image format icons are normalized to.
    pub const PORTABLE_EXTENSION: &'static str = "png";
    /// Path markers identifying a 48 pixel icon variant.
    pub const SIZE_MARKERS: &'static [&'static str] = &["48x48", "/48/"];
    /// Themed lookups match `<root>/<theme>/<size>/<context>/<name>.png`.
    pub const THEME_DEPTH: usize = 4;
}

/// Launch protocol timing.
pub struct LaunchConfig;

impl LaunchConfig {
    pub const SHELL: &'static str = "sh";
    pub const DISCOVERY_TIMEOUT: Duration = Duration::from_millis(1000);
    pub const POLL_INTERVAL: Duration = Duration::from_millis(1);
    /// Extra time the requester waits on the handoff beyond the discovery timeout.
    pub const HANDOFF_SLACK: Duration = Duration::from_millis(250);
}

/// HTTP server defaults.
pub struct ServerConfig;

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 8842;
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
}

/// Window manager integration preload.
pub struct PreloadConfig;

impl PreloadConfig {
    pub const WM_LAUNCH_SOLIB: &'static str =
        "/var/run/appconfig/.remote-apps-launcher/wm-launch-preload.so";
    pub const XCB_LIBRARY: &'static str = "libX11-xcb.so.1";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_reasonable() {
        assert!(LaunchConfig::POLL_INTERVAL < LaunchConfig::DISCOVERY_TIMEOUT);
        assert!(LaunchConfig::HANDOFF_SLACK > Duration::ZERO);
    }

    #[test]
    fn test_size_markers_mention_size() {
        for marker in IconConfig::SIZE_MARKERS {
            assert!(marker.contains(&IconConfig::SIZE.to_string()));
        }
    }
}
