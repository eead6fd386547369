//! `LD_PRELOAD` value for window manager launch integration.
//!
//! The preload string is `<libX11-xcb path>:<wm-launch solib>`, the X11 XCB
//! library as located by `ldconfig -p` followed by the wm-launch shim.

use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::PreloadConfig;
use crate::error::{RemoteAppsError, Result};

static XCB_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{} .* => (.*)",
        regex::escape(PreloadConfig::XCB_LIBRARY)
    ))
    .expect("valid xcb library regex")
});

/// Build the preload string for the default shim location.
pub fn wm_launch_preload() -> Result<String> {
    let xcb = find_xcb_library()?;
    let shim = find_wm_launch_library(Path::new(PreloadConfig::WM_LAUNCH_SOLIB))?;
    Ok(format!("{}:{}", xcb, shim))
}

/// Locate the XCB library through the dynamic linker cache.
pub fn find_xcb_library() -> Result<String> {
    let output = Command::new("ldconfig")
        .arg("-p")
        .output()
        .map_err(|e| RemoteAppsError::Preload {
            message: format!("failed to run ldconfig: {}", e),
        })?;

    let listing = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        return Err(RemoteAppsError::Preload {
            message: format!(
                "ldconfig exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let path = parse_xcb_library(&listing).ok_or_else(|| RemoteAppsError::Preload {
        message: format!("{} library not found", PreloadConfig::XCB_LIBRARY),
    })?;
    debug!("Found {} at {}", PreloadConfig::XCB_LIBRARY, path);
    Ok(path)
}

/// First library path for the XCB library in an `ldconfig -p` listing.
pub fn parse_xcb_library(listing: &str) -> Option<String> {
    listing
        .lines()
        .find_map(|line| XCB_LINE_RE.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|path| !path.is_empty())
}

fn find_wm_launch_library(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(RemoteAppsError::Preload {
            message: format!("wm-launch lib not found at {}", path.display()),
        });
    }
    Ok(path.display().to_string())
}
