//! Platform integration.
//!
//! Launch environment tweaks that depend on libraries installed on the host:
//! - `preload` - `LD_PRELOAD` value for window manager launch integration

pub mod preload;

pub use preload::{find_xcb_library, parse_xcb_library, wm_launch_preload};

/// Environment variable carrying the preload string.
pub const PRELOAD_ENV: &str = "LD_PRELOAD";
