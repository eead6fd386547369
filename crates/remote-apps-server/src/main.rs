//! Remote Apps Server - HTTP façade over the shortcut registry.
//!
//! Lists the desktop shortcuts found in the watched directories and starts
//! them by display name.

mod handler;
mod server;

use anyhow::Result;
use clap::Parser;
use remote_apps_core::config::{AppConfig, IconConfig, ServerConfig, ShortcutConfig};
use remote_apps_core::platform::{wm_launch_preload, PRELOAD_ENV};
use remote_apps_core::{IconResolver, Launcher, ShortcutParser, ShortcutRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "remote-apps-server")]
#[command(about = "Serve desktop shortcuts as remotely launchable apps")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = ServerConfig::DEFAULT_HOST)]
    host: String,

    /// Directory of .desktop files to serve (repeatable)
    #[arg(short, long = "watch", default_value = ShortcutConfig::DEFAULT_WATCH_DIR)]
    watch: Vec<PathBuf>,

    /// Root of the icon theme tree used for bare icon names
    #[arg(long, default_value = IconConfig::THEME_ROOT)]
    icon_root: PathBuf,

    /// Preload the window manager launch shim into every started app
    #[arg(long)]
    wm_launch_preload: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting {} Server", AppConfig::APP_NAME);

    let parser = ShortcutParser::new(IconResolver::new(&args.icon_root));
    let registry = Arc::new(ShortcutRegistry::new(parser));

    let watcher = server::watch_and_scan(&registry, &args.watch)?;

    let mut launcher = Launcher::default();
    if args.wm_launch_preload {
        match wm_launch_preload() {
            Ok(preload) => {
                info!("Launching apps with {}={}", PRELOAD_ENV, preload);
                launcher = launcher.with_env(PRELOAD_ENV, preload);
            }
            Err(e) => warn!("wm-launch preload disabled: {}", e),
        }
    }

    // Start the server
    let addr = server::start_server(registry, launcher, &args.host, args.port).await?;

    // Print port for supervisors and tests to read
    println!("REMOTE_APPS_PORT={}", addr.port());

    info!("Remote apps server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");
    watcher.stop();

    Ok(())
}
