//! Live-view bridge: entry point.
//!
//! This binary runs next to a locally rendered UI.  It lets a remote viewer
//! fetch the UI's newest frame and interact with it: the viewer streams raw
//! pointer and touch samples over a WebSocket, the bridge classifies them
//! into taps, clicks, drags, and scrolls, and each gesture is written to the
//! UI's Unix socket.
//!
//! # Usage
//!
//! ```text
//! liveview-bridge [OPTIONS]
//!
//! Options:
//!   --bind <ADDR>                IP address to listen on [default: 0.0.0.0]
//!   --port <PORT>                Viewer WebSocket port [default: 8081]
//!   --socket-path <PATH>         UI input socket [default: /tmp/ui_touch_socket]
//!   --frame-dir <DIR>            Directory holding frame images [default: /tmp]
//!   --frame-prefix <PREFIX>      Frame file name prefix [default: ui_frame_]
//!   --forward-timeout-ms <MS>    Per-gesture delivery timeout [default: 1000]
//!   --link-interface <IFACE>     Wait for this interface before serving
//!   --link-timeout <SECS>        How long to wait for the link [default: 30]
//!   --keep-frames                Do not delete old frames at startup
//!   --config <FILE>              TOML file with [gestures] thresholds
//! ```
//!
//! # Environment variable overrides
//!
//! Every option except `--keep-frames` can also be set through an
//! environment variable.  CLI args take precedence when both are present.
//!
//! | Variable                      | Default                |
//! |-------------------------------|------------------------|
//! | `LIVEVIEW_BIND`               | `0.0.0.0`              |
//! | `LIVEVIEW_PORT`               | `8081`                 |
//! | `LIVEVIEW_SOCKET_PATH`        | `/tmp/ui_touch_socket` |
//! | `LIVEVIEW_FRAME_DIR`          | `/tmp`                 |
//! | `LIVEVIEW_FRAME_PREFIX`       | `ui_frame_`            |
//! | `LIVEVIEW_FORWARD_TIMEOUT_MS` | `1000`                 |
//! | `LIVEVIEW_LINK_INTERFACE`     | none                   |
//! | `LIVEVIEW_LINK_TIMEOUT`       | `30`                   |
//! | `LIVEVIEW_CONFIG`             | none                   |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use liveview_bridge::domain::BridgeConfig;
use liveview_bridge::infrastructure::config_file::FileConfig;
use liveview_bridge::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote live-view bridge.
///
/// Serves the newest UI frame to viewers and relays their gestures to the
/// local UI process.
#[derive(Debug, Parser)]
#[command(
    name = "liveview-bridge",
    about = "Serves UI frames to remote viewers and relays their gestures to the UI",
    version
)]
struct Cli {
    /// IP address to bind the viewer WebSocket server to.
    ///
    /// Use `0.0.0.0` to accept viewers on any interface, or `127.0.0.1` for
    /// local viewers only.
    #[arg(long, default_value = "0.0.0.0", env = "LIVEVIEW_BIND")]
    bind: String,

    /// TCP port for the viewer WebSocket server.
    #[arg(long, default_value_t = 8081, env = "LIVEVIEW_PORT")]
    port: u16,

    /// Unix socket the UI process listens on for gestures.
    #[arg(long, default_value = "/tmp/ui_touch_socket", env = "LIVEVIEW_SOCKET_PATH")]
    socket_path: PathBuf,

    /// Directory the UI writes frame images into.
    #[arg(long, default_value = "/tmp", env = "LIVEVIEW_FRAME_DIR")]
    frame_dir: PathBuf,

    /// File name prefix of frame images.
    #[arg(long, default_value = "ui_frame_", env = "LIVEVIEW_FRAME_PREFIX")]
    frame_prefix: String,

    /// Upper bound, in milliseconds, on delivering one gesture.
    #[arg(long, default_value_t = 1000, env = "LIVEVIEW_FORWARD_TIMEOUT_MS")]
    forward_timeout_ms: u64,

    /// Network interface that must have a route before serving starts.
    #[arg(long, env = "LIVEVIEW_LINK_INTERFACE")]
    link_interface: Option<String>,

    /// Seconds to wait for `--link-interface` before serving anyway.
    #[arg(long, default_value_t = 30, env = "LIVEVIEW_LINK_TIMEOUT")]
    link_timeout: u64,

    /// Keep frame images left over from a previous run.
    #[arg(long)]
    keep_frames: bool,

    /// TOML file with a `[gestures]` table of classifier thresholds.
    #[arg(long, env = "LIVEVIEW_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`BridgeConfig`].
    ///
    /// `file` supplies the gesture thresholds; `None` keeps the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address.
    fn into_bridge_config(self, file: Option<FileConfig>) -> anyhow::Result<BridgeConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;

        let defaults = BridgeConfig::default();
        Ok(BridgeConfig {
            bind_addr,
            socket_path: self.socket_path,
            forward_timeout: Duration::from_millis(self.forward_timeout_ms),
            frame_dir: self.frame_dir,
            frame_prefix: self.frame_prefix,
            gestures: file.map(|f| f.gestures).unwrap_or(defaults.gestures),
            purge_frames_on_start: !self.keep_frames,
            link_interface: self.link_interface,
            link_timeout: Duration::from_secs(self.link_timeout),
            ..defaults
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised; `RUST_LOG` sets the level.
/// 2. CLI arguments are parsed and the optional threshold file is loaded.
/// 3. A Ctrl+C handler is spawned that clears the shared `running` flag.
/// 4. [`run_server`] waits for the link, clears old frames, and serves
///    viewers until the flag is cleared.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => Some(
            FileConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
        ),
        None => None,
    };
    let config = cli.into_bridge_config(file)?;

    info!(
        "live-view bridge starting: viewers={}, socket={}",
        config.bind_addr,
        config.socket_path.display()
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    // The accept loop checks `running` every 200 ms and exits cleanly.
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, running).await?;

    info!("live-view bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
