//! liveview-event-tap: stand-in for the UI process's gesture socket.
//!
//! Binds the socket the bridge forwards to and logs every gesture it
//! receives.  Run it instead of the real UI to check what a viewer's input
//! turns into:
//!
//! ```text
//! liveview-event-tap --socket-path /tmp/ui_touch_socket
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use liveview_bridge::infrastructure::event_listener::{EventListener, ListenerError};

#[derive(Debug, Parser)]
#[command(
    name = "liveview-event-tap",
    about = "Logs gestures delivered to the UI input socket",
    version
)]
struct Cli {
    /// Socket path to bind.
    #[arg(long, default_value = "/tmp/ui_touch_socket", env = "LIVEVIEW_SOCKET_PATH")]
    socket_path: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let listener = EventListener::bind(&cli.socket_path)
        .with_context(|| format!("failed to listen on {}", cli.socket_path.display()))?;
    info!("listening on {}", listener.path().display());

    loop {
        tokio::select! {
            received = listener.accept_one() => match received {
                Ok(message) => {
                    let (x, y) = message.event.position();
                    info!(
                        "{} at ({x}, {y}) t={:.3}",
                        message.event.type_name(),
                        message.timestamp
                    );
                }
                Err(ListenerError::Decode(e)) => warn!("discarded message: {e}"),
                Err(e @ ListenerError::Timeout { .. }) => warn!("dropped connection: {e}"),
                Err(e) => return Err(e).context("accept failed"),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down");
                break;
            }
        }
    }

    Ok(())
}
