//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! It can be constructed from CLI arguments (preferred for production) or from
//! sensible defaults (useful for local development and tests).
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! variable reads inside the domain) makes the bridge easy to embed in tests.
//! `main.rs` is responsible for populating the struct from CLI args,
//! environment variables, and the optional threshold file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use liveview_core::GestureThresholds;

/// All runtime configuration for the live-view bridge.
///
/// # Example
///
/// ```rust
/// use liveview_bridge::domain::BridgeConfig;
///
/// let cfg = BridgeConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 8081);
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// The address and port the viewer WebSocket server binds to.
    pub bind_addr: SocketAddr,

    /// Filesystem path of the UI process's input socket.
    pub socket_path: PathBuf,

    /// Upper bound on connecting to and writing one gesture to the UI
    /// socket.  A hung consumer costs at most this much per gesture.
    pub forward_timeout: Duration,

    /// Directory the UI writes its frame images into.
    pub frame_dir: PathBuf,

    /// File name prefix shared by every frame image.
    pub frame_prefix: String,

    /// File extension of frame images, without the dot.
    pub frame_extension: String,

    /// Gesture classification thresholds.
    pub gestures: GestureThresholds,

    /// Delete leftover frames from a previous run before serving.
    pub purge_frames_on_start: bool,

    /// Network interface to wait for before serving; `None` skips the wait.
    pub link_interface: Option<String>,

    /// How long to wait for `link_interface` to get a route.
    pub link_timeout: Duration,

    /// Delay between link checks.
    pub link_poll_interval: Duration,
}

impl Default for BridgeConfig {
    /// | Field                 | Default                 |
    /// |-----------------------|-------------------------|
    /// | bind_addr             | `0.0.0.0:8081`          |
    /// | socket_path           | `/tmp/ui_touch_socket`  |
    /// | forward_timeout       | 1 second                |
    /// | frame_dir             | `/tmp`                  |
    /// | frame_prefix          | `ui_frame_`             |
    /// | frame_extension       | `png`                   |
    /// | purge_frames_on_start | `true`                  |
    /// | link_interface        | none                    |
    /// | link_timeout          | 30 seconds              |
    /// | link_poll_interval    | 2 seconds               |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8081)),
            socket_path: PathBuf::from("/tmp/ui_touch_socket"),
            forward_timeout: Duration::from_secs(1),
            frame_dir: PathBuf::from("/tmp"),
            frame_prefix: "ui_frame_".to_string(),
            frame_extension: "png".to_string(),
            gestures: GestureThresholds::default(),
            purge_frames_on_start: true,
            link_interface: None,
            link_timeout: Duration::from_secs(30),
            link_poll_interval: Duration::from_secs(2),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
