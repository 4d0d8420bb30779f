//! One-time steps run before the viewer endpoint starts serving.
//!
//! On the device the bridge usually starts at boot, before the wireless link
//! is up.  Serving before the link has a route would bind fine but be
//! unreachable, so startup optionally waits for the interface first.  It
//! then clears frames left over from the previous run so a viewer never sees
//! a stale image.

use std::time::Duration;

use tokio::process::Command;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::domain::BridgeConfig;
use crate::infrastructure::frame_store::FrameStore;

/// Polls `ip route show dev <interface>` until it prints a route.
///
/// Returns `true` once a route is seen, `false` if `timeout` elapses first.
/// A failure to run `ip` counts as "no route yet".
pub async fn wait_for_link(interface: &str, timeout: Duration, poll_interval: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if has_route(interface).await {
            info!("interface {interface} has a route");
            return true;
        }
        if Instant::now() + poll_interval > deadline {
            return false;
        }
        debug!("waiting for {interface}...");
        sleep(poll_interval).await;
    }
}

async fn has_route(interface: &str) -> bool {
    match Command::new("ip")
        .args(["route", "show", "dev", interface])
        .output()
        .await
    {
        Ok(output) => output.status.success() && output.stdout.iter().any(|b| !b.is_ascii_whitespace()),
        Err(e) => {
            debug!("could not run `ip route`: {e}");
            false
        }
    }
}

/// Runs the configured startup steps.  Neither step is fatal.
pub async fn run_startup(config: &BridgeConfig, frames: &FrameStore) {
    if let Some(interface) = &config.link_interface {
        if !wait_for_link(interface, config.link_timeout, config.link_poll_interval).await {
            warn!(
                "{interface} has no route after {:?}; serving anyway",
                config.link_timeout
            );
        }
    }

    if config.purge_frames_on_start {
        match frames.purge_all().await {
            Ok(0) => {}
            Ok(n) => info!("removed {n} old frame(s) from {}", frames.dir().display()),
            Err(e) => warn!("could not clear old frames: {e}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
