//! End-to-end tests for a viewer session.
//!
//! A real [`ViewerServer`] is bound on `127.0.0.1:0` and driven with a
//! WebSocket client.  Gestures go through the production [`EventForwarder`]
//! to an [`EventListener`] standing in for the UI process, so every layer
//! between the viewer's JSON and the UI's socket is exercised.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use uuid::Uuid;

use liveview_bridge::domain::{BridgeConfig, BridgeToViewerMsg};
use liveview_bridge::infrastructure::event_listener::EventListener;
use liveview_bridge::infrastructure::frame_store::FrameStore;
use liveview_bridge::infrastructure::{EventForwarder, ViewerServer};
use liveview_core::GestureEvent;

struct Harness {
    url: String,
    listener: EventListener,
    frame_dir: PathBuf,
    running: Arc<AtomicBool>,
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        let _ = std::fs::remove_dir_all(&self.frame_dir);
    }
}

async fn start() -> Harness {
    let socket = std::env::temp_dir().join(format!("liveview-e2e-{}.sock", Uuid::new_v4()));
    let frame_dir = std::env::temp_dir().join(format!("liveview-e2e-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&frame_dir).unwrap();

    let config = BridgeConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        socket_path: socket.clone(),
        frame_dir: frame_dir.clone(),
        ..BridgeConfig::default()
    };
    let listener = EventListener::bind(&socket).unwrap();
    let sink = Arc::new(EventForwarder::new(&socket, Duration::from_secs(1)));
    let frames = FrameStore::new(&frame_dir, "ui_frame_", "png");

    let server = ViewerServer::bind(&config, sink, frames).await.unwrap();
    let addr = server.local_addr().unwrap();
    let running = Arc::new(AtomicBool::new(true));
    tokio::spawn(server.run(Arc::clone(&running)));

    Harness {
        url: format!("ws://{addr}"),
        listener,
        frame_dir,
        running,
    }
}

fn text(value: Value) -> WsMessage {
    WsMessage::Text(value.to_string())
}

fn parse(msg: WsMessage) -> BridgeToViewerMsg {
    match msg {
        WsMessage::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

fn write_frame(dir: &Path, name: &str, bytes: &[u8]) {
    std::fs::write(dir.join(name), bytes).unwrap();
}

#[tokio::test]
async fn test_touch_tap_reaches_the_ui_socket() {
    // Arrange
    let harness = start().await;
    let (mut ws, _) = connect_async(harness.url.as_str()).await.unwrap();

    // Act: press + release on a 1080x540 surface, 40 ms apart
    let surface = json!({"width": 1080.0, "height": 540.0});
    ws.send(text(json!({
        "type": "Sample",
        "sample": {"pointerId": 1, "x": 540, "y": 270, "kind": "press", "modality": "touch", "timestamp": 1000},
        "surface": surface,
    })))
    .await
    .unwrap();
    let press_ack = parse(ws.next().await.unwrap().unwrap());

    ws.send(text(json!({
        "type": "Sample",
        "sample": {"pointerId": 1, "x": 540, "y": 270, "kind": "release", "modality": "touch", "timestamp": 1040},
        "surface": surface,
    })))
    .await
    .unwrap();
    let (release_ack, delivered) = tokio::join!(ws.next(), harness.listener.accept_one());

    // Assert
    assert_eq!(
        press_ack,
        BridgeToViewerMsg::SampleAck {
            event: None,
            delivered: false
        }
    );
    assert_eq!(
        parse(release_ack.unwrap().unwrap()),
        BridgeToViewerMsg::SampleAck {
            event: Some("tap".to_string()),
            delivered: true
        }
    );
    assert_eq!(
        delivered.unwrap().event,
        GestureEvent::Tap { x: 1080, y: 540 }
    );
}

#[tokio::test]
async fn test_invalid_json_is_rejected_and_session_stays_open() {
    let harness = start().await;
    let (mut ws, _) = connect_async(harness.url.as_str()).await.unwrap();

    ws.send(WsMessage::Text("{oops".to_string())).await.unwrap();
    let rejected = parse(ws.next().await.unwrap().unwrap());

    ws.send(text(json!({"type": "FetchFrame"}))).await.unwrap();
    let after = parse(ws.next().await.unwrap().unwrap());

    assert!(matches!(rejected, BridgeToViewerMsg::Rejected { .. }));
    assert_eq!(after, BridgeToViewerMsg::NoFrame);
}

#[tokio::test]
async fn test_fetch_frame_returns_newest_image_as_binary() {
    let harness = start().await;
    write_frame(&harness.frame_dir, "ui_frame_0001.png", b"first");
    write_frame(&harness.frame_dir, "ui_frame_0002.png", b"second");
    let (mut ws, _) = connect_async(harness.url.as_str()).await.unwrap();

    ws.send(text(json!({"type": "FetchFrame"}))).await.unwrap();
    let header = parse(ws.next().await.unwrap().unwrap());
    let body = ws.next().await.unwrap().unwrap();

    assert_eq!(
        header,
        BridgeToViewerMsg::Frame {
            name: "ui_frame_0002.png".to_string(),
            size: 6
        }
    );
    assert_eq!(body, WsMessage::Binary(b"second".to_vec()));
}

#[tokio::test]
async fn test_viewers_have_independent_sessions() {
    // Two viewers each press pointer 1; releasing on one must not end the
    // other's session.
    let harness = start().await;
    let (mut a, _) = connect_async(harness.url.as_str()).await.unwrap();
    let (mut b, _) = connect_async(harness.url.as_str()).await.unwrap();
    let press = |x: i32| {
        text(json!({
            "type": "Sample",
            "sample": {"pointerId": 1, "x": x, "y": 100, "kind": "press", "modality": "pointer", "timestamp": 0},
        }))
    };

    a.send(press(100)).await.unwrap();
    a.next().await.unwrap().unwrap();
    b.send(press(500)).await.unwrap();
    b.next().await.unwrap().unwrap();

    a.send(text(json!({
        "type": "Sample",
        "sample": {"pointerId": 1, "x": 100, "y": 100, "kind": "release", "modality": "pointer", "timestamp": 20},
    })))
    .await
    .unwrap();
    let (a_ack, a_event) = tokio::join!(a.next(), harness.listener.accept_one());

    b.send(text(json!({
        "type": "Sample",
        "sample": {"pointerId": 1, "x": 500, "y": 130, "kind": "move", "modality": "pointer", "timestamp": 30},
    })))
    .await
    .unwrap();
    let (b_ack, b_event) = tokio::join!(b.next(), harness.listener.accept_one());

    assert!(matches!(
        parse(a_ack.unwrap().unwrap()),
        BridgeToViewerMsg::SampleAck { delivered: true, .. }
    ));
    assert_eq!(a_event.unwrap().event, GestureEvent::Click { x: 100, y: 100 });
    assert!(matches!(
        parse(b_ack.unwrap().unwrap()),
        BridgeToViewerMsg::SampleAck { delivered: true, .. }
    ));
    assert_eq!(b_event.unwrap().event, GestureEvent::DragStart { x: 500, y: 100 });
}
