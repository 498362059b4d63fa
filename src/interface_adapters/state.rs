use crate::use_cases::{FrameUpdate, InputEvent, SchedulerStatus};
use axum::extract::ws::Utf8Bytes;
use tokio::sync::{broadcast, mpsc, watch};

#[derive(Clone)]
pub struct AppState {
    // Viewer input flowing into the frame loop.
    pub input_tx: mpsc::Sender<InputEvent>,
    // Rendered frames produced by the frame loop (use-case structs).
    pub frame_tx: broadcast::Sender<FrameUpdate>,
    // Serialized frames, shared across all connections.
    pub frame_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized frame for lag recovery and `GET /frame`.
    pub frame_latest_tx: watch::Sender<Utf8Bytes>,
    pub status_tx: watch::Sender<SchedulerStatus>,
}
