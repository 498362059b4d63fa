use crate::interface_adapters::protocol::{ClientMessage, FrameDto, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{FrameUpdate, InputEvent, SchedulerStatus};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    FramesClosed,
    StatusClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

pub async fn frame_update_serializer(
    mut frame_rx: broadcast::Receiver<FrameUpdate>,
    frame_bytes_tx: broadcast::Sender<Utf8Bytes>,
    frame_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each frame once and broadcast the shared bytes.
    loop {
        match frame_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::Frame(FrameDto::from(update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize frame");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                // Kept even with no subscribers so `GET /frame` and late viewers see it.
                frame_latest_tx.send_replace(bytes.clone());
                let _ = frame_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "frame serializer lagged; skipping to latest frame");
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("frame channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let conn_id = NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed);
    ws.on_upgrade(move |socket| {
        handle_socket(socket, state).instrument(info_span!("conn", conn_id))
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    // Subscribe before any await so no frame is missed.
    let mut ctx = ConnCtx::new(&state);

    let initial = *ctx.status_rx.borrow_and_update();
    if let Err(e) = send_message(&mut socket, &ServerMessage::Status(initial.into())).await {
        error!(error = ?e, "failed to send initial status");
        return;
    }
    ctx.msgs_out += 1;

    if initial == SchedulerStatus::Stopped {
        let _ = send_close_with_reason(&mut socket, close_code::NORMAL, "simulation stopped").await;
        return;
    }

    info!("viewer connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }

    info!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        lag_recoveries = ctx.lag_recovery_count,
        "viewer disconnected"
    );
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

async fn send_close_with_reason(
    socket: &mut WebSocket,
    code: u16,
    reason: &'static str,
) -> Result<(), NetError> {
    socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await
        .map_err(NetError::Ws)?;
    socket.close().await.map_err(NetError::Ws)
}

struct ConnCtx {
    input_tx: mpsc::Sender<InputEvent>,
    frame_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    frame_latest_rx: watch::Receiver<Utf8Bytes>,
    status_rx: watch::Receiver<SchedulerStatus>,
    // Count lag recovery snapshots sent to this viewer.
    lag_recovery_count: u64,

    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,

    invalid_json: u32,

    last_input_full_log: Instant,
    last_frame_lag_log: Instant,
    last_invalid_input_log: Instant,

    close_frame: Option<CloseFrame>,
}

impl ConnCtx {
    fn new(state: &AppState) -> Self {
        let now = Instant::now() - LOG_THROTTLE;
        Self {
            input_tx: state.input_tx.clone(),
            frame_bytes_rx: state.frame_bytes_tx.subscribe(),
            frame_latest_rx: state.frame_latest_tx.subscribe(),
            status_rx: state.status_tx.subscribe(),
            lag_recovery_count: 0,
            msgs_in: 0,
            msgs_out: 0,
            bytes_in: 0,
            bytes_out: 0,
            invalid_json: 0,
            last_input_full_log: now,
            last_frame_lag_log: now,
            last_invalid_input_log: now,
            close_frame: None,
        }
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

// Drops pointer positions that would poison the craft state.
fn sanitize_input(event: InputEvent) -> Option<InputEvent> {
    match event {
        InputEvent::Pointer { x, y } if !x.is_finite() || !y.is_finite() => None,
        other => Some(other),
    }
}

fn process_input_message(
    input_tx: &mpsc::Sender<InputEvent>,
    event: InputEvent,
    last_input_full_log: &mut Instant,
    last_invalid_input_log: &mut Instant,
) -> Result<LoopControl, NetError> {
    let Some(event) = sanitize_input(event) else {
        if should_log(last_invalid_input_log) {
            warn!("invalid pointer values (NaN/inf); dropping");
        }
        return Ok(LoopControl::Continue);
    };

    match input_tx.try_send(event) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(last_input_full_log) {
                warn!("input channel full; dropping input");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        input_tx,
        frame_bytes_rx,
        frame_latest_rx,
        status_rx,
        lag_recovery_count,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        invalid_json,
        last_input_full_log,
        last_frame_lag_log,
        last_invalid_input_log,
        close_frame,
    } = ctx;

    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming_ws(
                    incoming,
                    input_tx,
                    msgs_in,
                    bytes_in,
                    invalid_json,
                    last_input_full_log,
                    last_invalid_input_log,
                    close_frame,
                ) {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            frame_msg = frame_bytes_rx.recv() => {
                match frame_msg {
                    Ok(bytes) => match forward_frame_bytes(bytes, socket, msgs_out, bytes_out).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(last_frame_lag_log) {
                            warn!(missed = n, "frames lagged; sending latest frame");
                        }

                        let latest = frame_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            false
                        } else {
                            *lag_recovery_count += 1;
                            matches!(
                                forward_frame_bytes(latest, socket, msgs_out, bytes_out).await,
                                LoopControl::Disconnect
                            )
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::FramesClosed);
                        true
                    }
                }
            }

            changed = status_rx.changed() => {
                match changed {
                    Ok(()) => {
                        let status = *status_rx.borrow_and_update();
                        match forward_status(status, socket, msgs_out, bytes_out).await {
                            LoopControl::Disconnect => true,
                            LoopControl::Continue if status == SchedulerStatus::Stopped => {
                                *close_frame = Some(CloseFrame {
                                    code: close_code::NORMAL,
                                    reason: "simulation stopped".into(),
                                });
                                true
                            }
                            LoopControl::Continue => false,
                        }
                    }
                    Err(_) => {
                        fatal = Some(NetError::StatusClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    input_tx: &mpsc::Sender<InputEvent>,
    msgs_in: &mut u64,
    bytes_in: &mut u64,
    invalid_json: &mut u32,
    last_input_full_log: &mut Instant,
    last_invalid_input_log: &mut Instant,
    close_frame: &mut Option<CloseFrame>,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                *msgs_in += 1;
                *bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => process_input_message(
                        input_tx,
                        msg.into(),
                        last_input_full_log,
                        last_invalid_input_log,
                    ),
                    Err(parse_err) => {
                        *invalid_json += 1;
                        if should_log(last_invalid_input_log) {
                            warn!(
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if *invalid_json > MAX_INVALID_JSON {
                            *close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                *close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_frame_bytes(
    frame_msg: Utf8Bytes,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    let bytes_len = frame_msg.len();
    match socket
        .send(Message::Text(frame_msg))
        .await
        .map_err(NetError::Ws)
    {
        Ok(()) => {
            *msgs_out += 1;
            *bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = ?err, "failed to send frame");
            LoopControl::Disconnect
        }
    }
}

async fn forward_status(
    status: SchedulerStatus,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    match send_message(socket, &ServerMessage::Status(status.into())).await {
        Ok(bytes) => {
            *msgs_out += 1;
            *bytes_out += bytes as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = ?err, "failed to send status");
            LoopControl::Disconnect
        }
    }
}
