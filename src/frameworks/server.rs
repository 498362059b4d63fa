// Framework bootstrap for the simulation server runtime.

use crate::domain::tuning::craft::CraftTuning;
use crate::domain::{KeyBindings, SimulationClock, ToroidalSpace};
use crate::frameworks::config;
use crate::interface_adapters::http::latest_frame_handler;
use crate::interface_adapters::net::{frame_update_serializer, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::frame_loop::frame_task;
use crate::use_cases::{FrameUpdate, InputEvent, Scheduler, SchedulerStatus, Simulation};

use axum::{Router, extract::ws::Utf8Bytes, routing::get};
use std::future::Future;
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::{Notify, broadcast, mpsc, watch};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves until the process exits.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_until(listener, std::future::pending()).await
}

/// Serves until `signal` resolves, then stops the frame loop.
pub async fn run_until<F>(listener: tokio::net::TcpListener, signal: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr()?;
    let shutdown = Arc::new(Notify::new());
    let state = build_state(shutdown.clone());

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/frame", get(latest_frame_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        });

    shutdown.notify_one();
    served
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run_until(listener, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown signal received");
    })
    .await
}

fn build_state(shutdown: Arc<Notify>) -> Arc<AppState> {
    let (width, height) = config::plane_size();
    let tuning = CraftTuning {
        radius: config::craft_radius(),
        ..CraftTuning::default()
    };
    let frame_interval = config::frame_interval();
    tracing::debug!(
        width,
        height,
        radius = tuning.radius,
        frame_interval_ms = frame_interval.as_millis() as u64,
        "simulation configured"
    );

    let simulation = Simulation::with_default_fleet(ToroidalSpace::new(width, height), tuning);
    let scheduler = Scheduler::new(
        simulation,
        SimulationClock::default(),
        KeyBindings::default(),
    );

    // input_tx/rx: all viewer input goes to the single frame loop.
    let (input_tx, input_rx) = mpsc::channel::<InputEvent>(config::INPUT_CHANNEL_CAPACITY);
    let (frame_tx, _frame_rx) = broadcast::channel::<FrameUpdate>(config::FRAME_BROADCAST_CAPACITY);
    let (frame_bytes_tx, _frame_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(config::FRAME_BROADCAST_CAPACITY);
    let (frame_latest_tx, _frame_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
    let (status_tx, _status_rx) = watch::channel(SchedulerStatus::Running);

    let state = Arc::new(AppState {
        input_tx,
        frame_tx,
        frame_bytes_tx,
        frame_latest_tx,
        status_tx,
    });

    // Subscribe the serializer before the loop can publish its first frame.
    tokio::spawn(frame_update_serializer(
        state.frame_tx.subscribe(),
        state.frame_bytes_tx.clone(),
        state.frame_latest_tx.clone(),
    ));

    tokio::spawn(frame_task(
        scheduler,
        input_rx,
        state.frame_tx.clone(),
        state.status_tx.clone(),
        frame_interval,
        shutdown,
    ));

    state
}
