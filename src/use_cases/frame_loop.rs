use super::render::DrawList;
use super::scheduler::Scheduler;
use super::types::{FrameUpdate, InputEvent, SchedulerStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Drives the scheduler once per frame until quit or shutdown.
///
/// Input events are applied between frames; each rendered frame is broadcast as a
/// [`FrameUpdate`].
pub async fn frame_task(
    mut scheduler: Scheduler,
    mut input_rx: mpsc::Receiver<InputEvent>,
    frame_tx: broadcast::Sender<FrameUpdate>,
    status_tx: watch::Sender<SchedulerStatus>,
    frame_interval: Duration,
    shutdown: Arc<Notify>,
) {
    let mut frame: u64 = 0;
    let started = Instant::now();

    // The interval plays the display refresh; the clock measures real elapsed time.
    let mut interval = tokio::time::interval(frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    status_tx.send_replace(SchedulerStatus::Running);
    info!(frame_interval_ms = frame_interval.as_millis() as u64, "frame loop started");

    loop {
        let frame_time_ms = tokio::select! {
            _ = shutdown.notified() => {
                info!("frame loop shutdown requested");
                break;
            }
            now = interval.tick() => now.duration_since(started).as_secs_f64() * 1000.0,
        };

        while let Ok(ev) = input_rx.try_recv() {
            scheduler.handle_event(ev);
        }

        let mut draw = DrawList::new();
        if scheduler.iter(frame_time_ms, &mut draw) == SchedulerStatus::Stopped {
            status_tx.send_replace(SchedulerStatus::Stopped);
            break;
        }

        frame += 1;
        if frame % 600 == 0 {
            debug!(frame, subscribers = frame_tx.receiver_count(), "frame loop alive");
        }

        let _ = frame_tx.send(FrameUpdate {
            frame,
            commands: draw.take(),
            crafts: scheduler.simulation().snapshots(),
            clock: scheduler.clock_readout(),
        });
    }

    info!(frames = frame, "frame loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::craft::CraftTuning;
    use crate::domain::{KeyBindings, KeyCode, SimulationClock, ToroidalSpace};
    use crate::use_cases::Simulation;

    fn scheduler() -> Scheduler {
        let sim = Simulation::with_default_fleet(
            ToroidalSpace::new(400.0, 400.0),
            CraftTuning::default(),
        );
        Scheduler::new(sim, SimulationClock::default(), KeyBindings::default())
    }

    #[tokio::test]
    async fn when_quit_key_arrives_then_loop_reports_stopped_and_exits() {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (frame_tx, mut frame_rx) = broadcast::channel(64);
        let (status_tx, status_rx) = watch::channel(SchedulerStatus::Running);
        let shutdown = Arc::new(Notify::new());

        let handle = tokio::spawn(frame_task(
            scheduler(),
            input_rx,
            frame_tx,
            status_tx,
            Duration::from_millis(16),
            shutdown,
        ));

        let first = frame_rx.recv().await.expect("first frame");
        assert_eq!(first.frame, 1);
        assert_eq!(first.crafts.len(), 3);

        input_tx
            .send(InputEvent::KeyDown(KeyCode::of('Q')))
            .await
            .expect("loop accepts input");

        handle.await.expect("frame loop joins");
        assert_eq!(*status_rx.borrow(), SchedulerStatus::Stopped);
    }

    #[tokio::test]
    async fn when_shutdown_is_notified_then_loop_exits() {
        let (_input_tx, input_rx) = mpsc::channel(16);
        let (frame_tx, _frame_rx) = broadcast::channel(64);
        let (status_tx, status_rx) = watch::channel(SchedulerStatus::Running);
        let shutdown = Arc::new(Notify::new());

        let handle = tokio::spawn(frame_task(
            scheduler(),
            input_rx,
            frame_tx,
            status_tx,
            Duration::from_millis(16),
            shutdown.clone(),
        ));

        shutdown.notify_one();
        handle.await.expect("frame loop joins");

        assert_eq!(*status_rx.borrow(), SchedulerStatus::Running);
    }

    #[tokio::test]
    async fn when_nobody_watches_status_then_stopped_is_still_recorded() {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (frame_tx, mut frame_rx) = broadcast::channel(64);
        let (status_tx, status_rx) = watch::channel(SchedulerStatus::Running);
        drop(status_rx);
        let observer = status_tx.clone();

        let handle = tokio::spawn(frame_task(
            scheduler(),
            input_rx,
            frame_tx,
            status_tx,
            Duration::from_millis(16),
            Arc::new(Notify::new()),
        ));

        frame_rx.recv().await.expect("first frame");
        input_tx
            .send(InputEvent::KeyDown(KeyCode::of('Q')))
            .await
            .expect("loop accepts input");
        handle.await.expect("frame loop joins");

        // A viewer subscribing now must learn the loop is over.
        assert_eq!(*observer.subscribe().borrow(), SchedulerStatus::Stopped);
    }
}
