//! Background loops: continuous accrual and periodic autosave.
//!
//! Both loops stop cleanly on the shutdown signal — explicit teardown, no
//! dangling timers after the session ends. Remote IO never runs inside
//! either loop, so a slow network cannot stall accrual.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::watch;

use crate::local::LocalStore;
use crate::state::{SessionState, SharedSession};

/// Wall-clock milliseconds since the Unix epoch, for persistence stamps.
/// Elapsed-time math uses `Instant`, never this.
pub fn unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

/// Continuous accrual: each tick advances energy by the monotonic-clock time
/// elapsed since the previous tick. Runs until `shutdown` flips to true.
pub async fn run_accrual_loop(
    session: SharedSession,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // discard the immediate first tick
    let mut last = Instant::now();

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last).as_secs_f64();
                last = now;
                let mut guard = session.lock();
                let SessionState { ref mut game, ref content } = *guard;
                forge_core::advance(game, content, elapsed);
            }
        }
    }
}

/// Periodic autosave: stamps the last-activity timestamp, extracts the lean
/// snapshot, and writes it to the local store. A final write happens on
/// shutdown so a closing session never loses more than one interval.
pub async fn run_autosave_loop(
    session: SharedSession,
    store: LocalStore,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // discard the immediate first tick

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    save_once(&session, &store);
                    break;
                }
            }
            _ = ticker.tick() => {
                save_once(&session, &store);
            }
        }
    }
}

fn save_once(session: &SharedSession, store: &LocalStore) {
    let snapshot = {
        let mut guard = session.lock();
        let now = unix_ms();
        forge_core::touch(&mut guard.game, now);
        guard.snapshot()
    };
    if let Err(error) = store.write(&snapshot) {
        tracing::warn!("autosave failed: {error:#}");
    }
}
