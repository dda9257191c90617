//! Periodic countdown tick for live displays.
//!
//! # Invariants
//! - The first countdown is delivered immediately after start.
//! - `stop()` (or drop) wakes the tick thread and joins it; no callback runs
//!   after `stop()` returns.

use crate::gate::christmas::{countdown_in, Countdown};
use crate::gate::{parse_timezone, GateError, GateResult};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running countdown tick. Dropping it cancels the tick.
pub struct CountdownTicker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTicker {
    /// Starts ticking against the system clock.
    pub fn start<F>(timezone: &str, interval: Duration, on_tick: F) -> GateResult<Self>
    where
        F: FnMut(Countdown) + Send + 'static,
    {
        Self::start_with_clock(timezone, interval, Utc::now, on_tick)
    }

    /// Starts ticking against a caller-provided clock.
    ///
    /// # Errors
    /// - `InvalidTimezone` before any thread is spawned.
    /// - `TickerUnavailable` when the OS refuses a new thread.
    pub fn start_with_clock<C, F>(
        timezone: &str,
        interval: Duration,
        clock: C,
        mut on_tick: F,
    ) -> GateResult<Self>
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
        F: FnMut(Countdown) + Send + 'static,
    {
        let tz = parse_timezone(timezone)?;
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("countdown-tick".to_string())
            .spawn(move || loop {
                match countdown_in(tz, clock()) {
                    Ok(countdown) => on_tick(countdown),
                    Err(err) => {
                        warn!(
                            "event=countdown_tick module=gate status=error tz={} error={}",
                            tz.name(),
                            err
                        );
                        break;
                    }
                }
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(GateError::TickerUnavailable)?;

        info!(
            "event=countdown_start module=gate status=ok tz={} interval_ms={}",
            tz.name(),
            interval.as_millis()
        );

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Returns whether the tick thread is still scheduled.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels the tick and waits for the thread to exit. Idempotent.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=countdown_stop module=gate status=error reason=tick_panicked");
            }
        }
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
