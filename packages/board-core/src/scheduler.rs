//! Visibility-aware poll scheduler.
//!
//! Drives when [`ProviderStore::refresh`] runs. Data polling is active only
//! while the consuming surface is in display mode and visible; hiding the
//! surface or switching to admin mode stops it. Every entry into the polling
//! state issues one immediate out-of-band fetch before the fixed interval
//! resumes, so the display is never stale for longer than it was hidden.
//!
//! A separate always-active tick publishes the wall-clock time for the
//! display, independent of data polling. Both tasks are owned here and are
//! aborted deterministically on [`PollScheduler::shutdown`] or drop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::store::ProviderStore;

/// Fixed period between data polls while the display surface is visible.
pub const DATA_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Fixed period of the wall-clock tick.
pub const CLOCK_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Which surface is currently consuming the store.
///
/// The admin surface mutates through confirmed remote calls and never polls;
/// only the public display does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Admin,
    Display,
}

struct SchedulerState {
    mode: Mode,
    surface_visible: bool,
    poll_task: Option<JoinHandle<()>>,
}

/// Owns the poll and clock timers and the transitions between `Stopped` and
/// `Polling`.
pub struct PollScheduler {
    store: Arc<ProviderStore>,
    poll_interval: Duration,
    state: Mutex<SchedulerState>,
    clock_task: JoinHandle<()>,
    clock_rx: watch::Receiver<DateTime<Local>>,
}

impl PollScheduler {
    /// Create a scheduler with the default intervals, starting in admin mode
    /// (stopped). The clock tick starts immediately and runs in every mode.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(store: Arc<ProviderStore>) -> Self {
        Self::with_intervals(store, DATA_POLL_INTERVAL, CLOCK_TICK_INTERVAL)
    }

    pub fn with_intervals(
        store: Arc<ProviderStore>,
        poll_interval: Duration,
        clock_interval: Duration,
    ) -> Self {
        let (clock_tx, clock_rx) = watch::channel(Local::now());
        let clock_task = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(clock_interval);
            loop {
                ticks.tick().await;
                if clock_tx.send(Local::now()).is_err() {
                    break;
                }
            }
        });

        Self {
            store,
            poll_interval,
            state: Mutex::new(SchedulerState {
                mode: Mode::Admin,
                surface_visible: true,
                poll_task: None,
            }),
            clock_task,
            clock_rx,
        }
    }

    /// Receiver for the wall-clock tick. Closes when the scheduler shuts
    /// down.
    pub fn clock(&self) -> watch::Receiver<DateTime<Local>> {
        self.clock_rx.clone()
    }

    /// Switch the consuming surface between admin and display mode.
    pub fn set_mode(&self, mode: Mode) {
        let mut state = self.state.lock().unwrap();
        if state.mode == mode {
            return;
        }
        state.mode = mode;
        self.sync(&mut state);
    }

    /// Report the surface becoming visible or hidden (e.g. backgrounded).
    pub fn set_surface_visible(&self, visible: bool) {
        let mut state = self.state.lock().unwrap();
        if state.surface_visible == visible {
            return;
        }
        state.surface_visible = visible;
        self.sync(&mut state);
    }

    /// Whether the data-poll timer is currently running.
    pub fn is_polling(&self) -> bool {
        self.state.lock().unwrap().poll_task.is_some()
    }

    /// Cancel both timers. No further tick fires after this returns; a
    /// fetch already spawned by an earlier tick may still complete and
    /// update the store (last response wins, as with any overlapping
    /// fetch).
    pub fn shutdown(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(task) = state.poll_task.take() {
            task.abort();
        }
        self.clock_task.abort();
    }

    /// Reconcile the poll task with the desired state: polling iff the
    /// display surface is active and visible.
    fn sync(&self, state: &mut SchedulerState) {
        let should_poll = state.mode == Mode::Display && state.surface_visible;
        if should_poll && state.poll_task.is_none() {
            debug!("poll scheduler entering Polling");
            state.poll_task = Some(self.spawn_poll_task());
        } else if !should_poll {
            if let Some(task) = state.poll_task.take() {
                debug!("poll scheduler entering Stopped");
                task.abort();
            }
        }
    }

    fn spawn_poll_task(&self) -> JoinHandle<()> {
        let store = self.store.clone();
        let period = self.poll_interval;
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            loop {
                // First tick completes immediately: the out-of-band resync
                // on entering Polling.
                ticks.tick().await;
                let store = store.clone();
                // Each fetch runs on its own task so a hung request delays
                // only its own cycle, never the timer. Overlapping fetches
                // are tolerated; last response wins.
                tokio::spawn(async move {
                    if let Err(error) = store.refresh().await {
                        warn!(%error, "scheduled refresh failed");
                    }
                });
            }
        })
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
