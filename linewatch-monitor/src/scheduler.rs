//! Retry scheduler: the timers that drive probe chains.
//!
//! Three timers start together when the scheduler is started:
//!
//! ```text
//! t=0    initial chain
//! every  steady interval (30s)   chain, unconditionally
//! every  fast interval (5s)      chain, only while disconnected
//! once   grace window (60s)      disarms the fast interval for good
//! ```
//!
//! Each tick's chain runs in its own task, so a slow chain never delays the
//! timers and ticks may overlap.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant};
use tracing::debug;

use crate::chain::FallbackChain;
use crate::config::Timings;
use crate::store::StatusStore;

/// Which timer a tick came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// The one-off chain run at mount.
    Initial,
    /// The always-on steady loop.
    Steady,
    /// The fast loop, armed only during the grace window.
    Fast,
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timer::Initial => "initial",
            Timer::Steady => "steady",
            Timer::Fast => "fast",
        };
        f.write_str(s)
    }
}

/// Runs probe chains on a tiered schedule and commits them to the store.
#[derive(Debug)]
pub struct RetryScheduler {
    chain: FallbackChain,
    store: Arc<StatusStore>,
    timings: Timings,
    fast_armed: AtomicBool,
}

impl RetryScheduler {
    /// Create a scheduler. Nothing runs until [`RetryScheduler::start`].
    pub fn new(chain: FallbackChain, store: Arc<StatusStore>, timings: Timings) -> Self {
        Self {
            chain,
            store,
            timings,
            fast_armed: AtomicBool::new(true),
        }
    }

    /// The chain every tick runs.
    pub fn chain(&self) -> &FallbackChain {
        &self.chain
    }

    /// Run one chain and commit it, regardless of timers.
    pub async fn run_chain(&self) -> bool {
        self.store.begin_check();
        let outcome = self.chain.run().await;
        self.store.commit(outcome)
    }

    /// Handle one timer firing.
    ///
    /// Returns `None` when the timer's policy skipped the tick: a fast tick
    /// after the grace window, or while connected.
    pub async fn tick(&self, timer: Timer) -> Option<bool> {
        if timer == Timer::Fast && (!self.is_fast_armed() || self.store.is_connected()) {
            return None;
        }

        debug!(%timer, "running probe chain");
        Some(self.run_chain().await)
    }

    /// Whether fast ticks are still honoured.
    pub fn is_fast_armed(&self) -> bool {
        self.fast_armed.load(Ordering::Acquire)
    }

    /// End the grace window: fast ticks are ignored from now on.
    pub fn disarm_fast(&self) {
        self.fast_armed.store(false, Ordering::Release);
    }

    /// Start the timers and run the initial chain.
    ///
    /// Returns a handle that stops the timers when stopped or dropped.
    /// Chains already in flight are left to finish.
    pub fn start(self: &Arc<Self>) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let scheduler = Arc::clone(self);
        let timings = self.timings;

        self.fast_armed.store(true, Ordering::Release);

        let task = tokio::spawn(async move {
            let mounted = Instant::now();
            let mut steady = interval_at(mounted + timings.steady_interval, timings.steady_interval);
            let mut fast = interval_at(mounted + timings.fast_interval, timings.fast_interval);
            let grace = sleep_until(mounted + timings.grace_window);
            tokio::pin!(grace);

            let mut grace_pending = true;
            let mut fast_active = true;

            scheduler.spawn_tick(Timer::Initial);

            loop {
                tokio::select! {
                    biased;

                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    () = &mut grace, if grace_pending => {
                        grace_pending = false;
                        fast_active = false;
                        scheduler.disarm_fast();
                        debug!("grace window over, fast retries disarmed");
                    }
                    _ = steady.tick() => scheduler.spawn_tick(Timer::Steady),
                    _ = fast.tick(), if fast_active => scheduler.spawn_tick(Timer::Fast),
                }
            }

            debug!("retry scheduler stopped");
        });

        SchedulerHandle { stop_tx, task }
    }

    fn spawn_tick(self: &Arc<Self>, timer: Timer) {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            scheduler.tick(timer).await;
        });
    }
}

/// Handle for stopping the scheduler.
///
/// Drop this handle to stop the timers, or call `stop()` explicitly.
#[derive(Debug)]
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop all timers.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }

    /// Whether the timer loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
