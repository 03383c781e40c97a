//! Countdown ticker owned by a single view.
//!
//! The ticker recomputes [`time_remaining`] on a fixed period and publishes
//! each value on a watch channel. Whoever creates the ticker owns it: the
//! background task is aborted on [`CountdownTicker::cancel`] or on drop, so
//! a torn-down view never leaves a timer running.

use chrono::{DateTime, Utc};
use log::debug;
use shared::TimeRemaining;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::ramadan_calendar::time_remaining;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Shortest period accepted by [`CountdownTicker::start_with`]
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Source of "now" for the ticker
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct CountdownTicker {
    target: DateTime<Utc>,
    receiver: watch::Receiver<TimeRemaining>,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTicker {
    /// Start ticking once per second against the system clock
    pub fn start(target: DateTime<Utc>) -> Self {
        Self::start_with(target, TICK_PERIOD, Arc::new(Utc::now))
    }

    /// Start ticking with an explicit period and clock
    ///
    /// Must be called from inside a tokio runtime. Periods shorter than
    /// [`MIN_TICK_PERIOD`] are raised to it.
    pub fn start_with(target: DateTime<Utc>, period: Duration, clock: Clock) -> Self {
        let period = period.max(MIN_TICK_PERIOD);
        let initial = time_remaining(&target, &clock());
        let (sender, receiver) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let remaining = time_remaining(&target, &clock());
                if sender.send(remaining).is_err() {
                    // Every receiver is gone, including the owner's
                    break;
                }
                if remaining.is_zero() {
                    debug!("Countdown to {} reached zero", target);
                    break;
                }
            }
        });

        Self {
            target,
            receiver,
            handle: Some(handle),
        }
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Latest published value
    pub fn current(&self) -> TimeRemaining {
        *self.receiver.borrow()
    }

    /// New receiver observing every subsequent tick
    pub fn subscribe(&self) -> watch::Receiver<TimeRemaining> {
        self.receiver.clone()
    }

    /// True while the background task is still ticking
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    /// Stop ticking; subscribers see the channel close
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Countdown to {} cancelled", self.target);
        }
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
