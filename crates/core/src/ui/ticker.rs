//! Rotating status text shown while an analysis is running.
//!
//! A [`StatusTicker`] owns the timer task that advances the message index.
//! The task lives exactly as long as the ticker: dropping it (or calling
//! [`StatusTicker::stop`]) aborts the task, whatever the reason for leaving
//! the analyzing phase.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// How long each status message stays on screen.
pub const STATUS_PERIOD: Duration = Duration::from_secs(2);

pub struct StatusTicker {
    messages: &'static [&'static str],
    index: watch::Receiver<usize>,
    task: JoinHandle<()>,
}

impl StatusTicker {
    /// Starts cycling through `messages`, beginning at index 0.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(messages: &'static [&'static str], period: Duration) -> Self {
        let (tx, rx) = watch::channel(0usize);
        let len = messages.len().max(1);
        let first_tick = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut ticks = interval_at(first_tick, period);
            let mut index = 0;
            loop {
                ticks.tick().await;
                index = (index + 1) % len;
                if tx.send(index).is_err() {
                    break;
                }
            }
        });

        Self {
            messages,
            index: rx,
            task,
        }
    }

    /// Index of the message currently shown.
    pub fn index(&self) -> usize {
        *self.index.borrow()
    }

    /// The message currently shown, if the list is non-empty.
    pub fn current(&self) -> Option<&'static str> {
        self.messages.get(self.index()).copied()
    }

    /// Returns a receiver that is notified whenever the message changes.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index.clone()
    }

    /// Stops the timer; equivalent to dropping the ticker.
    pub fn stop(self) {
        drop(self);
    }

    /// Whether the timer task is still alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for StatusTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGES: &[&str] = &["one", "two", "three", "four", "five"];

    // Offsets the checks from the tick deadlines so the ticker always runs
    // before the assertion.
    const EPSILON: Duration = Duration::from_millis(1);

    #[tokio::test(start_paused = true)]
    async fn advances_every_period_and_wraps() {
        let ticker = StatusTicker::start(MESSAGES, STATUS_PERIOD);
        assert_eq!(ticker.index(), 0);
        assert_eq!(ticker.current(), Some("one"));

        tokio::time::sleep(EPSILON).await;
        for expected in [1, 2, 3, 4, 0, 1] {
            tokio::time::sleep(STATUS_PERIOD).await;
            assert_eq!(ticker.index(), expected);
        }
        assert_eq!(ticker.current(), Some("two"));
        assert!(ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_advance_before_the_first_period() {
        let ticker = StatusTicker::start(MESSAGES, STATUS_PERIOD);
        tokio::time::sleep(STATUS_PERIOD - EPSILON).await;
        assert_eq!(ticker.index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_stops_the_timer() {
        let ticker = StatusTicker::start(MESSAGES, STATUS_PERIOD);
        let mut updates = ticker.subscribe();

        tokio::time::sleep(STATUS_PERIOD + EPSILON).await;
        assert_eq!(*updates.borrow_and_update(), 1);

        ticker.stop();
        tokio::time::sleep(STATUS_PERIOD * 5).await;

        assert_eq!(*updates.borrow(), 1);
        assert!(updates.has_changed().is_err());
    }
}
