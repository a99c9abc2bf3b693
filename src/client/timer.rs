// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Elapsed-time tracking for an active workout session.
//!
//! Only time spent with the session visible is counted. The timer is
//! driven by explicit events (tick, hidden, visible, unload, stop) that
//! each carry the current wall-clock time, so it never reads a clock
//! itself. [`spawn_ticker`] drives the periodic tick from a tokio task.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Interval between displayed-value refreshes.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Wall-clock source used by the ticker.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Clock backed by the system time.
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Visible-time accumulator for one session.
#[derive(Debug, Clone)]
pub struct ElapsedTimer {
    session_started_at: DateTime<Utc>,
    /// Start of the current visible interval; `None` while hidden
    running_since: Option<DateTime<Utc>>,
    /// Sum of completed visible intervals
    accumulated_ms: i64,
    /// Largest value reported so far
    displayed_secs: u64,
    stopped: bool,
}

impl ElapsedTimer {
    /// Start a session at `now`.
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            session_started_at: now,
            running_since: Some(now),
            accumulated_ms: 0,
            displayed_secs: 0,
            stopped: false,
        }
    }

    pub fn session_started_at(&self) -> DateTime<Utc> {
        self.session_started_at
    }

    /// Whether time is currently being counted.
    pub fn is_running(&self) -> bool {
        !self.stopped && self.running_since.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Length of the open interval. A clock that moved backwards counts as 0.
    fn open_interval_ms(&self, now: DateTime<Utc>) -> i64 {
        self.running_since
            .map(|since| (now - since).num_milliseconds().max(0))
            .unwrap_or(0)
    }

    /// Close the open interval into the accumulator.
    fn fold(&mut self, now: DateTime<Utc>) {
        self.accumulated_ms += self.open_interval_ms(now);
    }

    /// Elapsed whole seconds as of `now`, never less than a value already
    /// reported.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        if self.stopped {
            return self.displayed_secs;
        }
        let total_ms = self.accumulated_ms + self.open_interval_ms(now);
        let secs = u64::try_from(total_ms / 1000).unwrap_or(0);
        secs.max(self.displayed_secs)
    }

    /// Periodic refresh. Returns the value to display.
    pub fn tick(&mut self, now: DateTime<Utc>) -> u64 {
        self.displayed_secs = self.elapsed_secs(now);
        self.displayed_secs
    }

    /// The session went to the background: stop counting.
    pub fn on_hidden(&mut self, now: DateTime<Utc>) {
        if self.stopped {
            return;
        }
        if self.running_since.is_some() {
            self.displayed_secs = self.elapsed_secs(now);
            self.fold(now);
            self.running_since = None;
        }
    }

    /// The session came back to the foreground: resume counting.
    pub fn on_visible(&mut self, now: DateTime<Utc>) {
        if !self.stopped && self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// The page is being unloaded: flush the open interval and keep
    /// counting from `now`.
    pub fn on_unload(&mut self, now: DateTime<Utc>) {
        if self.stopped {
            return;
        }
        if self.running_since.is_some() {
            self.displayed_secs = self.elapsed_secs(now);
            self.fold(now);
            self.running_since = Some(now);
        }
    }

    /// End the session. Later events are ignored. Returns the final
    /// elapsed seconds.
    pub fn stop(&mut self, now: DateTime<Utc>) -> u64 {
        if !self.stopped {
            self.displayed_secs = self.elapsed_secs(now);
            self.fold(now);
            self.running_since = None;
            self.stopped = true;
        }
        self.displayed_secs
    }
}

/// Format seconds as `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

fn lock(timer: &Mutex<ElapsedTimer>) -> std::sync::MutexGuard<'_, ElapsedTimer> {
    timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to the background tick task. Dropping it stops the task.
pub struct Ticker {
    handle: JoinHandle<()>,
    elapsed: watch::Receiver<u64>,
}

impl Ticker {
    /// Receiver for the displayed elapsed seconds.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.elapsed.clone()
    }

    /// Latest published value.
    pub fn current(&self) -> u64 {
        *self.elapsed.borrow()
    }

    /// Cancel the tick task.
    pub fn stop(self) {
        // Drop aborts the task.
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn a task that ticks `timer` once per [`TICK_INTERVAL`] and publishes
/// the displayed value. The task ends when the timer is stopped or the
/// returned [`Ticker`] is dropped.
pub fn spawn_ticker(timer: Arc<Mutex<ElapsedTimer>>, clock: Clock) -> Ticker {
    let initial = lock(&timer).elapsed_secs(clock());
    let (tx, rx) = watch::channel(initial);

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let secs = {
                let mut timer = lock(&timer);
                if timer.is_stopped() {
                    break;
                }
                timer.tick(clock())
            };

            tx.send_if_modified(|current| {
                let changed = *current != secs;
                *current = secs;
                changed
            });
        }
    });

    Ticker {
        handle,
        elapsed: rx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 7, 0, 0).unwrap() + chrono::Duration::seconds(secs)
    }

    fn at_ms(ms: i64) -> DateTime<Utc> {
        at(0) + chrono::Duration::milliseconds(ms)
    }

    #[test]
    fn test_counts_visible_time() {
        let mut timer = ElapsedTimer::start(at(0));
        assert_eq!(timer.tick(at(0)), 0);
        assert_eq!(timer.tick(at(1)), 1);
        assert_eq!(timer.tick(at_ms(2999)), 2);
        assert_eq!(timer.tick(at(75)), 75);
    }

    #[test]
    fn test_hidden_time_is_not_counted() {
        // 5 s visible, 10 s hidden, 3 s visible
        let mut timer = ElapsedTimer::start(at(0));
        timer.on_hidden(at(5));
        assert!(!timer.is_running());
        assert_eq!(timer.tick(at(15)), 5);

        timer.on_visible(at(15));
        assert_eq!(timer.tick(at(18)), 8);
        assert_eq!(timer.stop(at(18)), 8);
    }

    #[test]
    fn test_repeated_visibility_events_are_idempotent() {
        let mut timer = ElapsedTimer::start(at(0));
        timer.on_visible(at(2));
        timer.on_hidden(at(4));
        timer.on_hidden(at(6));
        timer.on_visible(at(10));
        timer.on_visible(at(12));

        assert_eq!(timer.tick(at(11)), 5);
    }

    #[test]
    fn test_unload_flushes_without_double_counting() {
        let mut timer = ElapsedTimer::start(at(0));
        timer.on_unload(at(4));
        assert!(timer.is_running());
        timer.on_unload(at(6));
        assert_eq!(timer.tick(at(10)), 10);
    }

    #[test]
    fn test_clock_regression_never_decreases_elapsed() {
        let mut timer = ElapsedTimer::start(at(0));
        assert_eq!(timer.tick(at(30)), 30);
        assert_eq!(timer.tick(at(10)), 30);

        // Clock jumps backwards across a hide/show cycle
        timer.on_hidden(at(5));
        timer.on_visible(at(5));
        assert_eq!(timer.tick(at(1)), 30);
    }

    #[test]
    fn test_events_after_stop_are_ignored() {
        let mut timer = ElapsedTimer::start(at(0));
        assert_eq!(timer.stop(at(12)), 12);

        timer.on_visible(at(20));
        timer.on_unload(at(25));
        assert!(!timer.is_running());
        assert_eq!(timer.tick(at(40)), 12);
        assert_eq!(timer.stop(at(50)), 12);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(65), "1:05");
        assert_eq!(format_elapsed(3599), "59:59");
        assert_eq!(format_elapsed(3600), "1:00:00");
        assert_eq!(format_elapsed(3725), "1:02:05");
    }

    /// Clock that follows tokio's (pausable) time.
    fn tokio_clock() -> Clock {
        let base = tokio::time::Instant::now();
        let start = at(0);
        Arc::new(move || {
            start
                + chrono::Duration::from_std(base.elapsed())
                    .unwrap_or_else(|_| chrono::Duration::zero())
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_publishes_elapsed_seconds() {
        let clock = tokio_clock();
        let timer = Arc::new(Mutex::new(ElapsedTimer::start(clock())));
        let ticker = spawn_ticker(timer.clone(), clock.clone());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(ticker.current(), 3);

        lock(&timer).on_hidden(clock());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticker.current(), 3);

        lock(&timer).on_visible(clock());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(ticker.current(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_ticker_cancels_task() {
        let clock = tokio_clock();
        let timer = Arc::new(Mutex::new(ElapsedTimer::start(clock())));
        let ticker = spawn_ticker(timer, clock);

        let mut rx = ticker.subscribe();
        rx.borrow_and_update();
        drop(ticker);

        // The sender lives in the task; it closes once the task is aborted.
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_ends_when_timer_stops() {
        let clock = tokio_clock();
        let timer = Arc::new(Mutex::new(ElapsedTimer::start(clock())));
        let ticker = spawn_ticker(timer.clone(), clock.clone());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(lock(&timer).stop(clock()), 1);

        let mut rx = ticker.subscribe();
        rx.borrow_and_update();
        assert!(rx.changed().await.is_err());
    }
}
