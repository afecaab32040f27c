use chrono::{DateTime, Duration, SubsecRound, Utc};
use parking_lot::Mutex;

/// Default number of shared-credential generations per window
pub const DEFAULT_MAX_USAGE: u32 = 10;

/// Default window length (two hours)
pub const DEFAULT_WINDOW_MINUTES: i64 = 120;

/// Usage of the shared credential inside the current window.
///
/// `window_start` is `None` until the first confirmed success of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageWindow {
    pub count: u32,
    pub window_start: Option<DateTime<Utc>>,
}

impl UsageWindow {
    pub fn new(count: u32, window_start: Option<DateTime<Utc>>) -> Self {
        Self {
            count,
            window_start,
        }
    }

    fn is_stale(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match self.window_start {
            None => true,
            Some(start) => now - start > window,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("shared quota exhausted: requested {requested}, remaining {remaining}")]
pub struct QuotaExceeded {
    pub requested: u32,
    pub remaining: u32,
}

/// Process-wide usage gate for the shared credential.
///
/// Admission (`try_reserve`) and charging (`record_success`) are separate so
/// failed attempts are never charged. Concurrent callers may all pass the
/// admission check before any of them is charged; enforcement is
/// best-effort, and the counter itself never loses an increment.
pub struct QuotaTracker {
    window: Mutex<UsageWindow>,
    max_usage: u32,
    window_duration: Duration,
}

impl QuotaTracker {
    pub fn new(max_usage: u32, window_duration: Duration, initial: UsageWindow) -> Self {
        Self {
            window: Mutex::new(initial),
            max_usage,
            window_duration,
        }
    }

    pub fn max_usage(&self) -> u32 {
        self.max_usage
    }

    pub fn window_duration(&self) -> Duration {
        self.window_duration
    }

    /// Reset a stale window to `(0, None)` and return the current state.
    pub fn check_and_reset(&self, now: DateTime<Utc>) -> UsageWindow {
        self.refresh(now).0
    }

    /// `check_and_reset`, also reporting whether a reset happened.
    pub fn refresh(&self, now: DateTime<Utc>) -> (UsageWindow, bool) {
        let mut window = self.window.lock();
        let reset = self.reset_if_stale(&mut window, now);
        (*window, reset)
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> u32 {
        let window = self.check_and_reset(now);
        self.max_usage.saturating_sub(window.count)
    }

    /// Admission check for `n` generations. Does not charge anything.
    pub fn try_reserve(&self, now: DateTime<Utc>, n: u32) -> Result<(), QuotaExceeded> {
        let window = self.check_and_reset(now);
        if window.count.saturating_add(n) > self.max_usage {
            return Err(QuotaExceeded {
                requested: n,
                remaining: self.max_usage.saturating_sub(window.count),
            });
        }
        Ok(())
    }

    /// Charge one confirmed success and return the updated window. The first
    /// success of a fresh window stamps its start time, at the millisecond
    /// precision it is persisted with.
    pub fn record_success(&self, now: DateTime<Utc>) -> UsageWindow {
        let mut window = self.window.lock();
        self.reset_if_stale(&mut window, now);
        if window.window_start.is_none() {
            window.window_start = Some(now.trunc_subsecs(3));
        }
        window.count = window.count.saturating_add(1);
        *window
    }

    /// When the current window expires, if one is open.
    pub fn resets_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.check_and_reset(now)
            .window_start
            .map(|start| start + self.window_duration)
    }

    fn reset_if_stale(&self, window: &mut UsageWindow, now: DateTime<Utc>) -> bool {
        if !window.is_stale(now, self.window_duration) || *window == UsageWindow::default() {
            return false;
        }
        tracing::debug!(
            previous_count = window.count,
            "Shared usage window expired, resetting"
        );
        *window = UsageWindow::default();
        true
    }
}
