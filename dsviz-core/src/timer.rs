//! Clock-driven helpers for auto-clearing notices and countdowns.
//!
//! Nothing here owns a clock. Callers pass `now` in, which keeps every
//! game transition deterministic under test and lets the TUI loop drive
//! all timers from a single `Instant::now()` per frame.

use std::time::{Duration, Instant};

/// A value that disappears once its deadline passes.
///
/// Setting a new value replaces both the value and the deadline, so an
/// older notice can never clear a newer one.
#[derive(Debug, Clone)]
pub struct Notice<T> {
    slot: Option<(T, Instant)>,
    ttl: Duration,
}

impl<T> Notice<T> {
    /// Create an empty notice whose values live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    /// Show `value` until `now + ttl`, superseding whatever was shown
    pub fn show(&mut self, value: T, now: Instant) {
        self.slot = Some((value, now + self.ttl));
    }

    /// Drop the current value immediately
    pub fn dismiss(&mut self) {
        self.slot = None;
    }

    /// Clear the value if its deadline has passed. Returns true if it expired.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.slot {
            Some((_, deadline)) if now >= *deadline => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }

    /// Current value, if any
    pub fn get(&self) -> Option<&T> {
        self.slot.as_ref().map(|(value, _)| value)
    }

    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }
}

/// Fixed-period repeating timer (the array game's one-second countdown).
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Start (or restart) the interval; the first tick fires one period from `now`
    pub fn arm(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// Number of ticks that elapsed up to `now`, advancing the schedule.
    ///
    /// A stalled frame yields several ticks at once rather than skipping them.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        let mut ticks = 0;
        while now >= next {
            ticks += 1;
            next += self.period;
        }
        self.next = Some(next);
        ticks
    }
}

/// A one-shot deadline carrying a payload (the maze's pending move).
#[derive(Debug, Clone)]
pub struct Delayed<T> {
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T> Delayed<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: None,
            delay,
        }
    }

    /// Schedule `value` for `now + delay`. Refused while another is pending.
    pub fn schedule(&mut self, value: T, now: Instant) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some((value, now + self.delay));
        true
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    /// Take the payload once its deadline is reached
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now >= *at => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_expires_after_ttl() {
        let t0 = Instant::now();
        let mut notice = Notice::new(Duration::from_secs(5));
        notice.show("collision", t0);

        assert!(!notice.expire(t0 + Duration::from_secs(4)));
        assert_eq!(notice.get(), Some(&"collision"));
        assert!(notice.expire(t0 + Duration::from_secs(5)));
        assert!(notice.get().is_none());
    }

    #[test]
    fn newer_notice_keeps_its_own_deadline() {
        let t0 = Instant::now();
        let mut notice = Notice::new(Duration::from_secs(2));
        notice.show(1, t0);
        notice.show(2, t0 + Duration::from_secs(1));

        // the first deadline passes without clearing the second value
        assert!(!notice.expire(t0 + Duration::from_secs(2)));
        assert_eq!(notice.get(), Some(&2));
        assert!(notice.expire(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn interval_counts_missed_ticks() {
        let t0 = Instant::now();
        let mut interval = Interval::new(Duration::from_secs(1));
        assert_eq!(interval.due(t0 + Duration::from_secs(10)), 0);

        interval.arm(t0);
        assert_eq!(interval.due(t0 + Duration::from_millis(999)), 0);
        assert_eq!(interval.due(t0 + Duration::from_millis(3500)), 3);
        assert_eq!(interval.due(t0 + Duration::from_millis(3900)), 0);
        assert_eq!(interval.due(t0 + Duration::from_secs(4)), 1);

        interval.cancel();
        assert_eq!(interval.due(t0 + Duration::from_secs(60)), 0);
    }

    #[test]
    fn delayed_refuses_while_pending() {
        let t0 = Instant::now();
        let mut delayed = Delayed::new(Duration::from_millis(500));
        assert!(delayed.schedule('a', t0));
        assert!(!delayed.schedule('b', t0));

        assert_eq!(delayed.take_due(t0 + Duration::from_millis(499)), None);
        assert_eq!(delayed.take_due(t0 + Duration::from_millis(500)), Some('a'));
        assert!(!delayed.is_pending());
        assert!(delayed.schedule('b', t0));
    }
}
