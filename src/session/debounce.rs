//! Single-slot debounce timer
//!
//! Every event restarts the quiet period; only the expiry of a quiet
//! period fires. The timer is a deadline polled with an explicit `now`, so
//! it runs on whatever thread owns it and never fires on its own.

use std::time::{Duration, Instant};

/// Collapses bursts of events into one firing after `delay` of quiet.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Change the quiet period. A pending deadline keeps its old expiry.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Cancel any pending deadline and start a new one at `now + delay`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fire if the deadline has passed. Fires at most once per schedule.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_idle_never_fires() {
        let mut debouncer = Debouncer::new(DELAY);
        assert!(!debouncer.poll(Instant::now() + Duration::from_secs(10)));
        assert!(debouncer.next_deadline().is_none());
    }

    #[test]
    fn test_fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);

        assert!(!debouncer.poll(start + Duration::from_millis(299)));
        assert!(debouncer.poll(start + DELAY));
        assert!(!debouncer.poll(start + Duration::from_secs(5)));
        assert!(debouncer.next_deadline().is_none());
    }

    #[test]
    fn test_burst_collapses_to_one_firing() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        let mut fired = 0;

        for step in 0..10u64 {
            let t = start + Duration::from_millis(step * 100);
            debouncer.schedule(t);
            if debouncer.poll(t + Duration::from_millis(50)) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);

        let last_event = start + Duration::from_millis(900);
        assert_eq!(debouncer.next_deadline(), Some(last_event + DELAY));
        if debouncer.poll(last_event + DELAY) {
            fired += 1;
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.poll(start + DELAY));
    }

    #[test]
    fn test_set_delay_applies_to_next_schedule() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.set_delay(Duration::from_millis(50));
        debouncer.schedule(start);
        assert!(debouncer.poll(start + Duration::from_millis(50)));
    }
}
