//! Periodic draft writing
//!
//! The scheduler is a repeating deadline. Each tick writes a draft for
//! every dirty document; the tick itself runs synchronously on the owning
//! thread, so ticks cannot overlap and missed ticks collapse into one.

use crate::document::Document;
use crate::drafts::DraftStore;
use chrono::{DateTime, Local};
use log::{debug, warn};
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler
// ─────────────────────────────────────────────────────────────────────────────

/// Repeating autosave timer.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    enabled: bool,
    interval: Duration,
    next_tick: Option<Instant>,
}

impl AutosaveScheduler {
    /// Create a scheduler. The first tick is due one interval after `now`.
    pub fn new(enabled: bool, interval: Duration, now: Instant) -> Self {
        Self {
            enabled,
            interval,
            next_tick: enabled.then(|| now + interval),
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Enable or disable future ticks. Existing drafts are not touched.
    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        self.enabled = enabled;
        self.next_tick = enabled.then(|| now + self.interval);
    }

    /// Change the interval, restarting the current period from `now`.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        if self.enabled {
            self.next_tick = Some(now + interval);
        }
    }

    /// Stop ticking until re-enabled.
    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    /// Whether a tick is due. The next tick is scheduled one interval after
    /// `now`, so any backlog of missed ticks fires only once.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(due) if self.enabled && now >= due => {
                self.next_tick = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tick
// ─────────────────────────────────────────────────────────────────────────────

/// What one autosave tick achieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutosaveReport {
    pub written: usize,
    pub failed: usize,
}

impl AutosaveReport {
    /// Aggregated status line, or `None` when nothing was attempted.
    pub fn status(&self, at: DateTime<Local>) -> Option<String> {
        let time = at.format("%H:%M:%S");
        let written = match self.written {
            0 => None,
            1 => Some(format!("Draft saved at {}", time)),
            n => Some(format!("{} drafts saved at {}", n, time)),
        };
        let failed = match self.failed {
            0 => None,
            1 => Some("1 draft failed".to_string()),
            n => Some(format!("{} drafts failed", n)),
        };
        match (written, failed) {
            (Some(written), Some(failed)) => Some(format!("{}, {}", written, failed)),
            (written, failed) => written.or(failed),
        }
    }
}

/// Write a draft for every dirty document.
///
/// A failure for one document is logged and the rest are still attempted.
pub fn write_drafts<'a>(
    documents: impl IntoIterator<Item = &'a mut Document>,
    drafts: &DraftStore,
) -> AutosaveReport {
    let mut report = AutosaveReport::default();
    for document in documents.into_iter().filter(|d| d.is_dirty()) {
        match drafts.write(document) {
            Ok(_) => {
                document.mark_auto_saved();
                report.written += 1;
            }
            Err(e) => {
                warn!("Autosave skipped {}: {}", document.display_path(), e);
                report.failed += 1;
            }
        }
    }
    debug!(
        "Autosave tick: {} written, {} failed",
        report.written, report.failed
    );
    report
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
