// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Timer queue for setTimeout/setInterval management
//!
//! Timers only record what should run and when. Nothing executes until the
//! runtime's event loop pulls ready entries with `take_ready`, so callbacks
//! never overlap each other.

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use tokio::time::Instant;

use crate::error::{Error, Result};

/// Timer identifier handed back by `set_timeout`/`set_interval`
pub type TimerId = u32;

/// Timer callback type
///
/// `Fn` rather than `FnOnce` so interval timers can run it repeatedly.
pub type TimerTask = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Shortest interval accepted, keeps a zero interval from spinning the loop
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Timer entry in the queue
pub struct TimerEntry {
    /// Unique timer ID
    pub id: TimerId,
    /// Label used when reporting failures
    pub label: String,
    /// When the timer should fire
    pub fire_at: Instant,
    /// The callback to run
    pub task: TimerTask,
    /// Whether this is an interval (repeating)
    pub is_interval: bool,
    /// Interval duration (for repeating timers)
    pub interval: Duration,
}

impl std::fmt::Debug for TimerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEntry")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("fire_at", &self.fire_at)
            .field("is_interval", &self.is_interval)
            .field("interval", &self.interval)
            .finish()
    }
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.fire_at == other.fire_at
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse order for min-heap: earliest first, then registration order
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Timer queue for managing setTimeout/setInterval
pub struct TimerQueue {
    /// Pending timers (min-heap by fire_at)
    timers: RwLock<BinaryHeap<TimerEntry>>,
    /// Next timer ID
    next_id: AtomicU32,
    /// Maximum timers to prevent runaway scheduling
    max_timers: usize,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    /// Create a new timer queue
    pub fn new() -> Self {
        Self::with_max_timers(1000)
    }

    /// Create with custom max timers limit
    pub fn with_max_timers(max: usize) -> Self {
        Self {
            timers: RwLock::new(BinaryHeap::new()),
            next_id: AtomicU32::new(1),
            max_timers: max,
        }
    }

    /// Schedule a one-shot task after `delay`
    pub fn set_timeout(
        &self,
        label: impl Into<String>,
        delay: Duration,
        task: TimerTask,
    ) -> Result<TimerId> {
        self.push(label.into(), delay, task, None)
    }

    /// Schedule a task every `interval`, first run one interval from now
    pub fn set_interval(
        &self,
        label: impl Into<String>,
        interval: Duration,
        task: TimerTask,
    ) -> Result<TimerId> {
        let interval = interval.max(MIN_INTERVAL);
        self.push(label.into(), interval, task, Some(interval))
    }

    fn push(
        &self,
        label: String,
        delay: Duration,
        task: TimerTask,
        interval: Option<Duration>,
    ) -> Result<TimerId> {
        let mut timers = self.timers.write();
        if timers.len() >= self.max_timers {
            return Err(Error::timer(format!(
                "timer limit of {} reached, refusing '{}'",
                self.max_timers, label
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(id, %label, ?delay, "timer scheduled");
        timers.push(TimerEntry {
            id,
            label,
            fire_at: Instant::now() + delay,
            task,
            is_interval: interval.is_some(),
            interval: interval.unwrap_or_default(),
        });

        Ok(id)
    }

    /// Cancel a timer (setTimeout or setInterval)
    ///
    /// Unknown or already fired IDs are ignored.
    pub fn clear_timer(&self, id: TimerId) {
        let mut timers = self.timers.write();
        let before = timers.len();
        timers.retain(|t| t.id != id);
        if timers.len() < before {
            tracing::trace!(id, "timer cleared");
        }
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    /// Check if any one-shot timers are pending
    ///
    /// Intervals never drain on their own, so they don't count here.
    pub fn has_pending_timeouts(&self) -> bool {
        self.timers.read().iter().any(|t| !t.is_interval)
    }

    /// Get number of pending timers
    pub fn pending_count(&self) -> usize {
        self.timers.read().len()
    }

    /// Labels of pending timers, soonest first
    pub fn pending_labels(&self) -> Vec<String> {
        let timers = self.timers.read();

        let mut pending: Vec<&TimerEntry> = timers.iter().collect();
        pending.sort_by(|a, b| b.cmp(a));
        pending.into_iter().map(|t| t.label.clone()).collect()
    }

    /// Remove and return timers due at `now`, in firing order
    ///
    /// Interval timers are re-armed one interval after their due time.
    pub fn take_ready(&self, now: Instant) -> Vec<TimerEntry> {
        let mut timers = self.timers.write();
        let mut ready = Vec::new();

        while let Some(top) = timers.peek() {
            if top.fire_at > now {
                break;
            }
            let Some(entry) = timers.pop() else { break };

            if entry.is_interval {
                // A late loop skips missed ticks instead of replaying them
                let next = entry.fire_at + entry.interval;
                timers.push(TimerEntry {
                    id: entry.id,
                    label: entry.label.clone(),
                    fire_at: if next > now { next } else { now + entry.interval },
                    task: entry.task.clone(),
                    is_interval: true,
                    interval: entry.interval,
                });
            }
            ready.push(entry);
        }

        ready
    }

    /// Clear all timers
    pub fn clear_all(&self) {
        self.timers.write().clear();
    }

    /// Wait duration until next timer fires
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = Instant::now();

        self.timers
            .read()
            .peek()
            .map(|t| t.fire_at.saturating_duration_since(now))
    }
}
