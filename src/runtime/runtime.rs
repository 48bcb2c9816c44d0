// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Extension runtime implementation

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;
use url::Url;

use super::config::{IdleConfig, RuntimeConfig};
use super::console::Console;
use super::timers::{TimerId, TimerQueue, TimerTask};
use crate::error::{Error, Result};

/// A failure nobody awaited
///
/// The equivalent of an unhandled promise rejection: errors escaping the
/// bootstrap or a timer callback are parked here instead of being returned.
#[derive(Debug, Clone)]
pub struct UnhandledFailure {
    /// What was running (bootstrap, timer label)
    pub source: String,
    /// The error itself
    pub error: Arc<Error>,
}

/// Result of waiting for idle
#[derive(Debug, Clone)]
pub struct IdleResult {
    /// Whether we reached idle state
    pub is_idle: bool,
    /// Number of timers executed
    pub timers_executed: usize,
    /// Total wait time
    pub wait_time: Duration,
    /// Whether we hit the timeout
    pub timed_out: bool,
}

/// Host runtime an injected script runs inside
///
/// Cheap to clone; clones share the console, timers and failure log.
#[derive(Clone)]
pub struct ExtensionRuntime {
    config: Arc<RuntimeConfig>,
    console: Console,
    timers: Arc<TimerQueue>,
    unhandled: Arc<RwLock<Vec<UnhandledFailure>>>,
}

impl ExtensionRuntime {
    /// Create a new runtime
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            console: Console::new(config.log_console),
            timers: Arc::new(TimerQueue::with_max_timers(config.max_timers)),
            unhandled: Arc::new(RwLock::new(Vec::new())),
            config: Arc::new(config),
        }
    }

    /// Runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Extension base URL
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Resolve a packaged script name to an absolute URL
    ///
    /// Only addresses inside the extension base are resolvable.
    pub fn get_url(&self, relative: &str) -> Result<Url> {
        if relative.trim().is_empty() {
            return Err(Error::resolution(relative, "empty script name"));
        }

        let base = &self.config.base_url;
        let url = base
            .join(relative)
            .map_err(|e| Error::resolution(relative, e.to_string()))?;

        let same_origin = url.scheme() == base.scheme()
            && url.host_str() == base.host_str()
            && url.port() == base.port();
        if !same_origin || !url.path().starts_with(base.path()) {
            return Err(Error::resolution(
                relative,
                format!("{} is outside {}", url, base),
            ));
        }

        Ok(url)
    }

    /// The runtime console
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// The runtime timer queue
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Schedule a one-shot task
    pub fn set_timeout(
        &self,
        label: impl Into<String>,
        delay: Duration,
        task: TimerTask,
    ) -> Result<TimerId> {
        self.timers.set_timeout(label, delay, task)
    }

    /// Schedule a repeating task
    pub fn set_interval(
        &self,
        label: impl Into<String>,
        interval: Duration,
        task: TimerTask,
    ) -> Result<TimerId> {
        self.timers.set_interval(label, interval, task)
    }

    /// Cancel a timer
    pub fn clear_timer(&self, id: TimerId) {
        self.timers.clear_timer(id);
    }

    /// Record a failure that has no awaiting caller
    pub fn report_unhandled(&self, source: impl Into<String>, error: Error) {
        let source = source.into();
        tracing::error!(%source, %error, "unhandled failure");
        self.console
            .error(format!("Uncaught (in {}) {}", source, error));
        self.unhandled.write().push(UnhandledFailure {
            source,
            error: Arc::new(error),
        });
    }

    /// Failures reported so far
    pub fn unhandled(&self) -> Vec<UnhandledFailure> {
        self.unhandled.read().clone()
    }

    /// Run every timer that is due now, in firing order
    pub async fn run_ready(&self) -> usize {
        let ready = self.timers.take_ready(Instant::now());
        let count = ready.len();

        for entry in ready {
            tracing::debug!(id = entry.id, label = %entry.label, "timer fired");
            if let Err(e) = (entry.task)().await {
                self.report_unhandled(entry.label, e);
            }
        }

        count
    }

    /// Drive the event loop for `duration`
    ///
    /// Returns the number of timer callbacks executed. The clock always ends
    /// at the deadline so consecutive calls add up.
    pub async fn run_for(&self, duration: Duration) -> usize {
        let deadline = Instant::now() + duration;
        let mut executed = 0;

        while let Some(wait) = self.timers.time_until_next() {
            if Instant::now() + wait > deadline {
                break;
            }
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
            executed += self.run_ready().await;
        }

        tokio::time::sleep_until(deadline).await;
        executed
    }

    /// Run until no one-shot timers remain
    pub async fn wait_for_idle(&self, config: IdleConfig) -> IdleResult {
        let start = Instant::now();
        let deadline = start + config.timeout;
        let mut executed = 0;

        loop {
            if !self.timers.has_pending_timeouts() {
                return IdleResult {
                    is_idle: true,
                    timers_executed: executed,
                    wait_time: start.elapsed(),
                    timed_out: false,
                };
            }

            let wait = self.timers.time_until_next().unwrap_or_default();
            if Instant::now() + wait > deadline || executed >= config.max_timer_executions {
                let timed_out = executed < config.max_timer_executions;
                if timed_out {
                    tokio::time::sleep_until(deadline).await;
                }
                return IdleResult {
                    is_idle: false,
                    timers_executed: executed,
                    wait_time: start.elapsed(),
                    timed_out,
                };
            }

            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
            executed += self.run_ready().await;
        }
    }
}

impl Default for ExtensionRuntime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl std::fmt::Debug for ExtensionRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRuntime")
            .field("base_url", &self.config.base_url.as_str())
            .field("pending_timers", &self.timers.pending_count())
            .field("unhandled", &self.unhandled.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;

    fn quiet_runtime() -> ExtensionRuntime {
        ExtensionRuntime::new(RuntimeConfig::new().log_console(false))
    }

    fn counting_task(counter: Arc<AtomicUsize>) -> TimerTask {
        Arc::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<(), Error>(())
            }
            .boxed()
        })
    }

    #[test]
    fn test_get_url() {
        let runtime = quiet_runtime();
        let url = runtime.get_url("./touch_grass.js").unwrap();
        assert_eq!(url.as_str(), "moz-extension://touchgrass/touch_grass.js");

        let nested = runtime.get_url("pkg/touch_grass_bg.wasm").unwrap();
        assert_eq!(
            nested.as_str(),
            "moz-extension://touchgrass/pkg/touch_grass_bg.wasm"
        );
    }

    #[test]
    fn test_get_url_rejects_foreign_addresses() {
        let runtime = ExtensionRuntime::new(
            RuntimeConfig::new()
                .base_url("moz-extension://touchgrass/dist/")
                .unwrap()
                .log_console(false),
        );

        assert!(runtime.get_url("https://evil.example/x.js").unwrap_err().is_resolution());
        assert!(runtime.get_url("../outside.js").unwrap_err().is_resolution());
        assert!(runtime.get_url("").unwrap_err().is_resolution());
        assert!(runtime.get_url("inside.js").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_for_fires_due_timers() {
        let runtime = quiet_runtime();
        let counter = Arc::new(AtomicUsize::new(0));
        runtime
            .set_timeout("soon", Duration::from_millis(500), counting_task(counter.clone()))
            .unwrap();
        runtime
            .set_timeout("late", Duration::from_millis(3000), counting_task(counter.clone()))
            .unwrap();

        assert_eq!(runtime.run_for(Duration::from_millis(1000)).await, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert_eq!(runtime.run_for(Duration::from_millis(2000)).await, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!runtime.timers().has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_task_is_reported() {
        let runtime = quiet_runtime();
        runtime
            .set_timeout(
                "explodes",
                Duration::from_millis(10),
                Arc::new(|| async { Err::<(), _>(Error::other("kaboom")) }.boxed()),
            )
            .unwrap();

        runtime.run_for(Duration::from_millis(20)).await;

        let failures = runtime.unhandled();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, "explodes");
        assert_eq!(failures[0].error.to_string(), "kaboom");
        assert_eq!(runtime.console().count("Uncaught (in explodes) kaboom"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_idle_ignores_intervals() {
        let runtime = quiet_runtime();
        let ticks = Arc::new(AtomicUsize::new(0));
        let once = Arc::new(AtomicUsize::new(0));
        runtime
            .set_interval("tick", Duration::from_millis(100), counting_task(ticks.clone()))
            .unwrap();
        runtime
            .set_timeout("once", Duration::from_millis(250), counting_task(once.clone()))
            .unwrap();

        let result = runtime.wait_for_idle(IdleConfig::default()).await;
        assert!(result.is_idle);
        assert!(!result.timed_out);
        assert_eq!(once.load(Ordering::SeqCst), 1);
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert_eq!(result.timers_executed, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_idle_timeout() {
        let runtime = quiet_runtime();
        let counter = Arc::new(AtomicUsize::new(0));
        runtime
            .set_timeout("far", Duration::from_secs(60), counting_task(counter.clone()))
            .unwrap();

        let result = runtime
            .wait_for_idle(IdleConfig::default().timeout(Duration::from_secs(1)))
            .await;
        assert!(!result.is_idle);
        assert!(result.timed_out);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
