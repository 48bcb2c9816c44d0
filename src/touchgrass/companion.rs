// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The touch_grass companion module

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::RwLock;

use super::clock::{Clock, SystemClock};
use super::config::{Config, ConfigBuilder};
use super::distractions::remove_distractions;
use super::storage::{ConfigError, ConfigStore};
use crate::dom::Document;
use crate::error::Result;
use crate::extension::{Companion, ModuleRegistry, COMPANION_SCRIPT};
use crate::runtime::{ExtensionRuntime, TimerId};

/// How often watch time is bumped while the page stays open
///
/// Recorded usage can lag real usage by up to one interval.
pub const WATCH_TIME_INTERVAL: Duration = Duration::from_secs(60);

/// Distraction blocker for one host page
pub struct TouchGrass {
    runtime: ExtensionRuntime,
    document: Document,
    store: Arc<dyn ConfigStore>,
    clock: Arc<dyn Clock>,
    watch_timer: RwLock<Option<TimerId>>,
}

impl TouchGrass {
    /// Companion for `document`, reading config from `store`
    pub fn new(runtime: ExtensionRuntime, document: Document, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            runtime,
            document,
            store,
            clock: Arc::new(SystemClock),
            watch_timer: RwLock::new(None),
        }
    }

    /// Use another time-of-day source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register this companion where the bootstrap will look for it
    pub fn register(self, registry: &ModuleRegistry) -> Result<Arc<Self>> {
        let url = self.runtime.get_url(COMPANION_SCRIPT)?;
        let module = Arc::new(self);
        registry.register(&url, module.clone());
        Ok(module)
    }

    /// Interval timer recording watch time, once started
    pub fn watch_timer(&self) -> Option<TimerId> {
        *self.watch_timer.read()
    }

    /// Count the current minute and keep counting every interval
    async fn record_watch_time(&self) -> Result<()> {
        if self.watch_timer.read().is_some() {
            return Ok(());
        }

        let store = self.store.clone();
        let id = self.runtime.set_interval(
            "touch_grass::watch_time",
            WATCH_TIME_INTERVAL,
            Arc::new(move || {
                let store = store.clone();
                async move { increment_total_usage(store.as_ref()).await.map(|_| ()) }.boxed()
            }),
        )?;
        *self.watch_timer.write() = Some(id);

        increment_total_usage(self.store.as_ref()).await?;
        Ok(())
    }
}

/// Add one minute to the stored watch time
pub async fn increment_total_usage(store: &dyn ConfigStore) -> Result<Config> {
    let current = match store.get_config().await {
        Ok(config) => config,
        Err(ConfigError::EmptyStorage) => Config::default(),
        Err(e) => return Err(e.into()),
    };
    let usage = current.total_usage.saturating_add(1);
    let updated = ConfigBuilder::new().total_usage(usage).apply(current);
    store.set_config(&updated).await?;
    tracing::trace!(total_usage = usage, "watch time recorded");
    Ok(updated)
}

#[async_trait]
impl Companion for TouchGrass {
    fn name(&self) -> &str {
        "touch_grass"
    }

    async fn default_init(&self) -> Result<()> {
        // Nothing saved yet is fine; the delayed routine reports it
        match self.store.get_config().await {
            Ok(_) | Err(ConfigError::EmptyStorage) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delayed_routine(&self) -> Result<()> {
        let console = self.runtime.console();

        let config = match self.store.get_config().await {
            Ok(config) => config,
            Err(e) => {
                console.log(format!("Error: {e}"));
                return Ok(());
            }
        };
        console.log(format!("Config: {config:?}"));

        let now = self.clock.minute_of_day();
        console.log(format!("Curr time: {now}"));

        self.record_watch_time().await?;

        if !config.block_window().contains(now) {
            // Outside the block window, the page loads normally
            return Ok(());
        }

        let removed = remove_distractions(&self.document)?;
        tracing::info!(removed, minute = now, "distractions removed");
        Ok(())
    }
}
