// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Injected bootstrap sequence

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use parking_lot::RwLock;

use super::companion::Companion;
use super::loader::ModuleLoader;
use crate::error::Result;
use crate::runtime::{ExtensionRuntime, TimerId};

/// Diagnostic marker logged before anything else
pub const BOOTSTRAP_MARKER: &str = "Hello from extension/index.js";

/// Companion script name, relative to the extension base
pub const COMPANION_SCRIPT: &str = "./touch_grass.js";

/// Delay between init and the companion's delayed routine
pub const DELAYED_ROUTINE_DELAY: Duration = Duration::from_millis(2000);

/// Bootstrap configuration
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Console marker emitted at start
    pub marker: String,
    /// Companion script, resolved through `ExtensionRuntime::get_url`
    pub companion_path: String,
    /// Delay before the delayed routine
    pub delay: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            marker: BOOTSTRAP_MARKER.to_string(),
            companion_path: COMPANION_SCRIPT.to_string(),
            delay: DELAYED_ROUTINE_DELAY,
        }
    }
}

impl BootstrapConfig {
    /// Create a new bootstrap config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Set the companion script
    pub fn companion_path(mut self, path: impl Into<String>) -> Self {
        self.companion_path = path.into();
        self
    }

    /// Set the delay
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Where the bootstrap sequence currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    NotStarted,
    /// Resolving and loading the companion
    Loading,
    /// Awaiting the companion's default init
    Initializing,
    /// Init done (or failed), delayed routine queued
    TimerPending,
    /// Delayed routine running
    Fired,
    Terminal,
    /// Resolution or loading failed, nothing else will happen
    Failed,
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BootstrapState::NotStarted => "not started",
            BootstrapState::Loading => "module loading",
            BootstrapState::Initializing => "initializing",
            BootstrapState::TimerPending => "idle, timer pending",
            BootstrapState::Fired => "timer fired",
            BootstrapState::Terminal => "terminal",
            BootstrapState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One-shot bootstrap for a single injection
#[derive(Debug, Clone)]
pub struct Bootstrap {
    config: BootstrapConfig,
    state: Arc<RwLock<BootstrapState>>,
    timer: Arc<RwLock<Option<TimerId>>>,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new(BootstrapConfig::default())
    }
}

impl Bootstrap {
    /// Create a new bootstrap
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(BootstrapState::NotStarted)),
            timer: Arc::new(RwLock::new(None)),
        }
    }

    /// Bootstrap configuration
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> BootstrapState {
        *self.state.read()
    }

    /// Timer holding the delayed routine, once scheduled
    pub fn timer_id(&self) -> Option<TimerId> {
        *self.timer.read()
    }

    fn set_state(&self, state: BootstrapState) {
        tracing::debug!(%state, "bootstrap state");
        *self.state.write() = state;
    }

    /// Host entry point: run the sequence, park any failure as unhandled
    pub async fn inject(&self, runtime: &ExtensionRuntime, loader: &dyn ModuleLoader) {
        if let Err(e) = self.run(runtime, loader).await {
            runtime.report_unhandled("bootstrap", e);
        }
    }

    /// Run the sequence and return its first failure
    ///
    /// The delayed routine is queued whether or not init succeeded; an init
    /// failure is returned only after the timer is in place. If queueing
    /// fails as well, the queueing error is reported as unhandled and the
    /// init error is returned.
    pub async fn run(&self, runtime: &ExtensionRuntime, loader: &dyn ModuleLoader) -> Result<()> {
        runtime.console().log(self.config.marker.clone());

        self.set_state(BootstrapState::Loading);
        let module = match self.load(runtime, loader).await {
            Ok(module) => module,
            Err(e) => {
                self.set_state(BootstrapState::Failed);
                return Err(e);
            }
        };

        self.set_state(BootstrapState::Initializing);
        let init = module.default_init().await;
        if let Err(ref e) = init {
            tracing::warn!(module = module.name(), error = %e, "companion init failed");
        }

        let id = match self.schedule_delayed(runtime, module) {
            Ok(id) => id,
            Err(e) => {
                self.set_state(BootstrapState::Failed);
                return match init {
                    // The init failure stays the one returned
                    Err(init_err) => {
                        runtime.report_unhandled("bootstrap", e);
                        Err(init_err)
                    }
                    Ok(()) => Err(e),
                };
            }
        };
        *self.timer.write() = Some(id);
        self.set_state(BootstrapState::TimerPending);

        init
    }

    async fn load(
        &self,
        runtime: &ExtensionRuntime,
        loader: &dyn ModuleLoader,
    ) -> Result<Arc<dyn Companion>> {
        let url = runtime.get_url(&self.config.companion_path)?;
        tracing::debug!(%url, "loading companion");
        let module = loader.load(&url).await?;
        tracing::info!(%url, module = module.name(), "companion loaded");
        Ok(module)
    }

    fn schedule_delayed(
        &self,
        runtime: &ExtensionRuntime,
        module: Arc<dyn Companion>,
    ) -> Result<TimerId> {
        let label = format!("{}::delayed_routine", module.name());
        let state = self.state.clone();

        runtime.set_timeout(
            label,
            self.config.delay,
            Arc::new(move || {
                let module = module.clone();
                let state = state.clone();
                async move {
                    *state.write() = BootstrapState::Fired;
                    let result = module.delayed_routine().await;
                    *state.write() = BootstrapState::Terminal;
                    result
                }
                .boxed()
            }),
        )
    }
}
