// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Runtime and event loop configuration

use std::time::Duration;

use url::Url;

use crate::error::Result;

/// Base URL scripts are resolved against when none is configured
pub const DEFAULT_BASE_URL: &str = "moz-extension://touchgrass/";

/// Extension runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Root of the extension package, used by `get_url`
    pub base_url: Url,
    /// Maximum timers queued at once
    pub max_timers: usize,
    /// Mirror console messages to tracing
    pub log_console: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            max_timers: 1000,
            log_console: true,
        }
    }
}

impl RuntimeConfig {
    /// Create a new runtime config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extension base URL
    ///
    /// A trailing slash is added when missing so relative names resolve
    /// inside the base rather than next to it.
    pub fn base_url(mut self, base: &str) -> Result<Self> {
        let mut url = Url::parse(base)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = url;
        Ok(self)
    }

    /// Set the timer limit
    pub fn max_timers(mut self, max: usize) -> Self {
        self.max_timers = max;
        self
    }

    /// Enable/disable console mirroring
    pub fn log_console(mut self, enabled: bool) -> Self {
        self.log_console = enabled;
        self
    }
}

/// Configuration for `ExtensionRuntime::wait_for_idle`
#[derive(Debug, Clone)]
pub struct IdleConfig {
    /// Maximum time to wait for idle
    pub timeout: Duration,
    /// Maximum timer callbacks to execute
    pub max_timer_executions: usize,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_timer_executions: 100,
        }
    }
}

impl IdleConfig {
    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the execution cap
    pub fn max_timer_executions(mut self, max: usize) -> Self {
        self.max_timer_executions = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_config() {
        let config = RuntimeConfig::new()
            .base_url("chrome-extension://abcdef/dist")
            .unwrap()
            .max_timers(4);

        assert_eq!(config.base_url.as_str(), "chrome-extension://abcdef/dist/");
        assert_eq!(config.max_timers, 4);
        assert!(config.log_console);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(RuntimeConfig::new().base_url("not a url").is_err());
    }
}
