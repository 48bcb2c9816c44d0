// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Captured console for injected scripts

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Console message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
}

/// Console log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConsoleLevel::Log => "log",
            ConsoleLevel::Info => "info",
            ConsoleLevel::Warn => "warn",
            ConsoleLevel::Error => "error",
            ConsoleLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

/// Console shared by everything running inside one runtime
#[derive(Debug, Clone, Default)]
pub struct Console {
    messages: Arc<RwLock<Vec<ConsoleMessage>>>,
    mirror: bool,
}

impl Console {
    /// Create a console, optionally mirroring messages to tracing
    pub fn new(mirror: bool) -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            mirror,
        }
    }

    pub fn log(&self, message: impl Into<String>) {
        self.push(ConsoleLevel::Log, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ConsoleLevel::Info, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.push(ConsoleLevel::Warn, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ConsoleLevel::Error, message.into());
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.push(ConsoleLevel::Debug, message.into());
    }

    fn push(&self, level: ConsoleLevel, message: String) {
        if self.mirror {
            match level {
                ConsoleLevel::Error => tracing::error!(target: "touchgrass::console", "{}", message),
                ConsoleLevel::Warn => tracing::warn!(target: "touchgrass::console", "{}", message),
                ConsoleLevel::Debug => tracing::debug!(target: "touchgrass::console", "{}", message),
                ConsoleLevel::Log | ConsoleLevel::Info => {
                    tracing::info!(target: "touchgrass::console", "{}", message)
                }
            }
        }
        self.messages.write().push(ConsoleMessage { level, message });
    }

    /// All captured messages in emission order
    pub fn messages(&self) -> Vec<ConsoleMessage> {
        self.messages.read().clone()
    }

    /// Count messages with exactly this text
    pub fn count(&self, message: &str) -> usize {
        self.messages
            .read()
            .iter()
            .filter(|m| m.message == message)
            .count()
    }

    /// Drop all captured messages
    pub fn clear(&self) {
        self.messages.write().clear();
    }
}
