// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Extension runtime
//!
//! The ambient capabilities an injected script relies on: URL resolution
//! against the extension base, a captured console, and a single-threaded
//! timer queue driven by a cooperative event loop.

mod config;
mod console;
mod runtime;
mod timers;

pub use config::{IdleConfig, RuntimeConfig, DEFAULT_BASE_URL};
pub use console::{Console, ConsoleLevel, ConsoleMessage};
pub use runtime::{ExtensionRuntime, IdleResult, UnhandledFailure};
pub use timers::{TimerEntry, TimerId, TimerQueue, TimerTask};
