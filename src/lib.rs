// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # TouchGrass - content-script bootstrap and distraction blocker
//!
//! The injected bootstrap logs a marker, loads the `touch_grass` companion
//! from the extension package, awaits its init, and two seconds later runs
//! its routine. The companion strips distraction panes out of the host page
//! during the user's block window and records watch time.
//!
//! Everything the script would get from the browser (URL resolution,
//! console, timers, the page DOM, extension storage) is provided by this
//! crate, so the whole sequence can run headless.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use touchgrass::{
//!     parse_html, Bootstrap, ExtensionRuntime, FileStore, ModuleRegistry, RuntimeConfig,
//!     TouchGrass,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = ExtensionRuntime::new(RuntimeConfig::default());
//!     let page = parse_html("<body><ytd-rich-grid-renderer></ytd-rich-grid-renderer></body>")?;
//!     let registry = ModuleRegistry::new();
//!
//!     TouchGrass::new(runtime.clone(), page.clone(), Arc::new(FileStore::new("storage.json")))
//!         .register(&registry)?;
//!
//!     Bootstrap::default().inject(&runtime, &registry).await;
//!     runtime.run_for(Duration::from_millis(2500)).await;
//!
//!     println!("{}", page.outer_html());
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod extension;
pub mod runtime;
pub mod touchgrass;

// Re-exports for convenience

// Bootstrap
pub use extension::{
    Bootstrap, BootstrapConfig, BootstrapState, Companion, ModuleLoader, ModuleRegistry,
    BOOTSTRAP_MARKER, COMPANION_SCRIPT, DELAYED_ROUTINE_DELAY,
};

// Runtime
pub use runtime::{
    Console, ConsoleLevel, ConsoleMessage, ExtensionRuntime, IdleConfig, IdleResult,
    RuntimeConfig, TimerQueue, UnhandledFailure,
};

// DOM
pub use dom::{parse_html, Document, Element};

// Companion
pub use touchgrass::{
    BlockWindow, Clock, Config, ConfigBuilder, ConfigError, ConfigStore, FileStore, MemoryStore,
    SystemClock, TouchGrass,
};

// Errors
pub use error::{Error, ErrorContext, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
