// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Content-script bootstrap
//!
//! The injected entry point: log a marker, load the companion module from
//! the extension package, run its default init, then hand the companion's
//! delayed routine to the runtime's timers.

mod bootstrap;
mod companion;
mod loader;

pub use bootstrap::{
    Bootstrap, BootstrapConfig, BootstrapState, BOOTSTRAP_MARKER, COMPANION_SCRIPT,
    DELAYED_ROUTINE_DELAY,
};
pub use companion::Companion;
pub use loader::{ModuleLoader, ModuleRegistry};
