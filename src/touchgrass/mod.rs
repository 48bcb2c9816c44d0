// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! TouchGrass companion
//!
//! Removes the recommendation grid and the watch-page sidebar while the
//! user's block window is active, and keeps a running count of watch time.

mod clock;
mod companion;
mod config;
mod distractions;
mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use companion::{increment_total_usage, TouchGrass, WATCH_TIME_INTERVAL};
pub use config::{format_time, parse_time, BlockWindow, Config, ConfigBuilder, MINUTES_PER_DAY};
pub use distractions::{remove_distractions, DISTRACTION_NOTICE, HOMEPAGE_GRID, WATCH_SIDEBAR};
pub use storage::{save_or_start_over, ConfigError, ConfigStore, FileStore, MemoryStore};
