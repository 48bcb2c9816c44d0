// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Time-of-day source

use chrono::{Local, Timelike};

/// Source of the current time of day
pub trait Clock: Send + Sync {
    /// Minutes since local midnight
    fn minute_of_day(&self) -> u32;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn minute_of_day(&self) -> u32 {
        let now = Local::now();
        now.hour() * 60 + now.minute()
    }
}

/// Clock stuck at one time of day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn minute_of_day(&self) -> u32 {
        self.0
    }
}
