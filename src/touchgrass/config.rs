// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! User configuration and the block window

use serde::{Deserialize, Serialize};

/// Minutes in a day; times of day are `0..MINUTES_PER_DAY`
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Stored user configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Block window start, minutes after midnight
    pub block_time_start: u32,
    /// Block window end, minutes after midnight
    pub block_time_end: u32,
    /// Watch time recorded so far, in minutes
    #[serde(default)]
    pub total_usage: u32,
}

impl Config {
    /// Config blocking between two times of day
    pub fn new(block_time_start: u32, block_time_end: u32) -> Self {
        Self {
            block_time_start,
            block_time_end,
            total_usage: 0,
        }
    }

    /// The configured block window
    pub fn block_window(&self) -> BlockWindow {
        BlockWindow::new(self.block_time_start, self.block_time_end)
    }

    /// Whether both times are valid times of day
    pub fn is_valid(&self) -> bool {
        self.block_time_start < MINUTES_PER_DAY && self.block_time_end < MINUTES_PER_DAY
    }
}

/// Partial config update; `None` leaves a field as stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigBuilder {
    pub block_time_start: Option<u32>,
    pub block_time_end: Option<u32>,
    pub total_usage: Option<u32>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_time_start(mut self, minutes: u32) -> Self {
        self.block_time_start = Some(minutes);
        self
    }

    pub fn block_time_end(mut self, minutes: u32) -> Self {
        self.block_time_end = Some(minutes);
        self
    }

    pub fn total_usage(mut self, minutes: u32) -> Self {
        self.total_usage = Some(minutes);
        self
    }

    /// Merge this update onto `config`
    pub fn apply(&self, config: Config) -> Config {
        Config {
            block_time_start: self.block_time_start.unwrap_or(config.block_time_start),
            block_time_end: self.block_time_end.unwrap_or(config.block_time_end),
            total_usage: self.total_usage.unwrap_or(config.total_usage),
        }
    }
}

/// Daily window during which distractions are removed
///
/// `start <= end` is a plain range. `start > end` wraps past midnight,
/// e.g. 22:00 to 06:00. Equal bounds never block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockWindow {
    pub start: u32,
    pub end: u32,
}

impl BlockWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Check whether `minute` (of the day) falls inside the window
    pub fn contains(&self, minute: u32) -> bool {
        // A wrapped window is the complement of (end..start)
        let normal = self.start <= self.end;
        let early = self.start.min(self.end);
        let late = self.start.max(self.end);
        normal == (early..late).contains(&minute)
    }

    /// Window length in minutes
    pub fn len(&self) -> u32 {
        if self.start <= self.end {
            self.end - self.start
        } else {
            MINUTES_PER_DAY - self.start + self.end
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Parse `HH:MM` into minutes after midnight
pub fn parse_time(time: &str) -> Option<u32> {
    let (hour, minute) = time.trim().split_once(':')?;
    let hour = hour.parse::<u32>().ok()?;
    let minute = minute.parse::<u32>().ok()?;
    if hour >= 24 || minute >= 60 {
        return None;
    }
    Some(hour * 60 + minute)
}

/// Format minutes after midnight as `HH:MM`
pub fn format_time(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_window() {
        let window = BlockWindow::new(9 * 60, 17 * 60);
        assert!(!window.contains(8 * 60 + 59));
        assert!(window.contains(9 * 60));
        assert!(window.contains(12 * 60));
        assert!(!window.contains(17 * 60));
        assert_eq!(window.len(), 8 * 60);
    }

    #[test]
    fn test_wrapping_window() {
        let window = BlockWindow::new(22 * 60, 6 * 60);
        assert!(window.contains(22 * 60));
        assert!(window.contains(23 * 60 + 59));
        assert!(window.contains(0));
        assert!(window.contains(5 * 60 + 59));
        assert!(!window.contains(6 * 60));
        assert!(!window.contains(12 * 60));
        assert!(!window.contains(21 * 60 + 59));
        assert_eq!(window.len(), 8 * 60);
    }

    #[test]
    fn test_empty_window() {
        let window = BlockWindow::new(600, 600);
        assert!(window.is_empty());
        assert!(!window.contains(600));
        assert!(!window.contains(0));
        assert!(!Config::default().block_window().contains(0));
    }

    #[test]
    fn test_parse_and_format_time() {
        assert_eq!(parse_time("08:30"), Some(510));
        assert_eq!(parse_time("0:00"), Some(0));
        assert_eq!(parse_time("23:59"), Some(1439));
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("12:60"), None);
        assert_eq!(parse_time("noon"), None);
        assert_eq!(parse_time("12"), None);

        assert_eq!(format_time(510), "08:30");
        assert_eq!(format_time(0), "00:00");
    }

    #[test]
    fn test_builder_merges() {
        let stored = Config {
            block_time_start: 60,
            block_time_end: 120,
            total_usage: 42,
        };
        let updated = ConfigBuilder::new().total_usage(43).apply(stored.clone());
        assert_eq!(updated.block_time_start, 60);
        assert_eq!(updated.block_time_end, 120);
        assert_eq!(updated.total_usage, 43);

        assert_eq!(ConfigBuilder::default().apply(stored.clone()), stored);
    }

    #[test]
    fn test_deserialize_without_usage() {
        let config: Config =
            serde_json::from_str(r#"{"block_time_start":1320,"block_time_end":360}"#).unwrap();
        assert_eq!(config.total_usage, 0);
        assert!(config.is_valid());
    }
}
