// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Companion module contract

use async_trait::async_trait;

use crate::error::Result;

/// The capability set a companion module exports
///
/// `default_init` is awaited by the bootstrap; `delayed_routine` runs later
/// from a timer and nobody awaits its outcome.
#[async_trait]
pub trait Companion: Send + Sync {
    /// Module name, used to label timers and failures
    fn name(&self) -> &str;

    /// Default initialization entry point
    async fn default_init(&self) -> Result<()>;

    /// Named routine invoked after the bootstrap delay
    async fn delayed_routine(&self) -> Result<()>;
}
