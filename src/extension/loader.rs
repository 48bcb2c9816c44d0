// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Module loading for resolved script URLs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use url::Url;

use super::companion::Companion;
use crate::error::{Error, Result};

/// Loads the companion module living at a resolved URL
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Load the module, or fail if nothing loadable lives there
    async fn load(&self, url: &Url) -> Result<Arc<dyn Companion>>;
}

/// In-process module table keyed by absolute URL
///
/// Loading the same URL twice hands back the same instance, like a module
/// cache would.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: RwLock<HashMap<String, Arc<dyn Companion>>>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module at `url`, replacing any previous one
    pub fn register(&self, url: &Url, module: Arc<dyn Companion>) {
        tracing::debug!(%url, module = module.name(), "module registered");
        self.modules.write().insert(url.to_string(), module);
    }

    /// Builder-style `register`
    pub fn with_module(self, url: &Url, module: Arc<dyn Companion>) -> Self {
        self.register(url, module);
        self
    }

    /// Check whether a module is registered at `url`
    pub fn contains(&self, url: &Url) -> bool {
        self.modules.read().contains_key(url.as_str())
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }
}

#[async_trait]
impl ModuleLoader for ModuleRegistry {
    async fn load(&self, url: &Url) -> Result<Arc<dyn Companion>> {
        self.modules
            .read()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::load(url.as_str(), "no module registered at this address"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl Companion for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn default_init(&self) -> Result<()> {
            Ok(())
        }

        async fn delayed_routine(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_registered_module() {
        let url = Url::parse("moz-extension://touchgrass/touch_grass.js").unwrap();
        let registry = ModuleRegistry::new().with_module(&url, Arc::new(Named("touch_grass")));

        assert!(registry.contains(&url));
        assert_eq!(registry.len(), 1);

        let first = registry.load(&url).await.unwrap();
        let second = registry.load(&url).await.unwrap();
        assert_eq!(first.name(), "touch_grass");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_load_unknown_address() {
        let registry = ModuleRegistry::new();
        let url = Url::parse("moz-extension://touchgrass/missing.js").unwrap();

        let err = registry.load(&url).await.err().unwrap();
        assert!(err.is_load());
        assert!(err.to_string().contains("missing.js"));
    }
}
