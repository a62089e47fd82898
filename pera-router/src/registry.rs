//! Provider registry - maps manufacturer keys to loaders

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{LoadError, ManufacturerKey};

/// Zero-argument function producing a provider, or failing when the
/// underlying module is unavailable.
pub type ProviderLoader<P> =
    Box<dyn Fn() -> std::result::Result<Arc<P>, LoadError> + Send + Sync>;

/// Mapping from manufacturer key to provider loader.
///
/// Keys are normalized on registration. A registry is assembled up front and
/// then moved into a [`Router`](crate::Router), which never mutates it.
pub struct ProviderRegistry<P: ?Sized> {
    loaders: BTreeMap<ManufacturerKey, ProviderLoader<P>>,
}

impl<P: ?Sized> ProviderRegistry<P> {
    pub fn new() -> Self {
        Self {
            loaders: BTreeMap::new(),
        }
    }

    /// Register a loader for a manufacturer.
    ///
    /// A later registration for the same normalized key replaces the earlier
    /// one.
    pub fn register<F>(&mut self, key: impl Into<ManufacturerKey>, loader: F) -> &mut Self
    where
        F: Fn() -> std::result::Result<Arc<P>, LoadError> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.loaders.insert(key.clone(), Box::new(loader)).is_some() {
            tracing::debug!(manufacturer = %key, "Replaced provider loader");
        }
        self
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with<F>(mut self, key: impl Into<ManufacturerKey>, loader: F) -> Self
    where
        F: Fn() -> std::result::Result<Arc<P>, LoadError> + Send + Sync + 'static,
    {
        self.register(key, loader);
        self
    }

    pub fn get(&self, key: &ManufacturerKey) -> Option<&ProviderLoader<P>> {
        self.loaders.get(key)
    }

    pub fn contains(&self, key: &ManufacturerKey) -> bool {
        self.loaders.contains_key(key)
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &ManufacturerKey> {
        self.loaders.keys()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl<P: ?Sized> Default for ProviderRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> fmt::Debug for ProviderRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("keys", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}
