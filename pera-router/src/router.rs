//! Router - lazily resolves and caches the provider for the current manufacturer

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::{
    Introspect, ManufacturerKey, MemberDescriptor, ProviderRegistry, Result,
    RouterError,
};

/// Hook deciding the failure for a manufacturer with no registered loader.
///
/// The hook returns the error to raise, so it cannot hand back a provider.
pub type MissingHook = Box<dyn Fn(&ManufacturerKey) -> RouterError + Send + Sync>;

type KeyProvider = Box<dyn Fn() -> String + Send + Sync>;

struct Resolved<P: ?Sized> {
    key: ManufacturerKey,
    provider: Arc<P>,
}

/// Lazy, manufacturer-aware handle to a provider.
///
/// Nothing is detected or loaded at construction. The first access runs the
/// key provider, picks a loader and stores its provider; the stored provider
/// then serves every access for the lifetime of the router. Failed loads are
/// not stored, so a later access tries again.
pub struct Router<P: ?Sized> {
    key_provider: KeyProvider,
    registry: ProviderRegistry<P>,
    on_missing: Option<MissingHook>,
    resolved: OnceLock<Resolved<P>>,
    /// Serializes first-time resolution; never held while a provider runs
    resolving: Mutex<()>,
}

impl<P: ?Sized> Router<P> {
    /// Create a router. `key_provider` is not called until first access.
    pub fn new<F>(key_provider: F, registry: ProviderRegistry<P>) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            key_provider: Box::new(key_provider),
            registry,
            on_missing: None,
            resolved: OnceLock::new(),
            resolving: Mutex::new(()),
        }
    }

    /// Replace the default "no provider registered" failure.
    pub fn with_on_missing<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ManufacturerKey) -> RouterError + Send + Sync + 'static,
    {
        self.on_missing = Some(Box::new(hook));
        self
    }

    /// Resolve (if needed) and return the active provider.
    pub fn provider(&self) -> Result<&Arc<P>> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(&resolved.provider);
        }

        let _guard = self
            .resolving
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another thread may have finished while we waited
        if let Some(resolved) = self.resolved.get() {
            return Ok(&resolved.provider);
        }

        let resolved = self.resolve()?;
        Ok(&self.resolved.get_or_init(|| resolved).provider)
    }

    /// Run `f` against the active provider.
    ///
    /// The provider is the receiver of whatever `f` calls, exactly as if the
    /// caller held it directly.
    pub fn with<R>(&self, f: impl FnOnce(&P) -> R) -> Result<R> {
        let provider = self.provider()?;
        Ok(f(provider.as_ref()))
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Key the provider was resolved for, once resolution succeeded
    pub fn resolved_key(&self) -> Option<&ManufacturerKey> {
        self.resolved.get().map(|r| &r.key)
    }

    pub fn registered_keys(&self) -> impl Iterator<Item = &ManufacturerKey> {
        self.registry.keys()
    }

    fn resolve(&self) -> Result<Resolved<P>> {
        let key = ManufacturerKey::normalize((self.key_provider)());
        tracing::debug!(manufacturer = %key, "Resolving provider");

        let Some(loader) = self.registry.get(&key) else {
            tracing::debug!(manufacturer = %key, "No provider registered");
            return Err(match &self.on_missing {
                Some(hook) => hook(&key),
                None => RouterError::UnknownManufacturer { key },
            });
        };

        let loaded = match std::panic::catch_unwind(AssertUnwindSafe(|| loader())) {
            Ok(loaded) => loaded,
            Err(panic) => {
                let message = panic_message(&*panic).to_string();
                tracing::warn!(manufacturer = %key, panic = %message, "Provider loader panicked");
                return Err(RouterError::LoaderPanicked { key, message });
            }
        };

        match loaded {
            Ok(provider) => {
                tracing::info!(manufacturer = %key, "Provider resolved");
                Ok(Resolved { key, provider })
            }
            Err(e) => {
                tracing::warn!(
                    manufacturer = %key,
                    module = %e.module,
                    error = %e.detail,
                    "Provider module failed to load"
                );
                Err(RouterError::loader_failure(&key, e))
            }
        }
    }
}

impl<P: ?Sized + Introspect> Router<P> {
    /// Whether the resolved provider exposes `name`
    pub fn has(&self, name: &str) -> Result<bool> {
        self.with(|p| p.has_member(name))
    }

    /// Enumerable member names of the resolved provider
    pub fn keys(&self) -> Result<Vec<String>> {
        self.with(|p| p.member_names())
    }

    /// Descriptor of `name` on the resolved provider.
    ///
    /// Always reported as configurable, whatever the provider says.
    pub fn descriptor(&self, name: &str) -> Result<Option<MemberDescriptor>> {
        self.with(|p| p.describe(name).map(|d| d.configurable(true)))
    }
}

impl<P: ?Sized> fmt::Debug for Router<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("registry", &self.registry)
            .field("resolved_key", &self.resolved_key())
            .field("has_on_missing", &self.on_missing.is_some())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
