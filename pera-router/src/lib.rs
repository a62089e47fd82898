//! pera-router - Manufacturer-keyed lazy capability router
//!
//! A [`Router`] stands in for a capability provider that cannot be chosen
//! until runtime. The first access asks a key provider for the device
//! manufacturer, looks up a loader in a [`ProviderRegistry`], runs it, and
//! caches the result. Every later access is served by the cached provider.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pera_router::{ProviderRegistry, Router};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct Pax;
//! impl Greeter for Pax {
//!     fn greet(&self) -> String {
//!         "hello from pax".to_string()
//!     }
//! }
//!
//! let mut registry: ProviderRegistry<dyn Greeter> = ProviderRegistry::new();
//! registry.register("pax", || Ok(Arc::new(Pax) as Arc<dyn Greeter>));
//!
//! let router = Router::new(|| " Pax ".to_string(), registry);
//! let greeting = router.with(|p| p.greet()).unwrap();
//! assert_eq!(greeting, "hello from pax");
//! ```

pub mod error;
pub mod introspect;
pub mod key;
pub mod registry;
pub mod router;

pub use error::{LoadError, Result, RouterError};
pub use introspect::{Introspect, MemberDescriptor, MemberKind};
pub use key::ManufacturerKey;
pub use registry::{ProviderLoader, ProviderRegistry};
pub use router::{MissingHook, Router};
