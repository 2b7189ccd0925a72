//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{ServiceCollection, Resolver, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton_factory::<Database, _>(|_| {
///     Ok(Database { url: "postgres://localhost".to_string() })
/// });
/// services.add_transient_factory::<RequestModel, _>(|_| Ok(RequestModel { id: 12345 }));
///
/// let provider = services.build().unwrap();
///
/// // Singleton: same instance every time
/// let db1 = provider.get_required::<Database>();
/// let db2 = provider.get_required::<Database>();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// // Transient: always different instances
/// let model1 = provider.get_required::<RequestModel>();
/// let model2 = provider.get_required::<RequestModel>();
/// assert!(!Arc::ptr_eq(&model1, &model2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum Lifetime {
    /// Single instance per provider, cached forever
    ///
    /// Created on first request and shared by every later resolution, no
    /// matter which dependency chain asks for it.
    Singleton,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    /// Returns true for lifetimes whose instances are cached by the provider.
    pub fn is_cached(self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}
