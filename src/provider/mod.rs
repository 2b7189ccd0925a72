//! Service provider module for dependency injection.
//!
//! This module contains the ServiceProvider type and related functionality
//! for resolving registered services from the DI container.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::config::ContainerOptions;
use crate::descriptors::{describe, ServiceDescriptor};
use crate::error::DiResult;
use crate::internal::{InitTracker, ResolutionFrame};
use crate::key::Key;
use crate::observer::Observers;
use crate::registration::{AnyArc, Binding, Registry};
use crate::traits::ResolverCore;

pub mod context;
pub use context::ResolverContext;

/// Service provider for resolving dependencies from the DI container.
///
/// Resolution walks the constructor graph depth-first, resolving each
/// declared parameter left to right before the constructor runs. Singletons
/// are cached in their binding on first successful construction; transients
/// are built fresh on every request.
///
/// # Thread Safety
///
/// ServiceProvider is cheap to clone and can be shared across threads.
/// Concurrent first requests for the same singleton are serialized: one
/// thread constructs, the others wait and then observe the same instance.
/// A wait that would close a cycle between threads fails with
/// [`DiError::Circular`](crate::DiError::Circular) instead of blocking.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_instance(Database { url: "postgres://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     Ok(UserService { db: resolver.get::<Database>()? })
/// });
///
/// let provider = collection.build().unwrap();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    registry: Registry,
    observers: Observers,
    options: ContainerOptions,
    singletons: InitTracker,
}

impl ServiceProvider {
    /// Create a new ServiceProvider with the given registry.
    /// This is used internally by ServiceCollection.build().
    pub(crate) fn new(registry: Registry, observers: Observers, options: ContainerOptions) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                observers,
                options,
                singletons: InitTracker::new(),
            }),
        }
    }

    /// Options the provider was built with.
    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// Describes every binding, including whether its singleton has been built yet.
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        describe(&self.inner.registry)
    }

    pub(crate) fn resolve_in(&self, key: &Key, parent: Option<&ResolutionFrame<'_>>) -> DiResult<AnyArc> {
        let observers = &self.inner.observers;
        if !observers.has_observers() {
            return self.resolve_binding(key, parent);
        }

        let start = Instant::now();
        observers.resolving(key);
        let result = self.resolve_binding(key, parent);
        match &result {
            Ok(_) => observers.resolved(key, start.elapsed()),
            Err(e) => observers.resolution_failed(key, e),
        }
        result
    }

    fn resolve_binding(&self, key: &Key, parent: Option<&ResolutionFrame<'_>>) -> DiResult<AnyArc> {
        let binding = self.inner.registry.lookup(key)?;

        if let Some(instance) = binding.cached_instance() {
            trace!(service = key.display_name(), "singleton cache hit");
            return Ok(instance.clone());
        }

        let frame = ResolutionFrame::enter(*key, parent, self.inner.options.max_depth)?;
        let ctx = ResolverContext::nested(self, &frame);

        match &binding.cached {
            Some(cell) => self
                .inner
                .singletons
                .init_once(cell, &frame, || self.construct(binding, &ctx)),
            None => self.construct(binding, &ctx),
        }
    }

    fn construct(&self, binding: &Binding, ctx: &ResolverContext<'_>) -> DiResult<AnyArc> {
        let constructor = self.inner.registry.constructor_for(binding)?;
        let instance = (constructor.ctor)(ctx)?;
        debug!(
            service = binding.key.display_name(),
            lifetime = ?binding.lifetime,
            "constructed service"
        );
        Ok(instance)
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Service Provider Debug ===\n");
        for d in self.get_service_descriptors() {
            s.push_str(&format!(
                "  {}: {:?} (constructors: {}, instantiated: {})\n",
                d.type_name(),
                d.lifetime,
                d.constructor_count,
                d.instantiated
            ));
        }
        s
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolve_in(key, None).inspect_err(|e| {
            debug!(service = key.display_name(), error = %e, "resolution failed");
        })
    }
}
