//! Service collection module for dependency injection.
//!
//! This module contains the ServiceCollection type, the registration phase of
//! the container. Calling [`ServiceCollection::build`] consumes the collection,
//! so nothing can be registered once resolution has started.

use std::sync::Arc;

use tracing::debug;

use crate::config::{ContainerOptions, DuplicatePolicy};
use crate::descriptors::{describe, ServiceDescriptor};
use crate::error::{BoxError, DiError, DiResult};
use crate::inject::{Dependencies, Injectable};
use crate::key::key_of_type;
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, Observers};
use crate::provider::{ResolverContext, ServiceProvider};
use crate::registration::{Binding, Constructor, Registry};
use crate::validation::{declared_cycle, validate, ValidationResult};

pub mod module_system;
pub use module_system::*;

/// Ordered set of service registrations.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{BoxError, Injectable, ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct MessageService;
/// impl Injectable for MessageService {
///     type Deps = ();
///     fn inject(_: ()) -> Result<Self, BoxError> { Ok(MessageService) }
/// }
///
/// struct HelloService { message: Arc<MessageService> }
/// impl Injectable for HelloService {
///     type Deps = (Arc<MessageService>,);
///     fn inject((message,): Self::Deps) -> Result<Self, BoxError> {
///         Ok(HelloService { message })
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services
///     .add_transient::<HelloService>()
///     .add_singleton::<MessageService>();
///
/// let provider = services.build().unwrap();
/// let a = provider.get_required::<HelloService>();
/// let b = provider.get_required::<HelloService>();
/// assert!(!Arc::ptr_eq(&a, &b));
/// assert!(Arc::ptr_eq(&a.message, &b.message));
/// ```
pub struct ServiceCollection {
    registry: Registry,
    observers: Observers,
    options: ContainerOptions,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates an empty collection with the given options.
    pub fn with_options(options: ContainerOptions) -> Self {
        let mut registry = Registry::new();
        registry.policy = options.duplicate_policy;
        Self {
            registry,
            observers: Observers::new(),
            options,
        }
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// Replaces the options; applies to every registration made so far.
    pub fn set_options(&mut self, options: ContainerOptions) -> &mut Self {
        self.registry.policy = options.duplicate_policy;
        self.options = options;
        self
    }

    // ----- Constructor-based Registrations -----

    /// Registers `T` as a singleton built through its [`Injectable`] constructor.
    ///
    /// The instance is created on first request and shared by every later
    /// resolution, whichever dependency chain asks for it.
    pub fn add_singleton<T: Injectable>(&mut self) -> &mut Self {
        self.add_injectable::<T>(Lifetime::Singleton)
    }

    /// Registers `T` as a transient built through its [`Injectable`] constructor.
    ///
    /// Every request constructs a new instance, re-resolving its parameters.
    pub fn add_transient<T: Injectable>(&mut self) -> &mut Self {
        self.add_injectable::<T>(Lifetime::Transient)
    }

    fn add_injectable<T: Injectable>(&mut self, lifetime: Lifetime) -> &mut Self {
        self.registry.catalog.declare_injectable::<T>();
        self.add_service::<T>(lifetime)
    }

    /// Registers `T` with no constructor attached.
    ///
    /// Whether `T` can actually be built is only checked when it is resolved:
    /// it needs exactly one constructor from [`declare_constructor`](Self::declare_constructor)
    /// or an `Injectable` registration elsewhere.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_inject::{DiError, Lifetime, ServiceCollection, Resolver};
    ///
    /// struct Unbuildable;
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_service::<Unbuildable>(Lifetime::Transient);
    ///
    /// let provider = services.build().unwrap();
    /// assert!(matches!(
    ///     provider.get::<Unbuildable>(),
    ///     Err(DiError::ConstructorAmbiguity { found: 0, .. })
    /// ));
    /// ```
    pub fn add_service<T: Send + Sync + 'static>(&mut self, lifetime: Lifetime) -> &mut Self {
        self.registry.push(Binding::new(key_of_type::<T>(), lifetime, None));
        self
    }

    /// Declares a constructor for `T` taking the parameter tuple `D`.
    ///
    /// Declaring a second constructor for a type makes it ambiguous, and
    /// resolving it fails with [`DiError::ConstructorAmbiguity`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_inject::{Lifetime, ServiceCollection, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Port(u16);
    /// struct Server { port: Arc<Port> }
    ///
    /// let mut services = ServiceCollection::new();
    /// services
    ///     .add_instance(Port(8080))
    ///     .add_service::<Server>(Lifetime::Singleton)
    ///     .declare_constructor::<Server, (Arc<Port>,), _>(|(port,)| Ok(Server { port }));
    ///
    /// let provider = services.build().unwrap();
    /// assert_eq!(provider.get_required::<Server>().port.0, 8080);
    /// ```
    pub fn declare_constructor<T, D, F>(&mut self, constructor: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        D: Dependencies + 'static,
        F: Fn(D) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.registry
            .catalog
            .declare(key_of_type::<T>(), Constructor::declared::<T, D, F>(constructor));
        self
    }

    // ----- Factory Registrations -----

    /// Registers a singleton factory that creates the instance on first request.
    ///
    /// The factory receives a [`ResolverContext`] to resolve its own
    /// dependencies and overrides any constructor declared for `T`.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a transient factory that creates a new instance on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let constructor = Constructor::factory::<T, F>(factory);
        self.registry
            .push(Binding::new(key_of_type::<T>(), lifetime, Some(constructor)));
        self
    }

    /// Registers an already-built value as a singleton.
    pub fn add_instance<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        let constructor = Constructor::instance(value);
        self.registry
            .push(Binding::new(key_of_type::<T>(), Lifetime::Singleton, Some(constructor)));
        self
    }

    // ----- Observers, Introspection -----

    /// Adds an observer notified of every resolution.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Returns true if a binding exists for `T`.
    pub fn contains<T: 'static>(&self) -> bool {
        self.registry.contains(&key_of_type::<T>())
    }

    /// Number of bindings, duplicates included.
    pub fn len(&self) -> usize {
        self.registry.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.bindings.is_empty()
    }

    /// Get all service descriptors, in registration order.
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        describe(&self.registry)
    }

    /// Checks the declared dependency graph without constructing anything.
    pub fn validate(&self) -> ValidationResult {
        validate(&self.registry)
    }

    /// Finishes registration and returns the provider.
    ///
    /// Fails with [`DiError::DuplicateRegistration`] when the duplicate policy
    /// is [`DuplicatePolicy::Reject`] and a type was registered twice, with
    /// [`DiError::InvalidOptions`] when the options are unusable, and with
    /// [`DiError::Circular`] when declared constructor parameters form a cycle.
    /// Cycles hidden inside factories are caught when they are resolved.
    pub fn build(self) -> DiResult<ServiceProvider> {
        self.options.validate()?;
        if self.options.duplicate_policy == DuplicatePolicy::Reject {
            if let Some(key) = self.registry.first_duplicate() {
                return Err(DiError::DuplicateRegistration(key.display_name()));
            }
        }
        if let Some(path) = declared_cycle(&self.registry) {
            debug!(path = ?path, "rejected cyclic registrations");
            return Err(DiError::Circular(path));
        }
        debug!(
            bindings = self.registry.bindings.len(),
            policy = ?self.options.duplicate_policy,
            "built service provider"
        );
        Ok(ServiceProvider::new(self.registry, self.observers, self.options))
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
