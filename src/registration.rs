//! Bindings, constructors and the registry that holds them.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::DuplicatePolicy;
use crate::error::{DiError, DiResult};
use crate::inject::{Dependencies, Injectable};
use crate::key::{key_of_type, Key};
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type CtorFn = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Where a constructor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorSource {
    /// Derived from the type's `Injectable` impl
    Injectable,
    /// Added through `declare_constructor`
    Declared,
    /// Binding-local factory closure
    Factory,
    /// Pre-built instance
    Instance,
}

/// Type-erased constructor with its declared parameter list.
#[derive(Clone)]
pub(crate) struct Constructor {
    pub(crate) source: ConstructorSource,
    /// `None` when the parameters are hidden inside an opaque factory.
    pub(crate) dependencies: Option<Vec<Key>>,
    pub(crate) ctor: CtorFn,
}

impl Constructor {
    pub(crate) fn of_injectable<T: Injectable>() -> Self {
        Self::with_deps::<T, T::Deps, _>(ConstructorSource::Injectable, T::inject)
    }

    pub(crate) fn declared<T, D, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        D: Dependencies + 'static,
        F: Fn(D) -> Result<T, crate::error::BoxError> + Send + Sync + 'static,
    {
        Self::with_deps::<T, D, F>(ConstructorSource::Declared, f)
    }

    fn with_deps<T, D, F>(source: ConstructorSource, f: F) -> Self
    where
        T: Send + Sync + 'static,
        D: Dependencies + 'static,
        F: Fn(D) -> Result<T, crate::error::BoxError> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            // Parameters first: a failing dependency means no partial construction.
            let deps = D::resolve_all(r)?;
            let value = f(deps).map_err(|e| DiError::instantiation(std::any::type_name::<T>(), e))?;
            Ok(Arc::new(value))
        };
        Self {
            source,
            dependencies: Some(D::keys()),
            ctor: Arc::new(ctor),
        }
    }

    pub(crate) fn factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r)?)) };
        Self {
            source: ConstructorSource::Factory,
            dependencies: None,
            ctor: Arc::new(ctor),
        }
    }

    pub(crate) fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        let arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        Self {
            source: ConstructorSource::Instance,
            dependencies: Some(Vec::new()),
            ctor: Arc::new(ctor),
        }
    }
}

/// One entry in the registry: a service type and its lifetime policy.
pub(crate) struct Binding {
    pub(crate) key: Key,
    pub(crate) lifetime: Lifetime,
    /// Binding-local constructor; takes precedence over the catalog.
    pub(crate) factory: Option<Constructor>,
    /// Singleton cache - written at most once, absent for transients
    pub(crate) cached: Option<OnceCell<AnyArc>>,
}

impl Binding {
    pub(crate) fn new(key: Key, lifetime: Lifetime, factory: Option<Constructor>) -> Self {
        let cached = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            Lifetime::Transient => None,
        };
        Self {
            key,
            lifetime,
            factory,
            cached,
        }
    }

    /// The cached singleton, if one has been constructed.
    #[inline]
    pub(crate) fn cached_instance(&self) -> Option<&AnyArc> {
        self.cached.as_ref().and_then(OnceCell::get)
    }
}

/// Per-type constructor declarations.
#[derive(Default)]
pub(crate) struct ConstructorCatalog {
    by_type: HashMap<Key, Vec<Constructor>>,
}

impl ConstructorCatalog {
    /// Declares `T`'s `Injectable` constructor unless it is already known.
    pub(crate) fn declare_injectable<T: Injectable>(&mut self) {
        let entry = self.by_type.entry(key_of_type::<T>()).or_default();
        if !entry.iter().any(|c| c.source == ConstructorSource::Injectable) {
            entry.push(Constructor::of_injectable::<T>());
        }
    }

    pub(crate) fn declare(&mut self, key: Key, constructor: Constructor) {
        self.by_type.entry(key).or_default().push(constructor);
    }

    pub(crate) fn constructors(&self, key: &Key) -> &[Constructor] {
        self.by_type.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Service registry holding all bindings in registration order
pub(crate) struct Registry {
    pub(crate) bindings: Vec<Binding>,
    pub(crate) catalog: ConstructorCatalog,
    pub(crate) policy: DuplicatePolicy,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            bindings: Vec::new(),
            catalog: ConstructorCatalog::default(),
            policy: DuplicatePolicy::default(),
        }
    }

    pub(crate) fn push(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    /// Finds the binding for `key` according to the duplicate policy.
    #[inline]
    pub(crate) fn lookup(&self, key: &Key) -> DiResult<&Binding> {
        let found = match self.policy {
            DuplicatePolicy::LastWins => self.bindings.iter().rev().find(|b| &b.key == key),
            DuplicatePolicy::FirstWins | DuplicatePolicy::Reject => {
                self.bindings.iter().find(|b| &b.key == key)
            }
        };
        found.ok_or(DiError::NotFound(key.display_name()))
    }

    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.bindings.iter().any(|b| &b.key == key)
    }

    /// The first type bound more than once, in registration order.
    pub(crate) fn first_duplicate(&self) -> Option<Key> {
        self.bindings
            .iter()
            .enumerate()
            .find(|(i, b)| self.bindings[..*i].iter().any(|earlier| earlier.key == b.key))
            .map(|(_, b)| b.key)
    }

    /// Selects the constructor a binding resolves through.
    ///
    /// A binding-local factory wins; otherwise the catalog must hold exactly
    /// one constructor for the type.
    pub(crate) fn constructor_for<'r>(&'r self, binding: &'r Binding) -> DiResult<&'r Constructor> {
        if let Some(factory) = &binding.factory {
            return Ok(factory);
        }
        match self.catalog.constructors(&binding.key) {
            [only] => Ok(only),
            found => Err(DiError::ConstructorAmbiguity {
                service: binding.key.display_name(),
                found: found.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf;

    impl Injectable for Leaf {
        type Deps = ();
        fn inject(_: ()) -> Result<Self, crate::error::BoxError> {
            Ok(Leaf)
        }
    }

    #[test]
    fn lookup_honors_policy() {
        let mut registry = Registry::new();
        registry.push(Binding::new(key_of_type::<Leaf>(), Lifetime::Singleton, None));
        registry.push(Binding::new(key_of_type::<Leaf>(), Lifetime::Transient, None));

        let key = key_of_type::<Leaf>();
        assert_eq!(registry.lookup(&key).unwrap().lifetime, Lifetime::Singleton);

        registry.policy = DuplicatePolicy::LastWins;
        assert_eq!(registry.lookup(&key).unwrap().lifetime, Lifetime::Transient);
        assert_eq!(registry.first_duplicate(), Some(key));
    }

    #[test]
    fn lookup_missing_is_not_found() {
        let registry = Registry::new();
        match registry.lookup(&key_of_type::<Leaf>()) {
            Err(DiError::NotFound(name)) => assert!(name.ends_with("Leaf")),
            _ => panic!("expected NotFound"),
        }
    }

    #[test]
    fn injectable_declared_once() {
        let mut catalog = ConstructorCatalog::default();
        catalog.declare_injectable::<Leaf>();
        catalog.declare_injectable::<Leaf>();
        assert_eq!(catalog.constructors(&key_of_type::<Leaf>()).len(), 1);
    }

    #[test]
    fn transient_binding_has_no_cache() {
        let binding = Binding::new(key_of_type::<Leaf>(), Lifetime::Transient, None);
        assert!(binding.cached.is_none());
        assert!(binding.cached_instance().is_none());
    }
}
