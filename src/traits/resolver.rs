//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{key_of_type, Key};
use crate::registration::AnyArc;

/// Core resolver trait for object-safe service resolution.
///
/// Works on type-erased instances so it can be used as a trait object.
/// Most callers want [`Resolver`], which adds typed methods on top.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service by key.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The resolved service wrapped in `Arc<dyn Any>`
    /// * `Err(DiError)` - Not found, constructor ambiguity, instantiation
    ///   failure, circular dependency or depth exceeded
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc>;
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// Both `ServiceProvider` and the `ResolverContext` passed to factories
/// implement this trait, so factory code resolves its dependencies the same
/// way application code does.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ServiceCollection, Resolver};
///
/// let mut collection = ServiceCollection::new();
/// collection.add_instance(42usize);
///
/// let provider = collection.build().unwrap();
/// let number = provider.get_required::<usize>();
/// assert_eq!(*number, 42);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_inject::{ServiceCollection, Resolver};
    ///
    /// let mut collection = ServiceCollection::new();
    /// collection.add_instance("configuration".to_string());
    ///
    /// let provider = collection.build().unwrap();
    /// let config = provider.get::<String>().unwrap();
    /// assert_eq!(&*config, "configuration");
    /// ```
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&key_of_type::<T>())?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete service type, panicking on failure.
    ///
    /// Convenient in application wiring where a missing service is a
    /// programming error. Factories should prefer [`get`](Self::get) with `?`.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
