//! Constructor metadata for injectable types.
//!
//! Rust has no runtime reflection over constructors, so a type describes its
//! single constructor explicitly: [`Injectable::Deps`] is the ordered tuple of
//! parameters, and [`Injectable::inject`] is the constructor body. The
//! container reads the parameter keys from the tuple type and resolves them
//! left to right before calling `inject`.

use std::sync::Arc;

use crate::error::{BoxError, DiResult};
use crate::key::{key_of_type, Key};
use crate::provider::ResolverContext;
use crate::traits::Resolver;

/// A type the container can construct from its registered dependencies.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{BoxError, Injectable, ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Clock;
///
/// impl Injectable for Clock {
///     type Deps = ();
///     fn inject(_: ()) -> Result<Self, BoxError> {
///         Ok(Clock)
///     }
/// }
///
/// struct Greeter {
///     clock: Arc<Clock>,
/// }
///
/// impl Injectable for Greeter {
///     type Deps = (Arc<Clock>,);
///     fn inject((clock,): Self::Deps) -> Result<Self, BoxError> {
///         Ok(Greeter { clock })
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton::<Clock>().add_transient::<Greeter>();
///
/// let provider = services.build().unwrap();
/// let a = provider.get_required::<Greeter>();
/// let b = provider.get_required::<Greeter>();
/// assert!(Arc::ptr_eq(&a.clock, &b.clock));
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Constructor parameters, in declaration order.
    type Deps: Dependencies + 'static;

    /// Builds the instance from its resolved parameters.
    fn inject(deps: Self::Deps) -> Result<Self, BoxError>;
}

/// A single constructor parameter.
pub trait Dependency: Sized {
    /// The service type this parameter asks the container for.
    fn key() -> Key;

    /// Resolves the parameter through the given context.
    fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self>;
}

impl<T: Send + Sync + 'static> Dependency for Arc<T> {
    fn key() -> Key {
        key_of_type::<T>()
    }

    fn resolve(ctx: &ResolverContext<'_>) -> DiResult<Self> {
        ctx.get::<T>()
    }
}

/// An ordered constructor parameter list.
///
/// Implemented for `()` and for tuples of up to eight [`Dependency`] values.
pub trait Dependencies: Sized {
    /// Parameter keys in declaration order.
    fn keys() -> Vec<Key>;

    /// Resolves every parameter, depth-first and left to right.
    fn resolve_all(ctx: &ResolverContext<'_>) -> DiResult<Self>;
}

impl Dependencies for () {
    fn keys() -> Vec<Key> {
        Vec::new()
    }

    fn resolve_all(_: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(())
    }
}

macro_rules! impl_dependencies {
    ($($dep:ident),+) => {
        impl<$($dep: Dependency),+> Dependencies for ($($dep,)+) {
            fn keys() -> Vec<Key> {
                vec![$($dep::key()),+]
            }

            fn resolve_all(ctx: &ResolverContext<'_>) -> DiResult<Self> {
                // Tuple fields evaluate in source order.
                Ok(($($dep::resolve(ctx)?,)+))
            }
        }
    };
}

impl_dependencies!(A);
impl_dependencies!(A, B);
impl_dependencies!(A, B, C);
impl_dependencies!(A, B, C, D);
impl_dependencies!(A, B, C, D, E);
impl_dependencies!(A, B, C, D, E, F);
impl_dependencies!(A, B, C, D, E, F, G);
impl_dependencies!(A, B, C, D, E, F, G, H);
