//! Service module system for modular registration.
//!
//! Modules group related registrations so an application can assemble its
//! container from reusable pieces.

use crate::{DiResult, ServiceCollection};

/// A module that can register services with a ServiceCollection.
///
/// # Example
///
/// ```rust
/// use ferrous_inject::{BoxError, DiResult, Injectable, ServiceCollection, ServiceModule, Resolver};
/// use std::sync::Arc;
///
/// struct UserConfig;
/// impl Injectable for UserConfig {
///     type Deps = ();
///     fn inject(_: ()) -> Result<Self, BoxError> { Ok(UserConfig) }
/// }
///
/// struct UserService { config: Arc<UserConfig> }
/// impl Injectable for UserService {
///     type Deps = (Arc<UserConfig>,);
///     fn inject((config,): Self::Deps) -> Result<Self, BoxError> { Ok(UserService { config }) }
/// }
///
/// struct UserModule;
///
/// impl ServiceModule for UserModule {
///     fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.add_singleton::<UserConfig>().add_transient::<UserService>();
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mut services = ServiceCollection::new();
/// services.add_module(UserModule)?;
/// let provider = services.build()?;
/// let _users = provider.get::<UserService>()?;
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Register this module's services with the ServiceCollection.
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()>;
}

impl ServiceCollection {
    /// Adds a module's registrations to this collection.
    pub fn add_module<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register_services(self)?;
        Ok(self)
    }
}
