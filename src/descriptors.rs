//! Service descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{ConstructorSource, Registry};

/// Service descriptor for introspection and diagnostics
///
/// One descriptor per binding, in registration order. Duplicate registrations
/// show up as separate descriptors.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{BoxError, ConstructorSource, Injectable, Lifetime, ServiceCollection};
/// use std::sync::Arc;
///
/// struct Config;
/// impl Injectable for Config {
///     type Deps = ();
///     fn inject(_: ()) -> Result<Self, BoxError> { Ok(Config) }
/// }
///
/// struct Repository { config: Arc<Config> }
/// impl Injectable for Repository {
///     type Deps = (Arc<Config>,);
///     fn inject((config,): Self::Deps) -> Result<Self, BoxError> { Ok(Repository { config }) }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton::<Config>().add_transient::<Repository>();
///
/// let descriptors = services.get_service_descriptors();
/// let repo = descriptors.iter()
///     .find(|d| d.type_name().ends_with("Repository"))
///     .unwrap();
/// assert_eq!(repo.lifetime, Lifetime::Transient);
/// assert_eq!(repo.constructor, Some(ConstructorSource::Injectable));
/// assert_eq!(repo.dependency_names().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// The service key
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Origin of the constructor this binding resolves through, if exactly one applies
    pub constructor: Option<ConstructorSource>,
    /// Number of candidate constructors (binding factory counts as one)
    pub constructor_count: usize,
    /// Declared parameter keys, `None` when hidden in a factory or ambiguous
    pub dependencies: Option<Vec<Key>>,
    /// Whether a singleton instance has been cached
    pub instantiated: bool,
}

impl ServiceDescriptor {
    /// Get the type name
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Declared parameter type names, in order.
    pub fn dependency_names(&self) -> Option<Vec<&'static str>> {
        self.dependencies
            .as_ref()
            .map(|deps| deps.iter().map(Key::display_name).collect())
    }
}

pub(crate) fn describe(registry: &Registry) -> Vec<ServiceDescriptor> {
    registry
        .bindings
        .iter()
        .map(|binding| {
            let constructor_count = if binding.factory.is_some() {
                1
            } else {
                registry.catalog.constructors(&binding.key).len()
            };
            let selected = registry.constructor_for(binding).ok();
            ServiceDescriptor {
                key: binding.key,
                lifetime: binding.lifetime,
                constructor: selected.map(|c| c.source),
                constructor_count,
                dependencies: selected.and_then(|c| c.dependencies.clone()),
                instantiated: binding.cached_instance().is_some(),
            }
        })
        .collect()
}
