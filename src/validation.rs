//! Build-time validation of service registrations.
//!
//! Validation walks the declared constructor parameters of every registered
//! service without constructing anything, so configuration mistakes surface
//! at startup instead of on the first request that happens to hit them.
//!
//! Rules:
//!
//! - **Missing dependency**: error, a declared parameter type is not registered
//! - **Constructor ambiguity**: error, zero or several constructors for a type
//! - **Circular dependency**: error, declared parameters form a cycle
//! - **Singleton → Transient**: warning, the singleton keeps one transient forever
//! - **Opaque factory**: warning, dependencies of a factory cannot be walked

use std::collections::{HashMap, HashSet};

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::Registry;

/// A validation error that prevents safe DI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required dependency is not registered
    MissingDependency {
        service: &'static str,
        dependency: &'static str,
    },
    /// Not exactly one constructor for the service
    ConstructorAmbiguity {
        service: &'static str,
        found: usize,
    },
    /// Circular dependency detected; the first and last entries are the same type
    CircularDependency {
        path: Vec<&'static str>,
    },
}

/// A validation warning about potentially problematic configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Singleton depends on transient (will always get same instance)
    CaptiveTransient {
        singleton: &'static str,
        transient: &'static str,
    },
    /// Factory dependencies are not declared and were not checked
    OpaqueFactory {
        service: &'static str,
    },
}

/// Result of validating a service collection.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{BoxError, Injectable, ServiceCollection, ValidationError};
/// use std::sync::Arc;
///
/// struct Missing;
/// struct Needy(Arc<Missing>);
///
/// impl Injectable for Needy {
///     type Deps = (Arc<Missing>,);
///     fn inject((m,): Self::Deps) -> Result<Self, BoxError> { Ok(Needy(m)) }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_transient::<Needy>();
///
/// let report = services.validate();
/// assert!(!report.is_valid());
/// assert!(matches!(report.errors[0], ValidationError::MissingDependency { .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Errors that will make resolution fail
    pub errors: Vec<ValidationError>,
    /// Warnings about potentially problematic configurations
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts the first error into the `DiError` resolution would have produced.
    pub fn into_result(self) -> DiResult<Vec<ValidationWarning>> {
        match self.errors.into_iter().next() {
            None => Ok(self.warnings),
            Some(ValidationError::MissingDependency { dependency, .. }) => Err(DiError::NotFound(dependency)),
            Some(ValidationError::ConstructorAmbiguity { service, found }) => {
                Err(DiError::ConstructorAmbiguity { service, found })
            }
            Some(ValidationError::CircularDependency { path }) => Err(DiError::Circular(path)),
        }
    }
}

pub(crate) fn validate(registry: &Registry) -> ValidationResult {
    let mut result = ValidationResult::default();

    // Effective edges per distinct registered key, in registration order.
    let mut order: Vec<Key> = Vec::new();
    let mut edges: HashMap<Key, Vec<Key>> = HashMap::new();

    for binding in &registry.bindings {
        if edges.contains_key(&binding.key) {
            continue;
        }
        // Lookup applies the duplicate policy, so this is the binding resolution would use.
        let Ok(effective) = registry.lookup(&binding.key) else {
            continue;
        };
        let service = effective.key.display_name();
        let deps = match registry.constructor_for(effective) {
            Ok(constructor) => match &constructor.dependencies {
                Some(deps) => deps.clone(),
                None => {
                    result.warnings.push(ValidationWarning::OpaqueFactory { service });
                    Vec::new()
                }
            },
            Err(DiError::ConstructorAmbiguity { found, .. }) => {
                result.errors.push(ValidationError::ConstructorAmbiguity { service, found });
                Vec::new()
            }
            Err(_) => Vec::new(),
        };

        for dep in &deps {
            match registry.lookup(dep) {
                Err(_) => result.errors.push(ValidationError::MissingDependency {
                    service,
                    dependency: dep.display_name(),
                }),
                Ok(dep_binding) => {
                    if effective.lifetime == Lifetime::Singleton && dep_binding.lifetime == Lifetime::Transient {
                        result.warnings.push(ValidationWarning::CaptiveTransient {
                            singleton: service,
                            transient: dep.display_name(),
                        });
                    }
                }
            }
        }

        order.push(effective.key);
        edges.insert(effective.key, deps);
    }

    find_cycles(&order, &edges, &mut result.errors);
    result
}

/// The first cycle among declared constructor parameters, if any.
pub(crate) fn declared_cycle(registry: &Registry) -> Option<Vec<&'static str>> {
    validate(registry).errors.into_iter().find_map(|error| match error {
        ValidationError::CircularDependency { path } => Some(path),
        _ => None,
    })
}

fn find_cycles(order: &[Key], edges: &HashMap<Key, Vec<Key>>, errors: &mut Vec<ValidationError>) {
    let mut done: HashSet<Key> = HashSet::new();
    let mut reported: HashSet<Vec<&'static str>> = HashSet::new();

    for root in order {
        let mut stack: Vec<Key> = Vec::new();
        visit(*root, edges, &mut stack, &mut done, &mut reported, errors);
    }
}

fn visit(
    key: Key,
    edges: &HashMap<Key, Vec<Key>>,
    stack: &mut Vec<Key>,
    done: &mut HashSet<Key>,
    reported: &mut HashSet<Vec<&'static str>>,
    errors: &mut Vec<ValidationError>,
) {
    if done.contains(&key) {
        return;
    }
    if let Some(pos) = stack.iter().position(|k| *k == key) {
        let mut path: Vec<&'static str> = stack[pos..].iter().map(Key::display_name).collect();
        path.push(key.display_name());
        if reported.insert(path.clone()) {
            errors.push(ValidationError::CircularDependency { path });
        }
        return;
    }

    stack.push(key);
    for dep in edges.get(&key).into_iter().flatten() {
        visit(*dep, edges, stack, done, reported, errors);
    }
    stack.pop();
    done.insert(key);
}
