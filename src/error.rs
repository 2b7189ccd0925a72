//! Error types for the dependency injection container.

use std::sync::Arc;

use thiserror::Error;

/// Boxed error returned by fallible constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependency injection errors
///
/// Every failure during registration, validation or resolution surfaces as one
/// of these variants. Errors raised deep inside a dependency graph bubble up
/// through every enclosing resolution unchanged.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build().unwrap();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_inject::DiError;
///
/// let circular = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
/// assert_eq!(circular.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Service not registered
    #[error("Service not found: {0}")]
    NotFound(&'static str),
    /// The service type does not have exactly one constructor
    #[error("Constructor ambiguity for {service}: expected exactly one constructor, found {found}")]
    ConstructorAmbiguity {
        service: &'static str,
        found: usize,
    },
    /// The constructor itself failed
    #[error("Failed to instantiate {service}: {source}")]
    Instantiation {
        service: &'static str,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Same service type bound more than once under the `Reject` policy
    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(&'static str),
    /// Container options could not be loaded
    #[error("Invalid container options: {0}")]
    InvalidOptions(String),
}

impl DiError {
    /// Wraps a constructor failure for `service`.
    pub fn instantiation(service: &'static str, source: impl Into<BoxError>) -> Self {
        DiError::Instantiation {
            service,
            source: Arc::from(source.into()),
        }
    }
}

/// Result type for DI operations
///
/// ```rust
/// use ferrous_inject::{DiResult, DiError};
///
/// fn failing_operation() -> DiResult<()> {
///     Err(DiError::NotFound("some_service"))
/// }
/// assert!(failing_operation().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
