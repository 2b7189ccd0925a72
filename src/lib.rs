//! # ferrous-inject
//!
//! Minimal constructor-based dependency injection for Rust.
//!
//! ## Features
//!
//! - **Constructor injection**: types declare their single constructor through
//!   [`Injectable`]; the container resolves each parameter recursively,
//!   depth-first and left to right
//! - **Two lifetimes**: Singleton (one shared instance per provider) and
//!   Transient (fresh instance per request)
//! - **Thread-safe singletons**: concurrent first requests construct exactly once
//! - **Circular dependency detection**: cycles fail with the full resolution path
//! - **Static validation**: missing registrations and cycles found before anything is built
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_inject::{BoxError, Injectable, ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! impl Injectable for Database {
//!     type Deps = ();
//!     fn inject(_: ()) -> Result<Self, BoxError> {
//!         Ok(Database { connection_string: "postgres://localhost".to_string() })
//!     }
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     type Deps = (Arc<Database>,);
//!     fn inject((db,): Self::Deps) -> Result<Self, BoxError> {
//!         Ok(UserService { db })
//!     }
//! }
//!
//! // Register services
//! let mut services = ServiceCollection::new();
//! services
//!     .add_singleton::<Database>()
//!     .add_transient::<UserService>();
//!
//! // Build and use the service provider
//! let provider = services.build().unwrap();
//! let user_service = provider.get_required::<UserService>();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: Created once and shared across the entire provider
//! - **Transient**: Created fresh on every resolution
//!
//! ## Duplicate registrations
//!
//! Registering a type twice keeps both bindings. Which one resolves is set by
//! [`DuplicatePolicy`]: the first (default), the last, or neither, in which
//! case [`ServiceCollection::build`] fails.

// Module declarations
pub mod collection;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod inject;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod provider;
pub mod traits;
pub mod validation;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use collection::{ServiceCollection, ServiceModule};
pub use config::{ContainerOptions, DuplicatePolicy, DEFAULT_MAX_DEPTH};
pub use descriptors::ServiceDescriptor;
pub use error::{BoxError, DiError, DiResult};
pub use inject::{Dependencies, Dependency, Injectable};
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver, RecordingObserver, ResolutionEvent};
pub use provider::{ResolverContext, ServiceProvider};
pub use registration::ConstructorSource;
pub use traits::{Resolver, ResolverCore};
pub use validation::{ValidationError, ValidationResult, ValidationWarning};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Injectable for Counted {
        type Deps = ();
        fn inject(_: ()) -> Result<Self, BoxError> {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Ok(Counted)
        }
    }

    #[test]
    fn test_singleton_resolution() {
        let mut sc = ServiceCollection::new();
        sc.add_instance(42usize);

        let sp = sc.build().unwrap();
        let a = sp.get_required::<usize>();
        let b = sp.get_required::<usize>();

        assert_eq!(*a, 42);
        assert!(Arc::ptr_eq(&a, &b)); // Same instance
    }

    #[test]
    fn test_transient_resolution() {
        let mut sc = ServiceCollection::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        sc.add_transient_factory::<String, _>(move |_| {
            let n = counter_clone.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("instance-{}", n))
        });

        let sp = sc.build().unwrap();
        let a = sp.get_required::<String>();
        let b = sp.get_required::<String>();

        assert_eq!(a.as_str(), "instance-1");
        assert_eq!(b.as_str(), "instance-2");
        assert!(!Arc::ptr_eq(&a, &b)); // Different instances
    }

    #[test]
    fn test_singleton_constructed_once_per_provider() {
        let before = BUILT.load(Ordering::SeqCst);
        let mut sc = ServiceCollection::new();
        sc.add_singleton::<Counted>();
        let sp = sc.build().unwrap();

        for _ in 0..5 {
            sp.get_required::<Counted>();
        }
        assert_eq!(BUILT.load(Ordering::SeqCst) - before, 1);
    }

    #[test]
    fn test_providers_do_not_share_singletons() {
        let build = || {
            let mut sc = ServiceCollection::new();
            sc.add_singleton_factory::<Vec<u8>, _>(|_| Ok(vec![1, 2, 3]));
            sc.build().unwrap()
        };
        let first = build().get_required::<Vec<u8>>();
        let second = build().get_required::<Vec<u8>>();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
