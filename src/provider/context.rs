//! Resolver context for dependency injection.
//!
//! This module contains the ResolverContext type which provides
//! the interface for constructors and factories to resolve dependencies.

use crate::error::DiResult;
use crate::internal::ResolutionFrame;
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

use super::ServiceProvider;

/// Context passed to factory functions for resolving dependencies.
///
/// A context remembers where in the dependency graph it was created, so a
/// factory that asks for a service already being resolved on the same path
/// gets [`DiError::Circular`](crate::DiError::Circular) instead of recursing
/// forever.
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
/// let mut services = ServiceCollection::new();
/// services.add_instance(Database {
///     url: "postgres://localhost".to_string()
/// });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     // resolver is a ResolverContext that provides access to other services
///     Ok(UserService {
///         db: resolver.get::<Database>()?,
///     })
/// });
///
/// let provider = services.build().unwrap();
/// assert_eq!(provider.get_required::<UserService>().db.url, "postgres://localhost");
/// ```
pub struct ResolverContext<'a> {
    provider: &'a ServiceProvider,
    frame: Option<&'a ResolutionFrame<'a>>,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn nested(provider: &'a ServiceProvider, frame: &'a ResolutionFrame<'a>) -> Self {
        Self {
            provider,
            frame: Some(frame),
        }
    }

    /// Type names from the root request down to the service being built.
    pub fn resolution_path(&self) -> Vec<&'static str> {
        self.frame.map(ResolutionFrame::path).unwrap_or_default()
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.provider.resolve_in(key, self.frame)
    }
}
