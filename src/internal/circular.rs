//! Circular dependency detection infrastructure.
//!
//! Each nested resolution pushes a frame that links back to its parent, so
//! the chain of frames is exactly the path from the root request to the
//! service being built. Frames live on the stack of the resolving call and
//! never escape it.

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// One step of an in-progress resolution path.
pub(crate) struct ResolutionFrame<'a> {
    key: Key,
    depth: usize,
    parent: Option<&'a ResolutionFrame<'a>>,
}

impl<'a> ResolutionFrame<'a> {
    /// Enters `key` below `parent`.
    ///
    /// Fails with [`DiError::Circular`] if `key` is already being resolved on
    /// this path, and with [`DiError::DepthExceeded`] past `max_depth`.
    pub(crate) fn enter(
        key: Key,
        parent: Option<&'a ResolutionFrame<'a>>,
        max_depth: usize,
    ) -> DiResult<Self> {
        if parent.is_some_and(|p| p.contains(&key)) {
            let mut path = parent.map(ResolutionFrame::path).unwrap_or_default();
            path.push(key.display_name());
            return Err(DiError::Circular(path));
        }

        let depth = parent.map_or(0, |p| p.depth + 1);
        if depth >= max_depth {
            return Err(DiError::DepthExceeded(depth));
        }

        Ok(Self { key, depth, parent })
    }

    fn contains(&self, key: &Key) -> bool {
        self.ancestors().any(|frame| &frame.key == key)
    }

    pub(crate) fn key(&self) -> Key {
        self.key
    }

    /// Type names from the root request down to this frame.
    pub(crate) fn path(&self) -> Vec<&'static str> {
        let mut path: Vec<_> = self.ancestors().map(|f| f.key.display_name()).collect();
        path.reverse();
        path
    }

    fn ancestors(&self) -> impl Iterator<Item = &ResolutionFrame<'a>> {
        std::iter::successors(Some(self), |frame| frame.parent)
    }
}
