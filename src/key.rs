//! Service key type for the dependency injection container.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key for service storage and lookup.
///
/// A key is the type token the container uses in place of runtime reflection:
/// the `TypeId` identifies the service, the type name is carried along for
/// diagnostics and error messages.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Key, key_of_type};
///
/// let key = key_of_type::<String>();
/// assert_eq!(key.display_name(), "alloc::string::String");
/// assert_eq!(key, key_of_type::<String>());
/// assert_ne!(key, key_of_type::<u32>());
/// ```
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Creates a key from its parts.
    pub fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Get the type name for display
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// The `TypeId` backing this key.
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

// Identity is the TypeId alone; the name is diagnostic only.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::new(TypeId::of::<T>(), std::any::type_name::<T>())
}
