//! # Type Registry
//!
//! Assigns dense, zero-based integer identities to Rust types on first use.
//!
//! Identities are handed out by an explicit registry object rather than by a
//! process-wide counter. The entity store owns one registry for component
//! types and the event bus owns another for event types, so each identity is
//! stable for the life of its owner and the two namespaces never share bits.
//!
//! # Thread Safety
//!
//! The registry is NOT thread-safe. Identity allocation takes `&mut self`;
//! callers sharing a registry across threads must serialize access.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Dense identity of a registered type.
///
/// Used as an array index into per-type tables, never as a hash key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TypeIdentity(u32);

impl TypeIdentity {
    /// Creates an identity from its raw value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the identity as a table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registry mapping Rust types to [`TypeIdentity`] values.
///
/// # Example
///
/// ```rust
/// use junction_core::TypeRegistry;
///
/// struct Health(u32);
/// struct Armor(u32);
///
/// let mut registry = TypeRegistry::new();
/// let health = registry.identity_of::<Health>();
/// let armor = registry.identity_of::<Armor>();
///
/// assert_eq!(health.index(), 0);
/// assert_eq!(armor.index(), 1);
/// assert_eq!(registry.identity_of::<Health>(), health);
/// ```
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Cached identity per type.
    identities: HashMap<TypeId, TypeIdentity>,
    /// Type names indexed by identity.
    names: Vec<&'static str>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identity of `T`, allocating the next one on first use.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` distinct types are registered.
    pub fn identity_of<T: 'static>(&mut self) -> TypeIdentity {
        if let Some(&identity) = self.identities.get(&TypeId::of::<T>()) {
            return identity;
        }

        let raw = u32::try_from(self.names.len()).unwrap_or_else(|_| {
            panic!("type registry exhausted while registering {}", type_name::<T>())
        });
        let identity = TypeIdentity(raw);
        self.identities.insert(TypeId::of::<T>(), identity);
        self.names.push(type_name::<T>());

        tracing::trace!(type_name = type_name::<T>(), identity = raw, "registered type");
        identity
    }

    /// Returns the identity of `T` if it has been registered.
    #[inline]
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<TypeIdentity> {
        self.identities.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the identity `T` would receive, without registering it.
    #[inline]
    #[must_use]
    pub fn peek_next(&self) -> TypeIdentity {
        TypeIdentity(u32::try_from(self.names.len()).unwrap_or(u32::MAX))
    }

    /// Returns the name of the type behind `identity`.
    #[must_use]
    pub fn type_name(&self, identity: TypeIdentity) -> Option<&'static str> {
        self.names.get(identity.index()).copied()
    }

    /// Returns the number of registered types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no type has been registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;
    struct Gamma;

    #[test]
    fn test_identities_are_dense_and_sequential() {
        let mut registry = TypeRegistry::new();
        assert_eq!(registry.identity_of::<Alpha>().index(), 0);
        assert_eq!(registry.identity_of::<Beta>().index(), 1);
        assert_eq!(registry.identity_of::<Gamma>().index(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_identity_is_stable() {
        let mut registry = TypeRegistry::new();
        let first = registry.identity_of::<Beta>();
        let _ = registry.identity_of::<Alpha>();
        assert_eq!(registry.identity_of::<Beta>(), first);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_get_does_not_register() {
        let mut registry = TypeRegistry::new();
        assert!(registry.get::<Alpha>().is_none());
        assert!(registry.is_empty());

        let id = registry.identity_of::<Alpha>();
        assert_eq!(registry.get::<Alpha>(), Some(id));
    }

    #[test]
    fn test_registries_are_independent() {
        let mut components = TypeRegistry::new();
        let mut events = TypeRegistry::new();
        let _ = components.identity_of::<Alpha>();

        // Each registry numbers its own types from zero.
        assert_eq!(events.identity_of::<Beta>().index(), 0);
        assert_eq!(components.identity_of::<Beta>().index(), 1);
    }

    #[test]
    fn test_type_names() {
        let mut registry = TypeRegistry::new();
        let id = registry.identity_of::<Gamma>();
        assert!(registry.type_name(id).unwrap().ends_with("Gamma"));
        assert!(registry.type_name(TypeIdentity::from_raw(9)).is_none());
        assert_eq!(registry.peek_next().index(), 1);
    }
}
