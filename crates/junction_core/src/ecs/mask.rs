//! # Component Masks
//!
//! Fixed-width bit sets over component type identities.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::registry::TypeIdentity;

/// Maximum number of distinct component types a store can hold.
pub const MAX_COMPONENTS: usize = 64;

/// Bit set with one bit per component [`TypeIdentity`].
///
/// Bit `n` is set when the component type with identity `n` is attached.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ComponentMask(u64);

impl ComponentMask {
    /// The mask with no bits set.
    pub const EMPTY: Self = Self(0);

    /// Creates a mask from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns `true` if `identity` fits in the mask.
    #[inline]
    #[must_use]
    pub const fn fits(identity: TypeIdentity) -> bool {
        identity.index() < MAX_COMPONENTS
    }

    /// Creates a mask with only `identity` set.
    ///
    /// # Panics
    ///
    /// Panics if `identity` is outside the mask width.
    #[inline]
    #[must_use]
    pub fn single(identity: TypeIdentity) -> Self {
        let mut mask = Self::EMPTY;
        mask.set(identity);
        mask
    }

    /// Sets the bit for `identity`.
    ///
    /// # Panics
    ///
    /// Panics if `identity` is outside the mask width.
    #[inline]
    pub fn set(&mut self, identity: TypeIdentity) {
        assert!(
            Self::fits(identity),
            "component identity {identity} exceeds mask width {MAX_COMPONENTS}"
        );
        self.0 |= 1u64 << identity.raw();
    }

    /// Clears the bit for `identity`. Out-of-width identities are ignored.
    #[inline]
    pub fn clear(&mut self, identity: TypeIdentity) {
        if Self::fits(identity) {
            self.0 &= !(1u64 << identity.raw());
        }
    }

    /// Returns `true` if the bit for `identity` is set.
    #[inline]
    #[must_use]
    pub const fn test(self, identity: TypeIdentity) -> bool {
        Self::fits(identity) && (self.0 & (1u64 << identity.raw())) != 0
    }

    /// Returns `true` if every bit of `required` is also set here.
    #[inline]
    #[must_use]
    pub const fn contains(self, required: Self) -> bool {
        (self.0 & required.0) == required.0
    }

    /// Returns the union of both masks.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the number of set bits.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns `true` if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the identities whose bits are set, in ascending order.
    pub fn identities(self) -> impl Iterator<Item = TypeIdentity> {
        (0..MAX_COMPONENTS as u32)
            .filter(move |bit| (self.0 & (1u64 << bit)) != 0)
            .map(TypeIdentity::from_raw)
    }
}

impl BitOr for ComponentMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for ComponentMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ComponentMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentMask({:#b})", self.0)
    }
}
