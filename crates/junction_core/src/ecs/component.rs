//! # Component System
//!
//! Components are plain data values attached to entities and stored by value
//! in one pool per component type. They carry no behavior.

use bytemuck::{Pod, Zeroable};

use super::mask::ComponentMask;
use crate::registry::TypeRegistry;

/// Marker trait for ECS components.
///
/// Any `'static` type may be a component; the store assigns its identity on
/// first use, so there is no compile-time registration list.
///
/// # Example
///
/// ```rust
/// use junction_core::ecs::Component;
///
/// struct Health(u32);
///
/// impl Component for Health {}
/// ```
pub trait Component: 'static {}

/// Position component for entities.
///
/// Represents a 2D position in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Component for Position {}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the squared distance to another position.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Advances the position by `velocity` over `dt` seconds.
    #[inline]
    pub fn integrate(&mut self, velocity: Velocity, dt: f32) {
        self.x += velocity.x * dt;
        self.y += velocity.y * dt;
    }
}

/// Velocity component for entities.
///
/// Represents movement speed in world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// X velocity component.
    pub x: f32,
    /// Y velocity component.
    pub y: f32,
}

impl Component for Velocity {}

impl Velocity {
    /// Creates a new velocity.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Zero-sized marker component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tag;

impl Component for Tag {}

/// A set of component types, used to derive a query mask from types.
///
/// Implemented for tuples of one to six components.
pub trait ComponentSet: 'static {
    /// Number of component types in the set.
    const LEN: usize;

    /// Builds the mask for this set from already-registered identities.
    ///
    /// Returns `None` if any type in the set has never been registered,
    /// since no entity can carry it yet.
    fn mask(registry: &TypeRegistry) -> Option<ComponentMask>;
}

macro_rules! impl_component_set {
    ($len:expr; $($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            const LEN: usize = $len;

            fn mask(registry: &TypeRegistry) -> Option<ComponentMask> {
                let mut mask = ComponentMask::EMPTY;
                $(
                    let identity = registry.get::<$name>()?;
                    if !ComponentMask::fits(identity) {
                        return None;
                    }
                    mask.set(identity);
                )+
                Some(mask)
            }
        }
    };
}

impl_component_set!(1; A);
impl_component_set!(2; A, B);
impl_component_set!(3; A, B, C);
impl_component_set!(4; A, B, C, D);
impl_component_set!(5; A, B, C, D, E);
impl_component_set!(6; A, B, C, D, E, F);
