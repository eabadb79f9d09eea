//! Collision masks for filtering candidate pairs
//!
//! A mask is an opaque 31-bit value stored per entity in the spatial
//! index's auxiliary data. The named bits are conventions for game code; the
//! collider only ever compares whole masks.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// 31-bit collision mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct CollisionMask: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Enemy character layer
        const ENEMY = 1 << 1;
        /// Projectiles (bullets, missiles, etc.)
        const PROJECTILE = 1 << 2;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 3;
        /// Trigger volumes (no physical response)
        const TRIGGER = 1 << 4;
        /// Debris and small physics objects
        const DEBRIS = 1 << 5;
        /// Vehicles
        const VEHICLE = 1 << 6;
        /// Pickups and collectibles
        const PICKUP = 1 << 7;
        /// Every usable bit (bits 0-30)
        const ALL = 0x7FFF_FFFF;
    }
}

impl CollisionMask {
    /// No bits set; what a detached collider leaves behind
    pub const NONE: Self = Self::empty();

    /// Custom layer bit `n` (8-30); out-of-range bits yield an empty mask
    pub const fn custom(bit: u32) -> Self {
        if bit >= 8 && bit <= 30 {
            Self::from_bits_retain(1 << bit)
        } else {
            Self::empty()
        }
    }

    /// Build a mask from raw bits, discarding bit 31
    pub const fn from_raw(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// Helper to create a mask from multiple layers
    ///
    /// # Example
    /// ```
    /// use sat_engine::physics::CollisionMask;
    ///
    /// let mask = CollisionMask::mask(&[CollisionMask::PLAYER, CollisionMask::ENEMY]);
    /// assert_eq!(mask, CollisionMask::PLAYER | CollisionMask::ENEMY);
    /// ```
    pub fn mask(layers: &[Self]) -> Self {
        layers.iter().fold(Self::empty(), |acc, &layer| acc | layer)
    }
}

impl Default for CollisionMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// How a collider compares its own mask against a candidate's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaskFilter {
    /// `(host & target) <= host`. Clearing bits can never make a value
    /// larger, so this admits every pair; masks then only matter through
    /// the same-mask rule of `test_collision`.
    #[default]
    Literal,
    /// `(host & target) != 0`: the masks must share at least one bit
    Intersecting,
}

impl MaskFilter {
    /// Whether a candidate with `target` passes a host with `host`
    pub const fn passes(self, host: CollisionMask, target: CollisionMask) -> bool {
        match self {
            Self::Literal => (host.bits() & target.bits()) <= host.bits(),
            Self::Intersecting => host.intersects(target),
        }
    }
}
