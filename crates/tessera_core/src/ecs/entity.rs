//! # Entity Handles
//!
//! Entities are opaque 32-bit identifiers consisting of:
//! - An index into the registry's slot table (low bits)
//! - A generation counter for safe slot reuse (high bits)

use std::fmt;

use bytemuck::{Pod, Zeroable};

/// Number of bits reserved for the slot index.
pub const INDEX_BITS: u32 = 20;

/// Number of bits reserved for the generation counter.
pub const GENERATION_BITS: u32 = 12;

/// Mask selecting the index bits of a handle.
pub const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

/// Mask selecting the generation bits (after shifting down).
pub const GENERATION_MASK: u32 = (1 << GENERATION_BITS) - 1;

/// Largest representable slot index.
///
/// The registry never allocates this index: `make(MAX_INDEX, MAX_GENERATION)`
/// has the same bit pattern as [`Entity::NULL`].
pub const MAX_INDEX: u32 = INDEX_MASK;

/// Largest representable generation.
pub const MAX_GENERATION: u32 = GENERATION_MASK;

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 20 bits: slot index
/// - Upper 12 bits: generation counter for detecting stale references
///
/// Handles are plain data. Whether a handle is *alive* is only known to the
/// [`Registry`](super::Registry) that issued it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Null/invalid entity handle.
    pub const NULL: Self = Self(u32::MAX);

    /// Creates a handle from an index and a generation.
    ///
    /// Both fields are masked to their bit widths. Callers building handles by
    /// hand are responsible for staying in range; this is only checked in
    /// debug builds.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        debug_assert!(index <= INDEX_MASK, "entity index exceeds INDEX_BITS");
        debug_assert!(
            generation <= GENERATION_MASK,
            "entity generation exceeds GENERATION_BITS"
        );
        Self(((generation & GENERATION_MASK) << INDEX_BITS) | (index & INDEX_MASK))
    }

    /// Returns the index portion of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 & INDEX_MASK
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> INDEX_BITS) & GENERATION_MASK
    }

    /// Checks if this handle is the null sentinel.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    /// Returns the raw packed value.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Rebuilds a handle from a raw packed value.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Entity(null)")
        } else {
            write!(f, "Entity({}:{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("null")
        } else {
            write!(f, "{}:{}", self.index(), self.generation())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_roundtrip() {
        for &(index, generation) in &[
            (0, 0),
            (1, 0),
            (12345, 678),
            (MAX_INDEX - 1, MAX_GENERATION),
            (MAX_INDEX, 0),
        ] {
            let e = Entity::new(index, generation);
            assert_eq!(e.index(), index);
            assert_eq!(e.generation(), generation);
        }
    }

    #[test]
    fn test_null_sentinel() {
        assert!(Entity::NULL.is_null());
        assert!(Entity::default().is_null());
        assert!(!Entity::new(0, 0).is_null());
        // The all-ones pattern is reserved.
        assert_eq!(Entity::new(MAX_INDEX, MAX_GENERATION), Entity::NULL);
    }

    #[test]
    fn test_bit_layout() {
        let e = Entity::new(3, 2);
        assert_eq!(e.to_bits(), (2 << INDEX_BITS) | 3);
        assert_eq!(Entity::from_bits(e.to_bits()), e);
        assert_eq!(std::mem::size_of::<Entity>(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(Entity::new(7, 1).to_string(), "7:1");
        assert_eq!(Entity::NULL.to_string(), "null");
        assert_eq!(format!("{:?}", Entity::new(7, 1)), "Entity(7:1)");
    }

    #[test]
    fn test_entities_cast_to_bytes() {
        let entities = [Entity::new(1, 0), Entity::new(2, 3)];
        let bytes: &[u8] = bytemuck::cast_slice(&entities);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &1u32.to_ne_bytes());
    }
}
