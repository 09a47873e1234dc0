//! # Collision Matrix
//!
//! Per-zone grid of per-tile traversal flags. The matrix is owned
//! exclusively by its zone and is only mutated through explicit
//! get/set/rotate operations; it is never implicitly resized.
//!
//! ## Rotation
//!
//! Rotation is a single pure function parameterized by quarter-turn count.
//! One clockwise turn of a `width x length` matrix produces a
//! `length x width` matrix where `result[x][z] = original[length - z - 1][x]`.
//! Four turns are the identity, and flag values are carried bit-exact.

/// Per-tile traversal flag bits.
pub mod flag {
    /// Tile blocks walking.
    pub const BLOCK_WALK: u32 = 1 << 0;
    /// Tile blocks projectiles.
    pub const BLOCK_PROJECTILE: u32 = 1 << 1;
    /// Tile carries blocking floor decoration.
    pub const FLOOR_DECOR: u32 = 1 << 2;
    /// Tile carries a blocking floor.
    pub const FLOOR: u32 = 1 << 3;
    /// Tile is covered by a roof.
    pub const ROOF: u32 = 1 << 4;
}

/// A `width x length` grid of per-tile flag sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionMatrix {
    width: u8,
    length: u8,
    flags: Vec<u32>,
}

impl CollisionMatrix {
    /// Creates a zeroed matrix of the given dimensions.
    #[must_use]
    pub fn new(width: u8, length: u8) -> Self {
        Self {
            width,
            length,
            flags: vec![0; usize::from(width) * usize::from(length)],
        }
    }

    /// Creates a zeroed matrix sized for one zone (8x8).
    #[must_use]
    pub fn for_zone() -> Self {
        Self::new(8, 8)
    }

    /// Matrix width in tiles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Matrix length in tiles.
    #[inline]
    #[must_use]
    pub const fn length(&self) -> u8 {
        self.length
    }

    /// Gets the flags at `(x, z)`. Out-of-range coordinates read as empty.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u8, z: u8) -> u32 {
        if x < self.width && z < self.length {
            self.flags[usize::from(z) * usize::from(self.width) + usize::from(x)]
        } else {
            0
        }
    }

    /// Replaces the flags at `(x, z)`. Out-of-range coordinates are ignored.
    #[inline]
    pub fn set(&mut self, x: u8, z: u8, flags: u32) {
        if x < self.width && z < self.length {
            self.flags[usize::from(z) * usize::from(self.width) + usize::from(x)] = flags;
        }
    }

    /// Adds flag bits at `(x, z)`.
    #[inline]
    pub fn add(&mut self, x: u8, z: u8, flags: u32) {
        let current = self.get(x, z);
        self.set(x, z, current | flags);
    }

    /// Removes flag bits at `(x, z)`.
    #[inline]
    pub fn remove(&mut self, x: u8, z: u8, flags: u32) {
        let current = self.get(x, z);
        self.set(x, z, current & !flags);
    }

    /// Returns this matrix rotated clockwise by `turns` quarter turns
    /// (`turns` is taken modulo 4).
    #[must_use]
    pub fn rotated(&self, turns: u8) -> Self {
        let mut out = self.clone();
        for _ in 0..turns % 4 {
            out = out.rotated_once();
        }
        out
    }

    /// One clockwise quarter turn.
    fn rotated_once(&self) -> Self {
        let mut out = Self::new(self.length, self.width);
        for x in 0..out.width {
            for z in 0..out.length {
                let Some(src_x) = self.length.checked_sub(z + 1) else {
                    continue;
                };
                out.set(x, z, self.get(src_x, x));
            }
        }
        out
    }
}

impl Default for CollisionMatrix {
    fn default() -> Self {
        Self::for_zone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned() -> CollisionMatrix {
        let mut matrix = CollisionMatrix::for_zone();
        matrix.set(0, 0, flag::BLOCK_WALK);
        matrix.set(3, 5, flag::BLOCK_WALK | flag::BLOCK_PROJECTILE);
        matrix.set(7, 7, flag::FLOOR | flag::ROOF);
        matrix.set(2, 6, 0xDEAD_BEEF);
        matrix
    }

    #[test]
    fn test_get_set_bounds() {
        let mut matrix = CollisionMatrix::for_zone();
        matrix.set(8, 0, flag::BLOCK_WALK); // ignored
        assert_eq!(matrix.get(8, 0), 0);
        matrix.set(1, 1, flag::FLOOR);
        matrix.add(1, 1, flag::ROOF);
        assert_eq!(matrix.get(1, 1), flag::FLOOR | flag::ROOF);
        matrix.remove(1, 1, flag::FLOOR);
        assert_eq!(matrix.get(1, 1), flag::ROOF);
    }

    #[test]
    fn test_single_turn_mapping() {
        let mut matrix = CollisionMatrix::for_zone();
        matrix.set(0, 0, flag::BLOCK_WALK);
        let turned = matrix.rotated(1);
        // result[x][z] = original[length - z - 1][x]
        assert_eq!(turned.get(0, 7), flag::BLOCK_WALK);
        assert_eq!(turned.get(0, 0), 0);
    }

    #[test]
    fn test_four_turns_identity() {
        let matrix = patterned();
        assert_eq!(matrix.rotated(4), matrix);
        assert_eq!(matrix.rotated(0), matrix);
    }

    #[test]
    fn test_inverse_turns_identity() {
        let matrix = patterned();
        assert_eq!(matrix.rotated(1).rotated(3), matrix);
        assert_eq!(matrix.rotated(2).rotated(2), matrix);
    }

    #[test]
    fn test_rotation_preserves_flag_values() {
        let matrix = patterned();
        let turned = matrix.rotated(1);
        let mut values: Vec<u32> = Vec::new();
        let mut turned_values: Vec<u32> = Vec::new();
        for x in 0..8 {
            for z in 0..8 {
                values.push(matrix.get(x, z));
                turned_values.push(turned.get(x, z));
            }
        }
        values.sort_unstable();
        turned_values.sort_unstable();
        assert_eq!(values, turned_values);
        assert!(turned_values.contains(&0xDEAD_BEEF));
    }

    #[test]
    fn test_random_matrices_identity() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x4D45_5249);
        for _ in 0..32 {
            let mut matrix = CollisionMatrix::for_zone();
            for x in 0..8 {
                for z in 0..8 {
                    matrix.set(x, z, rng.gen());
                }
            }
            assert_eq!(matrix.rotated(4), matrix);
            assert_eq!(matrix.rotated(3).rotated(1), matrix);
        }
    }
}
