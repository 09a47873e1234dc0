//! # Build-Area Palette
//!
//! Per-rebuild description of which build-area slots hold transformed
//! zones and how. A slot without a descriptor is an identity view of the
//! matching canonical zone; a slot with one names the source address and
//! rotation of the copy occupying it.
//!
//! ## Descriptor Packing
//!
//! A present descriptor travels as a 26-bit value:
//!
//! ```text
//! bits 24-25: source altitude
//! bits 14-23: source origin zone X
//! bits  3-13: source origin zone Z
//! bits  1-2:  rotation (quarter turns)
//! ```
//!
//! The shift and width values are a client contract; they must be kept
//! exactly as written even where the field widths look inconsistent with
//! the address space.

use meridian_world::ALTITUDE_COUNT;

/// Zones per axis of the build area.
pub const BUILD_AREA_ZONES: usize = 13;

const ALTITUDES: usize = ALTITUDE_COUNT as usize;

/// Descriptor for one transformed zone in the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteSlot {
    /// Altitude of the source zone.
    pub source_altitude: u8,
    /// Rotation of the copy in quarter turns (`[0, 4)`).
    pub rotation: u8,
    /// Zone X of the copy's source.
    pub origin_x: u16,
    /// Zone Z of the copy's source.
    pub origin_z: u16,
}

impl PaletteSlot {
    /// Width of the packed descriptor in bits.
    pub const PACKED_BITS: u32 = 26;

    /// Packs the descriptor into its 26-bit wire form.
    #[must_use]
    pub fn pack(&self) -> u32 {
        (u32::from(self.source_altitude & 0x3) << 24)
            | ((u32::from(self.origin_x) & 0x3FF) << 14)
            | ((u32::from(self.origin_z) & 0x7FF) << 3)
            | (u32::from(self.rotation & 0x3) << 1)
    }

    /// Unpacks a descriptor from its 26-bit wire form.
    #[must_use]
    pub fn unpack(raw: u32) -> Self {
        Self {
            source_altitude: ((raw >> 24) & 0x3) as u8,
            rotation: ((raw >> 1) & 0x3) as u8,
            origin_x: ((raw >> 14) & 0x3FF) as u16,
            origin_z: ((raw >> 3) & 0x7FF) as u16,
        }
    }
}

/// 4x13x13 grid of optional descriptors, one per build-area slot per
/// altitude. Iterated altitude-major, then local zone X, then local zone Z.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildAreaPalette {
    slots: [[[Option<PaletteSlot>; BUILD_AREA_ZONES]; BUILD_AREA_ZONES]; ALTITUDES],
}

impl BuildAreaPalette {
    /// Creates an all-identity palette.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [[[None; BUILD_AREA_ZONES]; BUILD_AREA_ZONES]; ALTITUDES],
        }
    }

    /// The descriptor at `(altitude, local_x, local_z)`. Out-of-range slots
    /// read as identity.
    #[inline]
    #[must_use]
    pub fn get(&self, altitude: u8, local_x: usize, local_z: usize) -> Option<PaletteSlot> {
        if usize::from(altitude) < ALTITUDES
            && local_x < BUILD_AREA_ZONES
            && local_z < BUILD_AREA_ZONES
        {
            self.slots[usize::from(altitude)][local_x][local_z]
        } else {
            None
        }
    }

    /// Replaces the descriptor at `(altitude, local_x, local_z)`.
    /// Out-of-range slots are ignored.
    #[inline]
    pub fn set(&mut self, altitude: u8, local_x: usize, local_z: usize, slot: Option<PaletteSlot>) {
        if usize::from(altitude) < ALTITUDES
            && local_x < BUILD_AREA_ZONES
            && local_z < BUILD_AREA_ZONES
        {
            self.slots[usize::from(altitude)][local_x][local_z] = slot;
        }
    }

    /// Resets every slot to identity.
    pub fn clear(&mut self) {
        self.slots = [[[None; BUILD_AREA_ZONES]; BUILD_AREA_ZONES]; ALTITUDES];
    }

    /// True if any slot holds a transformed-zone descriptor. Decides which
    /// of the two wire events a rebuild emits.
    #[must_use]
    pub fn has_dynamic(&self) -> bool {
        self.slots
            .iter()
            .flatten()
            .flatten()
            .any(Option::is_some)
    }
}

impl Default for BuildAreaPalette {
    fn default() -> Self {
        Self::new()
    }
}
