//! # Rebuild Event Serialization
//!
//! Bit-exact framing for the two rebuild events.
//!
//! ## Design
//!
//! - Pre-allocated buffer, bounds-checked writes returning `bool`
//! - Little-endian integers, Pod header written directly
//! - MSB-first bit packing for the palette section, byte-aligned after it
//!
//! Key-group lengths are never encoded: both sides derive the per-group
//! key count from shared configuration, so decoding takes it from the
//! caller.

use super::packets::{DynamicRebuild, KeySet, RebuildEvent, RebuildHeader, StaticRebuild};
use crate::palette::{BuildAreaPalette, PaletteSlot, BUILD_AREA_ZONES};
use bytemuck::{bytes_of, Pod};
use meridian_world::ALTITUDE_COUNT;

/// Maximum event buffer size. The dynamic palette section alone can reach
/// 676 slots x 27 bits; 4096 bytes covers it with headroom for key groups.
pub const MAX_BUFFER_SIZE: usize = 4096;

/// Rebuild event serializer - writes events to a pre-allocated buffer.
///
/// Designed to be reused across serializations. Byte-granularity writes
/// require bit alignment; `align_bits` closes an open bit section.
pub struct ViewSerializer {
    buffer: [u8; MAX_BUFFER_SIZE],
    position: usize,
    bit_offset: u32,
}

impl ViewSerializer {
    /// Creates a new serializer with a fresh buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0u8; MAX_BUFFER_SIZE],
            position: 0,
            bit_offset: 0,
        }
    }

    /// Resets the serializer for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
        self.bit_offset = 0;
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.position
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.position == 0 && self.bit_offset == 0
    }

    /// Returns a slice of the written data.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    /// Writes a single byte. Fails inside an unaligned bit section.
    #[inline]
    pub fn write_u8(&mut self, value: u8) -> bool {
        if self.bit_offset != 0 || self.position >= MAX_BUFFER_SIZE {
            return false;
        }
        self.buffer[self.position] = value;
        self.position += 1;
        true
    }

    /// Writes a u16 in little-endian format.
    #[inline]
    pub fn write_u16(&mut self, value: u16) -> bool {
        if self.bit_offset != 0 || self.position + 2 > MAX_BUFFER_SIZE {
            return false;
        }
        self.buffer[self.position..self.position + 2].copy_from_slice(&value.to_le_bytes());
        self.position += 2;
        true
    }

    /// Writes a u32 in little-endian format.
    #[inline]
    pub fn write_u32(&mut self, value: u32) -> bool {
        if self.bit_offset != 0 || self.position + 4 > MAX_BUFFER_SIZE {
            return false;
        }
        self.buffer[self.position..self.position + 4].copy_from_slice(&value.to_le_bytes());
        self.position += 4;
        true
    }

    /// Writes a Pod type directly.
    #[inline]
    pub fn write_pod<T: Pod>(&mut self, value: &T) -> bool {
        let bytes = bytes_of(value);
        if self.bit_offset != 0 || self.position + bytes.len() > MAX_BUFFER_SIZE {
            return false;
        }
        self.buffer[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        true
    }

    /// Writes the low `count` bits of `value`, MSB first. Fails for
    /// `count > 32`.
    pub fn write_bits(&mut self, value: u32, count: u32) -> bool {
        if count > 32 {
            return false;
        }
        for i in (0..count).rev() {
            if self.position >= MAX_BUFFER_SIZE {
                return false;
            }
            if self.bit_offset == 0 {
                // fresh byte: clear any stale data from a previous use
                self.buffer[self.position] = 0;
            }
            if (value >> i) & 1 != 0 {
                self.buffer[self.position] |= 0x80 >> self.bit_offset;
            }
            self.bit_offset += 1;
            if self.bit_offset == 8 {
                self.bit_offset = 0;
                self.position += 1;
            }
        }
        true
    }

    /// Closes an open bit section, zero-padding to the next byte boundary.
    #[inline]
    pub fn align_bits(&mut self) {
        if self.bit_offset != 0 {
            self.bit_offset = 0;
            self.position += 1;
        }
    }

    /// Serializes a rebuild event.
    pub fn serialize_event(&mut self, event: &RebuildEvent) -> bool {
        match event {
            RebuildEvent::Static(event) => self.serialize_static(event),
            RebuildEvent::Dynamic(event) => self.serialize_dynamic(event),
        }
    }

    /// Serializes a static rebuild: header, then the key groups.
    pub fn serialize_static(&mut self, event: &StaticRebuild) -> bool {
        self.reset();
        let Ok(key_set_count) = u16::try_from(event.key_sets.len()) else {
            return false;
        };
        let header =
            RebuildHeader::new(event.center_zone_x, event.center_zone_z, key_set_count);
        self.write_pod(&header) && self.write_key_sets(&event.key_sets)
    }

    /// Serializes a dynamic rebuild: immediate flag, header, the bit-packed
    /// palette section, then the key groups.
    pub fn serialize_dynamic(&mut self, event: &DynamicRebuild) -> bool {
        self.reset();
        if !self.write_u8(u8::from(event.immediate)) {
            return false;
        }
        let Ok(key_set_count) = u16::try_from(event.key_sets.len()) else {
            return false;
        };
        let header =
            RebuildHeader::new(event.center_zone_x, event.center_zone_z, key_set_count);
        if !self.write_pod(&header) {
            return false;
        }
        if !self.write_palette(&event.palette) {
            return false;
        }
        self.align_bits();
        self.write_key_sets(&event.key_sets)
    }

    /// One presence bit per slot, altitude then local X then local Z; a
    /// 26-bit descriptor follows each set bit.
    fn write_palette(&mut self, palette: &BuildAreaPalette) -> bool {
        for altitude in 0..ALTITUDE_COUNT {
            for local_x in 0..BUILD_AREA_ZONES {
                for local_z in 0..BUILD_AREA_ZONES {
                    match palette.get(altitude, local_x, local_z) {
                        Some(slot) => {
                            if !self.write_bits(1, 1)
                                || !self.write_bits(slot.pack(), PaletteSlot::PACKED_BITS)
                            {
                                return false;
                            }
                        }
                        None => {
                            if !self.write_bits(0, 1) {
                                return false;
                            }
                        }
                    }
                }
            }
        }
        true
    }

    fn write_key_sets(&mut self, key_sets: &[KeySet]) -> bool {
        for group in key_sets {
            for &key in group {
                if !self.write_u32(key) {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for ViewSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild event deserializer - reads events from a buffer.
///
/// Per-group key counts come from the caller: group lengths are shared
/// configuration, not wire data.
pub struct ViewDeserializer<'a> {
    buffer: &'a [u8],
    position: usize,
    bit_offset: u32,
}

impl<'a> ViewDeserializer<'a> {
    /// Creates a new deserializer from a buffer.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            bit_offset: 0,
        }
    }

    /// Returns the number of whole bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Reads a single byte. Fails inside an unaligned bit section.
    #[inline]
    pub fn read_u8(&mut self) -> Option<u8> {
        if self.bit_offset != 0 || self.position >= self.buffer.len() {
            return None;
        }
        let value = self.buffer[self.position];
        self.position += 1;
        Some(value)
    }

    /// Reads a u16 in little-endian format.
    #[inline]
    pub fn read_u16(&mut self) -> Option<u16> {
        if self.bit_offset != 0 || self.position + 2 > self.buffer.len() {
            return None;
        }
        let value = u16::from_le_bytes([self.buffer[self.position], self.buffer[self.position + 1]]);
        self.position += 2;
        Some(value)
    }

    /// Reads a u32 in little-endian format.
    #[inline]
    pub fn read_u32(&mut self) -> Option<u32> {
        if self.bit_offset != 0 || self.position + 4 > self.buffer.len() {
            return None;
        }
        let value = u32::from_le_bytes([
            self.buffer[self.position],
            self.buffer[self.position + 1],
            self.buffer[self.position + 2],
            self.buffer[self.position + 3],
        ]);
        self.position += 4;
        Some(value)
    }

    /// Reads a Pod type directly.
    #[inline]
    pub fn read_pod<T: Pod + Copy>(&mut self) -> Option<T> {
        let size = std::mem::size_of::<T>();
        if self.bit_offset != 0 || self.position + size > self.buffer.len() {
            return None;
        }
        let slice = &self.buffer[self.position..self.position + size];
        self.position += size;
        bytemuck::try_pod_read_unaligned(slice).ok()
    }

    /// Reads `count` bits, MSB first. Fails for `count > 32`.
    pub fn read_bits(&mut self, count: u32) -> Option<u32> {
        if count > 32 {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            if self.position >= self.buffer.len() {
                return None;
            }
            let bit = (self.buffer[self.position] >> (7 - self.bit_offset)) & 1;
            value = (value << 1) | u32::from(bit);
            self.bit_offset += 1;
            if self.bit_offset == 8 {
                self.bit_offset = 0;
                self.position += 1;
            }
        }
        Some(value)
    }

    /// Closes an open bit section, discarding padding to the next byte
    /// boundary.
    #[inline]
    pub fn align_bits(&mut self) {
        if self.bit_offset != 0 {
            self.bit_offset = 0;
            self.position += 1;
        }
    }

    /// Deserializes a static rebuild. `keys_per_group` maps each group
    /// index to its key count, the config collaborator's contract.
    pub fn deserialize_static<F>(&mut self, keys_per_group: F) -> Option<StaticRebuild>
    where
        F: Fn(usize) -> usize,
    {
        let header: RebuildHeader = self.read_pod()?;
        let key_sets = self.read_key_sets(usize::from(header.key_set_count), keys_per_group)?;
        Some(StaticRebuild {
            center_zone_x: header.center_zone_x,
            center_zone_z: header.center_zone_z,
            key_sets,
        })
    }

    /// Deserializes a dynamic rebuild.
    pub fn deserialize_dynamic<F>(&mut self, keys_per_group: F) -> Option<DynamicRebuild>
    where
        F: Fn(usize) -> usize,
    {
        let immediate = self.read_u8()? != 0;
        let header: RebuildHeader = self.read_pod()?;
        let palette = self.read_palette()?;
        self.align_bits();
        let key_sets = self.read_key_sets(usize::from(header.key_set_count), keys_per_group)?;
        Some(DynamicRebuild {
            immediate,
            center_zone_x: header.center_zone_x,
            center_zone_z: header.center_zone_z,
            palette,
            key_sets,
        })
    }

    fn read_palette(&mut self) -> Option<BuildAreaPalette> {
        let mut palette = BuildAreaPalette::new();
        for altitude in 0..ALTITUDE_COUNT {
            for local_x in 0..BUILD_AREA_ZONES {
                for local_z in 0..BUILD_AREA_ZONES {
                    if self.read_bits(1)? == 1 {
                        let raw = self.read_bits(PaletteSlot::PACKED_BITS)?;
                        palette.set(altitude, local_x, local_z, Some(PaletteSlot::unpack(raw)));
                    }
                }
            }
        }
        Some(palette)
    }

    fn read_key_sets<F>(&mut self, count: usize, keys_per_group: F) -> Option<Vec<KeySet>>
    where
        F: Fn(usize) -> usize,
    {
        let mut key_sets = Vec::with_capacity(count);
        for group in 0..count {
            let mut keys = Vec::with_capacity(keys_per_group(group));
            for _ in 0..keys_per_group(group) {
                keys.push(self.read_u32()?);
            }
            key_sets.push(keys);
        }
        Some(key_sets)
    }
}
