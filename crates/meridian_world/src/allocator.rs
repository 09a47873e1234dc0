//! # Instance Allocator
//!
//! Locates free rectangular blocks of grid space, reserves them, populates
//! them with transformed copies of a source region, and reclaims them when
//! the instance ends.
//!
//! ## Search Order
//!
//! The free-area search scans map-square-aligned candidates starting at a
//! configurable reserved offset (default `x = 6400, z = 0`), stepping by
//! the requested length on the outer (x) axis and the requested width on
//! the inner (z) axis, up to the grid bound. The first occupied zone on a
//! candidate's leading zone row advances the inner axis; the first
//! occupied zone in the remaining rows advances the outer axis. This order
//! is part of the observable contract: scripted content relies on
//! deterministic area assignment, so it must not be "optimized".
//!
//! The reserved offset keeps instances clear of coordinates referenced by
//! scripted content that assumes specific live-world addresses below it.
//!
//! ## Atomicity
//!
//! `allocate` requires `&mut WorldGrid`: the exclusive borrow makes the
//! validate-reserve-populate sequence a critical section, so no concurrent
//! request can observe a half-reserved area as free.

use crate::coords::{
    Position, ZoneCoord, ZoneRegion, GRID_TILES, TILES_PER_MAP_SQUARE, TILES_PER_ZONE,
    ZONES_PER_MAP_SQUARE,
};
use crate::error::{GridError, GridResult};
use crate::grid::WorldGrid;
use crate::transform;
use crate::zone::Zone;
use serde::{Deserialize, Serialize};

/// Allocator configuration, loaded once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Reserved tile X offset the search starts at. Must be map-square
    /// aligned.
    pub reserved_x: u16,
    /// Reserved tile Z offset the search starts at. Must be map-square
    /// aligned.
    pub reserved_z: u16,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            reserved_x: 6400,
            reserved_z: 0,
        }
    }
}

impl AllocatorConfig {
    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidConfig`] if the document does not parse
    /// or the offsets are out of range or not map-square aligned.
    pub fn from_toml_str(raw: &str) -> GridResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|error| GridError::InvalidConfig(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates offset range and alignment.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidConfig`] on a bad offset.
    pub fn validate(&self) -> GridResult<()> {
        if self.reserved_x >= GRID_TILES || self.reserved_z >= GRID_TILES {
            return Err(GridError::InvalidConfig(format!(
                "reserved offset ({}, {}) outside the grid",
                self.reserved_x, self.reserved_z
            )));
        }
        if self.reserved_x % TILES_PER_MAP_SQUARE != 0 || self.reserved_z % TILES_PER_MAP_SQUARE != 0
        {
            return Err(GridError::InvalidConfig(format!(
                "reserved offset ({}, {}) is not map-square aligned",
                self.reserved_x, self.reserved_z
            )));
        }
        Ok(())
    }
}

/// Handle to an allocated instance area: the reserved target footprint and
/// the target-to-source mapping of every copied zone.
///
/// The handle is consumed by [`InstanceAllocator::release`], so releasing
/// the same area twice is a compile error rather than a runtime bug.
#[derive(Debug)]
pub struct InstanceHandle {
    target: ZoneRegion,
    mapping: Vec<(ZoneCoord, ZoneCoord)>,
}

impl InstanceHandle {
    /// The reserved target footprint (whole map squares).
    #[must_use]
    pub const fn target(&self) -> ZoneRegion {
        self.target
    }

    /// `(target, source)` address pairs for every zone with copied content.
    #[must_use]
    pub fn mappings(&self) -> &[(ZoneCoord, ZoneCoord)] {
        &self.mapping
    }
}

/// Allocator counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Instance areas successfully allocated.
    pub areas_allocated: u64,
    /// Instance areas released back to the free pool.
    pub areas_released: u64,
    /// Zones copied into instance areas.
    pub zones_copied: u64,
    /// Searches that exhausted the address space.
    pub failed_searches: u64,
}

/// Searches, reserves, populates and reclaims instance areas.
#[derive(Debug, Default)]
pub struct InstanceAllocator {
    config: AllocatorConfig,
    stats: AllocatorStats,
}

impl InstanceAllocator {
    /// Creates an allocator with the given configuration.
    #[must_use]
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            config,
            stats: AllocatorStats::default(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> AllocatorConfig {
        self.config
    }

    /// Allocator counters.
    #[must_use]
    pub const fn stats(&self) -> AllocatorStats {
        self.stats
    }

    /// Finds a free map-square-aligned area of at least
    /// `width_tiles x length_tiles` at `altitude`.
    ///
    /// Requested sizes are padded up to whole map squares, and every zone
    /// of the padded span must be unoccupied for a candidate to be
    /// accepted. Returns `None` when the search space is exhausted; the
    /// caller must treat that as a soft failure and defer the request.
    #[must_use]
    pub fn find_empty_area(
        &self,
        grid: &WorldGrid,
        altitude: u8,
        width_tiles: u16,
        length_tiles: u16,
    ) -> Option<Position> {
        if width_tiles == 0 || length_tiles == 0 {
            return None;
        }
        if width_tiles > GRID_TILES || length_tiles > GRID_TILES {
            return None;
        }
        let width = pad_to_map_square(width_tiles);
        let length = pad_to_map_square(length_tiles);
        let width_zones = width / TILES_PER_ZONE;
        let length_zones = length / TILES_PER_ZONE;

        'outer: for x in (self.config.reserved_x..GRID_TILES).step_by(usize::from(length)) {
            if x + width > GRID_TILES {
                break;
            }
            'inner: for z in (self.config.reserved_z..GRID_TILES).step_by(usize::from(width)) {
                if z + length > GRID_TILES {
                    break;
                }
                let zone_x0 = x / TILES_PER_ZONE;
                let zone_z0 = z / TILES_PER_ZONE;

                // leading zone row: a hit advances the inner axis
                for zone_x in zone_x0..zone_x0 + width_zones {
                    if zone_occupied(grid, altitude, zone_x, zone_z0) {
                        continue 'inner;
                    }
                }
                // remaining rows: a hit advances the outer axis
                for zone_z in zone_z0 + 1..zone_z0 + length_zones {
                    for zone_x in zone_x0..zone_x0 + width_zones {
                        if zone_occupied(grid, altitude, zone_x, zone_z) {
                            continue 'outer;
                        }
                    }
                }
                return Position::new(x, z, altitude).ok();
            }
        }
        None
    }

    /// Allocates an instance area for `source`: finds free space, reserves
    /// the whole map-square span, and populates it with rotated copies of
    /// the source region's zones. Source addresses without a zone reserve
    /// an empty placeholder so the footprint stays contiguous.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ResourceExhausted`] if no free area exists;
    /// the caller should defer or queue the request.
    pub fn allocate(
        &mut self,
        grid: &mut WorldGrid,
        source: ZoneRegion,
        altitude: u8,
        rotation: u8,
    ) -> GridResult<InstanceHandle> {
        let rotation = rotation % 4;
        let width_tiles = source.width_tiles();
        let length_tiles = source.length_tiles();

        let Some(anchor) = self.find_empty_area(grid, altitude, width_tiles, length_tiles) else {
            self.stats.failed_searches += 1;
            tracing::warn!(
                "no free {}x{} tile area at altitude {}",
                width_tiles,
                length_tiles,
                altitude
            );
            return Err(GridError::ResourceExhausted {
                altitude,
                width_tiles,
                length_tiles,
            });
        };

        let anchor_zone = anchor.zone();
        let target = ZoneRegion::new(
            altitude,
            anchor_zone.x(),
            anchor_zone.z(),
            span_zones(width_tiles),
            span_zones(length_tiles),
        )?;

        let mut mapping = Vec::new();
        for (dx, dz) in target.offsets() {
            let target_coord = target.at_offset(dx, dz);
            let zone = if dx < source.width_zones() && dz < source.length_zones() {
                let source_coord = source.at_offset(dx, dz);
                if grid.is_occupied(source_coord) {
                    let copy = transform::copy_from_rotated(grid, source_coord, rotation)?;
                    mapping.push((target_coord, source_coord));
                    self.stats.zones_copied += 1;
                    copy
                } else {
                    Zone::placeholder(target_coord)
                }
            } else {
                Zone::placeholder(target_coord)
            };
            transform::paste(grid, target_coord.origin(), zone)?;
        }

        self.stats.areas_allocated += 1;
        tracing::info!(
            "allocated {}x{} zone instance area at {} ({} zones copied)",
            target.width_zones(),
            target.length_zones(),
            target.origin(),
            mapping.len()
        );
        Ok(InstanceHandle { target, mapping })
    }

    /// Releases an instance area, clearing every zone of its reserved
    /// footprint. Absence in the grid is what marks the space free again.
    /// Returns the number of zones that were cleared.
    pub fn release(&mut self, grid: &mut WorldGrid, handle: InstanceHandle) -> usize {
        let mut cleared = 0;
        for coord in handle.target.zones() {
            if grid.clear(coord).is_some() {
                cleared += 1;
            }
        }
        self.stats.areas_released += 1;
        tracing::info!(
            "released instance area at {} ({} zones cleared)",
            handle.target.origin(),
            cleared
        );
        cleared
    }
}

/// Rounds a tile extent up to whole map squares.
fn pad_to_map_square(tiles: u16) -> u16 {
    tiles.div_ceil(TILES_PER_MAP_SQUARE) * TILES_PER_MAP_SQUARE
}

/// Zones spanned by a tile extent padded to whole map squares.
fn span_zones(tiles: u16) -> u16 {
    tiles.div_ceil(TILES_PER_MAP_SQUARE) * ZONES_PER_MAP_SQUARE
}

/// Occupancy probe; addresses outside the grid count as occupied so a span
/// that leaves the grid can never be accepted.
fn zone_occupied(grid: &WorldGrid, altitude: u8, zone_x: u16, zone_z: u16) -> bool {
    match ZoneCoord::new(altitude, zone_x, zone_z) {
        Ok(coord) => grid.is_occupied(coord),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AllocatorConfig::default();
        assert_eq!(config.reserved_x, 6400);
        assert_eq!(config.reserved_z, 0);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_from_toml() {
        let config = AllocatorConfig::from_toml_str("reserved_x = 8192\nreserved_z = 128\n").unwrap();
        assert_eq!(config.reserved_x, 8192);
        assert_eq!(config.reserved_z, 128);
    }

    #[test]
    fn test_config_rejects_misaligned_offset() {
        let result = AllocatorConfig::from_toml_str("reserved_x = 6401\nreserved_z = 0\n");
        assert!(matches!(result, Err(GridError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        let result = AllocatorConfig::from_toml_str("reserved_x = \"east\"");
        assert!(matches!(result, Err(GridError::InvalidConfig(_))));
    }

    #[test]
    fn test_padding() {
        assert_eq!(pad_to_map_square(64), 64);
        assert_eq!(pad_to_map_square(65), 128);
        assert_eq!(pad_to_map_square(16), 64);
        assert_eq!(span_zones(64), 8);
        assert_eq!(span_zones(128), 16);
    }
}
