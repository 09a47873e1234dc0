//! # World Grid
//!
//! Sparse 3D container owning every canonical and instanced zone,
//! addressed by [`ZoneCoord`]. The grid is the single source of truth for
//! "what exists where".
//!
//! ## Invariants
//!
//! - At most one zone occupies an address at a time; storing into an
//!   occupied slot without clearing it first is a contract violation and
//!   fails with [`GridError::SlotOccupied`].
//! - The 4x2048x2048 address space is fixed for the process lifetime; the
//!   grid never resizes. Out-of-range addresses are rejected when the
//!   [`ZoneCoord`] is constructed, so they cannot reach the grid at all.
//! - Absence in the grid means the address is free.

use crate::coords::{ZoneCoord, ZoneRegion};
use crate::error::{GridError, GridResult};
use crate::zone::Zone;
use std::collections::HashMap;

/// Canonical content source backed by the static asset cache.
///
/// The grid consumes this when loading static world content; producing the
/// zones themselves is outside the grid's responsibility.
pub trait ZoneProvider {
    /// Returns the canonical zone at `coord`, or `None` if the address has
    /// no static content.
    fn zone(&self, coord: ZoneCoord) -> Option<Zone>;
}

/// Sparse grid of zones over the fixed 4x2048x2048 address space.
#[derive(Debug, Default)]
pub struct WorldGrid {
    zones: HashMap<ZoneCoord, Zone>,
}

impl WorldGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zones: HashMap::new(),
        }
    }

    /// The zone at `coord`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, coord: ZoneCoord) -> Option<&Zone> {
        self.zones.get(&coord)
    }

    /// Mutable access to the zone at `coord`, if any.
    #[inline]
    pub fn get_mut(&mut self, coord: ZoneCoord) -> Option<&mut Zone> {
        self.zones.get_mut(&coord)
    }

    /// Stores `zone` at its own recorded address.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SlotOccupied`] if the address already holds a
    /// zone; callers must clear the slot first.
    pub fn put(&mut self, zone: Zone) -> GridResult<()> {
        let coord = zone.coord();
        if self.zones.contains_key(&coord) {
            return Err(GridError::SlotOccupied { zone: coord });
        }
        self.zones.insert(coord, zone);
        Ok(())
    }

    /// Removes and returns the occupant of `coord`. A no-op returning
    /// `None` if the slot is already empty.
    pub fn clear(&mut self, coord: ZoneCoord) -> Option<Zone> {
        self.zones.remove(&coord)
    }

    /// True if `coord` currently holds a zone.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, coord: ZoneCoord) -> bool {
        self.zones.contains_key(&coord)
    }

    /// Number of occupied slots.
    #[inline]
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Loads canonical content for `region` from a provider. Addresses the
    /// provider has no content for stay free.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SlotOccupied`] if any provided address already
    /// holds a zone.
    pub fn load_from<P: ZoneProvider>(
        &mut self,
        provider: &P,
        region: ZoneRegion,
    ) -> GridResult<usize> {
        let mut loaded = 0;
        for coord in region.zones() {
            if let Some(zone) = provider.zone(coord) {
                self.put(zone)?;
                loaded += 1;
            }
        }
        tracing::info!(
            "loaded {} canonical zones into region at {}",
            loaded,
            region.origin()
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FillProvider;

    impl ZoneProvider for FillProvider {
        fn zone(&self, coord: ZoneCoord) -> Option<Zone> {
            Some(Zone::new(coord))
        }
    }

    #[test]
    fn test_put_then_get() {
        let mut grid = WorldGrid::new();
        let coord = ZoneCoord::new(0, 5, 5).unwrap();
        grid.put(Zone::new(coord)).unwrap();
        assert!(grid.is_occupied(coord));
        assert_eq!(grid.get(coord).unwrap().coord(), coord);
    }

    #[test]
    fn test_double_put_is_contract_violation() {
        let mut grid = WorldGrid::new();
        let coord = ZoneCoord::new(1, 7, 9).unwrap();
        grid.put(Zone::new(coord)).unwrap();
        assert_eq!(
            grid.put(Zone::new(coord)),
            Err(GridError::SlotOccupied { zone: coord })
        );
    }

    #[test]
    fn test_clear_frees_the_slot() {
        let mut grid = WorldGrid::new();
        let coord = ZoneCoord::new(2, 0, 2047).unwrap();
        grid.put(Zone::new(coord)).unwrap();
        assert!(grid.clear(coord).is_some());
        assert!(grid.clear(coord).is_none());
        assert!(grid.get(coord).is_none());
        // slot is reusable after a clear
        grid.put(Zone::new(coord)).unwrap();
    }

    #[test]
    fn test_load_from_provider() {
        let mut grid = WorldGrid::new();
        let region = ZoneRegion::new(0, 10, 10, 3, 3).unwrap();
        let loaded = grid.load_from(&FillProvider, region).unwrap();
        assert_eq!(loaded, 9);
        assert_eq!(grid.zone_count(), 9);
        for coord in region.zones() {
            assert!(grid.is_occupied(coord));
        }
    }
}
