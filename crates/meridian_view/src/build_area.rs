//! # Build Area
//!
//! Per-observer viewport state: a 13x13-zone window centered on the
//! observer, the position of the last recenter, and the set of zones with
//! incremental updates pending since then.
//!
//! ## Rebuild Margins
//!
//! Immediately after a rebuild the observer sits at local tile (48, 48),
//! the origin of local zone index 6. Incremental updates stay valid while
//! the observer's local tile coordinates remain inside `[16, 88)` on both
//! axes; crossing either margin makes a rebuild mandatory before further
//! incremental updates can be trusted.

use crate::palette::{BuildAreaPalette, PaletteSlot, BUILD_AREA_ZONES};
use meridian_world::{
    FloorItem, PlacedObject, Position, WorldGrid, ZoneCoord, ZoneEntity, ALTITUDE_COUNT,
    TILES_PER_ZONE,
};
use std::collections::HashSet;

/// Tiles per axis of the build area.
pub const BUILD_AREA_TILES: u16 = BUILD_AREA_ZONES as u16 * TILES_PER_ZONE;

/// Zones per axis of the incremental-update active window.
pub const ACTIVE_WINDOW_ZONES: u16 = 7;

/// Lower rebuild margin in local tiles.
pub const REBUILD_MARGIN_LOW: i32 = 16;

/// Upper rebuild margin in local tiles (exclusive).
pub const REBUILD_MARGIN_HIGH: i32 = 88;

/// Zone offset from the build area's south-west corner to its center.
const CENTER_ZONE_OFFSET: i32 = 6;

/// One step of the full visual refresh a rebuild forces. The client holds
/// no diff across a viewport swap, so every zone is cleared and each of its
/// entities re-spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOp {
    /// Remove everything the client shows for this zone.
    Clear(ZoneCoord),
    /// Re-spawn one floor item stack entry.
    SpawnItem {
        /// The zone being refreshed.
        zone: ZoneCoord,
        /// Zone-local tile X.
        tile_x: u8,
        /// Zone-local tile Z.
        tile_z: u8,
        /// The item entry.
        item: FloorItem,
    },
    /// Re-spawn one placed object.
    SpawnObject {
        /// The zone being refreshed.
        zone: ZoneCoord,
        /// The object.
        object: PlacedObject,
    },
}

/// Per-observer viewport state.
#[derive(Debug, Default)]
pub struct BuildArea {
    last_rebuild: Option<Position>,
    palette: BuildAreaPalette,
    pending: HashSet<ZoneCoord>,
}

impl BuildArea {
    /// Creates the state for a fresh observer session. The first position
    /// check always demands a rebuild.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The position of the last rebuild, if one has happened.
    #[inline]
    #[must_use]
    pub const fn last_rebuild(&self) -> Option<Position> {
        self.last_rebuild
    }

    /// The zone the build area is centered on.
    #[inline]
    #[must_use]
    pub fn center_zone(&self) -> Option<ZoneCoord> {
        self.last_rebuild.map(|position| position.zone())
    }

    /// The palette computed by the last rebuild.
    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &BuildAreaPalette {
        &self.palette
    }

    /// Pure predicate: true when `position` demands a rebuild. Callable
    /// every tick; mutates nothing.
    #[must_use]
    pub fn rebuild_required(&self, position: Position) -> bool {
        let Some(last) = self.last_rebuild else {
            return true;
        };
        let (local_x, local_z) = local_tile(last, position);
        !(REBUILD_MARGIN_LOW..REBUILD_MARGIN_HIGH).contains(&local_x)
            || !(REBUILD_MARGIN_LOW..REBUILD_MARGIN_HIGH).contains(&local_z)
    }

    /// Recenters the build area on `position`: refetches all 13x13 zones
    /// per altitude from the grid, replaces the palette wholesale, resets
    /// the pending set, and returns the full visual refresh (clear then
    /// re-spawn per zone).
    pub fn rebuild(&mut self, position: Position, grid: &WorldGrid) -> Vec<RefreshOp> {
        let center = position.zone();
        let base_x = i32::from(center.x()) - CENTER_ZONE_OFFSET;
        let base_z = i32::from(center.z()) - CENTER_ZONE_OFFSET;

        self.palette.clear();
        let mut refresh = Vec::new();
        for altitude in 0..ALTITUDE_COUNT {
            for local_x in 0..BUILD_AREA_ZONES {
                for local_z in 0..BUILD_AREA_ZONES {
                    let Ok(coord) = zone_at(altitude, base_x, base_z, local_x, local_z) else {
                        continue;
                    };
                    let Some(zone) = grid.get(coord) else {
                        continue;
                    };
                    // only copies with real content carry a descriptor;
                    // placeholders and canonical zones stay identity
                    if let Some(source) = zone.source() {
                        self.palette.set(
                            altitude,
                            local_x,
                            local_z,
                            Some(PaletteSlot {
                                source_altitude: source.altitude(),
                                rotation: zone.rotation(),
                                origin_x: source.x(),
                                origin_z: source.z(),
                            }),
                        );
                    }
                    refresh.push(RefreshOp::Clear(coord));
                    for entity in zone.entities() {
                        refresh.push(match entity {
                            ZoneEntity::Item {
                                tile_x,
                                tile_z,
                                item,
                            } => RefreshOp::SpawnItem {
                                zone: coord,
                                tile_x,
                                tile_z,
                                item: *item,
                            },
                            ZoneEntity::Object(object) => RefreshOp::SpawnObject {
                                zone: coord,
                                object: *object,
                            },
                        });
                    }
                }
            }
        }

        self.pending.clear();
        self.last_rebuild = Some(position);
        tracing::debug!(
            "rebuilt build area centered on {} ({} refresh ops)",
            position,
            refresh.len()
        );
        refresh
    }

    /// Records an incremental update for `zone` if it lies inside the 7x7
    /// active window around the center. Returns whether the zone is now
    /// pending. The palette is untouched.
    pub fn record_update(&mut self, zone: ZoneCoord) -> bool {
        let Some(center) = self.center_zone() else {
            return false;
        };
        let half = i32::from(ACTIVE_WINDOW_ZONES / 2);
        let dx = (i32::from(zone.x()) - i32::from(center.x())).abs();
        let dz = (i32::from(zone.z()) - i32::from(center.z())).abs();
        if dx > half || dz > half {
            return false;
        }
        self.pending.insert(zone);
        true
    }

    /// The zone addresses touched since the last rebuild.
    pub fn pending_zones(&self) -> impl Iterator<Item = ZoneCoord> + '_ {
        self.pending.iter().copied()
    }

    /// Number of zones with pending updates.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Observer tile coordinates relative to the build area anchored by `last`.
/// Signed so positions below the anchor read as out of margin rather than
/// wrapping.
fn local_tile(last: Position, position: Position) -> (i32, i32) {
    let base_x = (i32::from(last.zone().x()) - CENTER_ZONE_OFFSET) * i32::from(TILES_PER_ZONE);
    let base_z = (i32::from(last.zone().z()) - CENTER_ZONE_OFFSET) * i32::from(TILES_PER_ZONE);
    (
        i32::from(position.x()) - base_x,
        i32::from(position.z()) - base_z,
    )
}

/// The zone address of a build-area slot, or `OutOfBounds` for slots that
/// hang off the edge of the grid.
fn zone_at(
    altitude: u8,
    base_x: i32,
    base_z: i32,
    local_x: usize,
    local_z: usize,
) -> meridian_world::GridResult<ZoneCoord> {
    let zx = base_x + local_x as i32;
    let zz = base_z + local_z as i32;
    if zx < 0 || zz < 0 {
        return Err(meridian_world::GridError::OutOfBounds {
            x: zx,
            z: zz,
            altitude,
        });
    }
    ZoneCoord::new(altitude, zx as u16, zz as u16)
}
