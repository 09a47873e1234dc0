//! # Zone Transforms
//!
//! Pure copy/rotate/paste operations over zones. These are deliberately
//! free functions parameterized by turn count and target address rather
//! than a hierarchy of transform strategies.
//!
//! Copying duplicates structural geometry only: the collision matrix is
//! cloned tile by tile and the copy shares no mutable state with its
//! source. Entity collections are not cloned; re-populating a copy is a
//! separate step performed by the caller.

use crate::coords::{Position, ZoneCoord};
use crate::error::{GridError, GridResult};
use crate::grid::WorldGrid;
use crate::zone::Zone;

/// Deep-copies a zone's geometry with identity rotation. The result is
/// dynamic, remembers `source.coord()` as its origin, and starts with
/// empty entity collections.
#[must_use]
pub fn copy_zone(source: &Zone) -> Zone {
    copy_zone_rotated(source, 0)
}

/// Deep-copies a zone's geometry rotated clockwise by `turns` quarter
/// turns. Collision flags are carried bit-exact through the rotation.
#[must_use]
pub fn copy_zone_rotated(source: &Zone, turns: u8) -> Zone {
    Zone::dynamic_copy(source.coord(), source.collision().rotated(turns), turns)
}

/// Copies the zone stored at `coord`.
///
/// # Errors
///
/// Returns [`GridError::NotFound`] if no zone exists at the address.
pub fn copy_from(grid: &WorldGrid, coord: ZoneCoord) -> GridResult<Zone> {
    copy_from_rotated(grid, coord, 0)
}

/// Copies the zone stored at `coord`, rotated by `turns` quarter turns.
///
/// # Errors
///
/// Returns [`GridError::NotFound`] if no zone exists at the address.
pub fn copy_from_rotated(grid: &WorldGrid, coord: ZoneCoord, turns: u8) -> GridResult<Zone> {
    let source = grid.get(coord).ok_or(GridError::NotFound { zone: coord })?;
    Ok(copy_zone_rotated(source, turns))
}

/// Places `zone` at the zone address containing `target`, re-addressing it
/// to the target's zone coordinates.
///
/// # Errors
///
/// Returns [`GridError::SlotOccupied`] if the target address already holds
/// a zone; the caller must clear it first or pick another address.
pub fn paste(grid: &mut WorldGrid, target: Position, mut zone: Zone) -> GridResult<()> {
    let coord = target.zone();
    if grid.get(coord).is_some() {
        return Err(GridError::SlotOccupied { zone: coord });
    }
    zone.readdress(coord);
    grid.put(zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::flag;

    fn grid_with_source() -> (WorldGrid, ZoneCoord) {
        let mut grid = WorldGrid::new();
        let coord = ZoneCoord::new(0, 50, 50).unwrap();
        let mut zone = Zone::new(coord);
        zone.collision_mut().add(0, 0, flag::BLOCK_WALK);
        zone.collision_mut().add(3, 5, flag::BLOCK_PROJECTILE | flag::FLOOR);
        grid.put(zone).unwrap();
        (grid, coord)
    }

    #[test]
    fn test_copy_matches_source_tile_by_tile() {
        let (grid, coord) = grid_with_source();
        let copy = copy_from(&grid, coord).unwrap();
        let source = grid.get(coord).unwrap();
        for x in 0..8 {
            for z in 0..8 {
                assert_eq!(copy.collision().get(x, z), source.collision().get(x, z));
            }
        }
        assert!(copy.is_dynamic());
        assert_eq!(copy.rotation(), 0);
        assert_eq!(copy.source(), Some(coord));
    }

    #[test]
    fn test_copy_is_independent_of_source() {
        let (mut grid, coord) = grid_with_source();
        let mut copy = copy_from(&grid, coord).unwrap();
        copy.collision_mut().add(7, 7, flag::ROOF);
        assert_eq!(grid.get(coord).unwrap().collision().get(7, 7), 0);

        grid.get_mut(coord)
            .unwrap()
            .collision_mut()
            .remove(0, 0, flag::BLOCK_WALK);
        assert_eq!(copy.collision().get(0, 0), flag::BLOCK_WALK);
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let grid = WorldGrid::new();
        let coord = ZoneCoord::new(0, 1, 1).unwrap();
        assert_eq!(
            copy_from(&grid, coord).unwrap_err(),
            GridError::NotFound { zone: coord }
        );
    }

    #[test]
    fn test_rotated_copy_records_turns() {
        let (grid, coord) = grid_with_source();
        let copy = copy_from_rotated(&grid, coord, 1).unwrap();
        assert_eq!(copy.rotation(), 1);
        let expected = grid.get(coord).unwrap().collision().rotated(1);
        assert_eq!(*copy.collision(), expected);
    }

    #[test]
    fn test_paste_into_empty_slot() {
        let (mut grid, coord) = grid_with_source();
        let copy = copy_from(&grid, coord).unwrap();
        let target = Position::new(6400, 0, 0).unwrap();
        paste(&mut grid, target, copy).unwrap();

        let pasted = grid.get(target.zone()).unwrap();
        assert_eq!(pasted.coord(), target.zone());
        assert!(pasted.is_dynamic());
        assert_eq!(pasted.source(), Some(coord));
    }

    #[test]
    fn test_paste_into_occupied_slot_fails() {
        let (mut grid, coord) = grid_with_source();
        let copy = copy_from(&grid, coord).unwrap();
        let occupied = coord.origin();
        assert_eq!(
            paste(&mut grid, occupied, copy).unwrap_err(),
            GridError::SlotOccupied { zone: coord }
        );
    }
}
