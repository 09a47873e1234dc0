//! Integration test for instance allocation against a populated grid.

use meridian_world::collision::flag;
use meridian_world::{
    AllocatorConfig, GridError, InstanceAllocator, Position, World, WorldGrid, Zone, ZoneCoord,
    ZoneRegion,
};

/// Builds a source area of `width x length` zones at zone (350, 412) with a
/// marker collision flag in each zone's north-east corner tile.
fn grid_with_source(width: u16, length: u16) -> (WorldGrid, ZoneRegion) {
    let mut grid = WorldGrid::new();
    let source = ZoneRegion::new(0, 350, 412, width, length).unwrap();
    for coord in source.zones() {
        let mut zone = Zone::new(coord);
        zone.collision_mut().add(7, 7, flag::BLOCK_WALK);
        grid.put(zone).unwrap();
    }
    (grid, source)
}

#[test]
fn test_first_candidate_on_empty_grid() {
    let (grid, _) = grid_with_source(8, 8);
    let allocator = InstanceAllocator::default();

    let anchor = allocator.find_empty_area(&grid, 0, 64, 64).unwrap();
    assert_eq!(anchor, Position::new(6400, 0, 0).unwrap());
}

#[test]
fn test_sub_map_square_request_is_padded() {
    let grid = WorldGrid::new();
    let allocator = InstanceAllocator::default();

    // a 16x16 tile request still claims a whole map square
    let anchor = allocator.find_empty_area(&grid, 0, 16, 16).unwrap();
    assert_eq!(anchor, Position::new(6400, 0, 0).unwrap());
    assert_eq!(anchor.x() % 64, 0);
    assert_eq!(anchor.z() % 64, 0);
}

#[test]
fn test_occupied_candidate_advances_search() {
    let (mut grid, source) = grid_with_source(8, 8);
    let mut allocator = InstanceAllocator::default();

    let first = allocator.allocate(&mut grid, source, 0, 0).unwrap();
    assert_eq!(first.target().origin(), ZoneCoord::new(0, 800, 0).unwrap());

    // the first map square is now reserved, so the next request slides
    // one candidate along the inner axis
    let second = allocator.allocate(&mut grid, source, 0, 0).unwrap();
    assert_eq!(second.target().origin(), ZoneCoord::new(0, 800, 8).unwrap());
}

#[test]
fn test_allocate_copies_geometry_and_records_mapping() {
    let (mut grid, source) = grid_with_source(8, 8);
    let mut allocator = InstanceAllocator::default();

    let handle = allocator.allocate(&mut grid, source, 0, 0).unwrap();
    assert_eq!(handle.mappings().len(), 64);

    for &(target, origin) in handle.mappings() {
        let copy = grid.get(target).unwrap();
        assert!(copy.is_dynamic());
        assert_eq!(copy.source(), Some(origin));
        assert_eq!(copy.collision().get(7, 7), flag::BLOCK_WALK);
        // the copy shares nothing with the source
        assert_eq!(grid.get(origin).unwrap().collision().get(7, 7), flag::BLOCK_WALK);
    }
}

#[test]
fn test_allocate_with_rotation_rotates_collision() {
    let (mut grid, source) = grid_with_source(8, 8);
    let mut allocator = InstanceAllocator::default();

    let handle = allocator.allocate(&mut grid, source, 0, 1).unwrap();
    let &(target, _) = handle.mappings().first().unwrap();
    let copy = grid.get(target).unwrap();
    assert_eq!(copy.rotation(), 1);
    // (7,7) maps to (7,0) after one clockwise quarter turn
    assert_eq!(copy.collision().get(7, 7), 0);
    assert_eq!(copy.collision().get(7, 0), flag::BLOCK_WALK);
}

#[test]
fn test_release_frees_the_footprint_for_reuse() {
    let (mut grid, source) = grid_with_source(8, 8);
    let mut allocator = InstanceAllocator::default();

    let handle = allocator.allocate(&mut grid, source, 0, 0).unwrap();
    let target = handle.target();
    let occupied_after_allocate = grid.zone_count();

    let cleared = allocator.release(&mut grid, handle);
    assert_eq!(cleared, 64);
    assert_eq!(grid.zone_count(), occupied_after_allocate - 64);
    for coord in target.zones() {
        assert!(!grid.is_occupied(coord));
    }

    // the freed space is handed out again, at the same address
    let again = allocator.allocate(&mut grid, source, 0, 0).unwrap();
    assert_eq!(again.target().origin(), target.origin());
}

#[test]
fn test_partial_source_reserves_placeholders() {
    let mut grid = WorldGrid::new();
    // only one of the four source zones exists
    let source = ZoneRegion::new(0, 100, 100, 2, 2).unwrap();
    grid.put(Zone::new(source.origin())).unwrap();

    let mut allocator = InstanceAllocator::default();
    let handle = allocator.allocate(&mut grid, source, 0, 0).unwrap();

    assert_eq!(handle.mappings().len(), 1);
    // the full padded map square is still reserved
    for coord in handle.target().zones() {
        assert!(grid.is_occupied(coord));
    }
    assert_eq!(handle.target().width_zones(), 8);
    assert_eq!(handle.target().length_zones(), 8);
}

#[test]
fn test_exhausted_search_is_a_soft_failure() {
    let (mut grid, source) = grid_with_source(8, 8);
    // a reserved offset on the last map square leaves exactly one candidate
    let config = AllocatorConfig {
        reserved_x: 16320,
        reserved_z: 16320,
    };
    let mut allocator = InstanceAllocator::new(config);

    allocator.allocate(&mut grid, source, 0, 0).unwrap();
    let result = allocator.allocate(&mut grid, source, 0, 0);
    assert_eq!(
        result.unwrap_err(),
        GridError::ResourceExhausted {
            altitude: 0,
            width_tiles: 64,
            length_tiles: 64,
        }
    );
    assert_eq!(allocator.stats().failed_searches, 1);
}

#[test]
fn test_stats_track_lifecycle() {
    let (mut grid, source) = grid_with_source(4, 4);
    let mut allocator = InstanceAllocator::default();

    let handle = allocator.allocate(&mut grid, source, 0, 2).unwrap();
    allocator.release(&mut grid, handle);

    let stats = allocator.stats();
    assert_eq!(stats.areas_allocated, 1);
    assert_eq!(stats.areas_released, 1);
    assert_eq!(stats.zones_copied, 16);
}

#[test]
fn test_allocation_under_world_lock() {
    let (grid, source) = grid_with_source(8, 8);
    let world = World::from_grid(grid);
    let mut allocator = InstanceAllocator::default();

    let handle = {
        let mut grid = world.write();
        allocator.allocate(&mut grid, source, 0, 0).unwrap()
    };

    let grid = world.read();
    assert!(grid.is_occupied(handle.target().origin()));
}
