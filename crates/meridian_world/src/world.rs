//! # Shared World Handle
//!
//! The server runs on a single logical simulation tick: grid mutation
//! (instance allocation/release, static content load) and every observer's
//! view recomputation happen within that tick's serialized phase. When the
//! surrounding system fans observer work out across threads, grid reads
//! must be safe for concurrent readers while no writer is active.
//!
//! [`World`] encodes exactly that contract as a reader/writer lock: many
//! observers hold read guards during the view phase, and the single
//! mutation phase (including the allocator's reserve-then-populate
//! sequence) runs under the one write guard, so two instance requests can
//! never observe the same area as free.

use crate::grid::WorldGrid;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to the authoritative grid.
#[derive(Debug, Default)]
pub struct World {
    grid: RwLock<WorldGrid>,
}

impl World {
    /// Creates a world around an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: RwLock::new(WorldGrid::new()),
        }
    }

    /// Creates a world around a pre-populated grid.
    #[must_use]
    pub fn from_grid(grid: WorldGrid) -> Self {
        Self {
            grid: RwLock::new(grid),
        }
    }

    /// Acquires shared read access for the view phase.
    pub fn read(&self) -> RwLockReadGuard<'_, WorldGrid> {
        self.grid.read()
    }

    /// Acquires exclusive write access for the mutation phase.
    pub fn write(&self) -> RwLockWriteGuard<'_, WorldGrid> {
        self.grid.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ZoneCoord;
    use crate::zone::Zone;
    use std::sync::Arc;

    #[test]
    fn test_write_then_read() {
        let world = World::new();
        let coord = ZoneCoord::new(0, 1, 1).unwrap();
        world.write().put(Zone::new(coord)).unwrap();
        assert!(world.read().is_occupied(coord));
    }

    #[test]
    fn test_concurrent_readers() {
        let world = Arc::new(World::new());
        let coord = ZoneCoord::new(0, 3, 3).unwrap();
        world.write().put(Zone::new(coord)).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let world = Arc::clone(&world);
                scope.spawn(move || {
                    let grid = world.read();
                    assert!(grid.is_occupied(coord));
                });
            }
        });
    }
}
