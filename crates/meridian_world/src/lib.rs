//! # MERIDIAN World Grid
//!
//! Authoritative spatial storage for the game server:
//! - Sparse 3D grid of 8x8-tile zones over a fixed 16384x16384x4 tile space
//! - Copy-on-write zone transforms (copy, rotate, paste)
//! - Instance allocator with deterministic free-area search
//!
//! ## Architecture Rules
//!
//! 1. **Bounds-checked addresses** - Coordinate types validate at
//!    construction; a live [`ZoneCoord`] is proof the address is in range
//! 2. **One occupant per slot** - Storing into an occupied slot is a
//!    contract violation, never a silent overwrite
//! 3. **Exclusive mutation** - Allocation takes `&mut WorldGrid`, so
//!    reserve-then-populate is atomic with respect to other requests
//!
//! ## Example
//!
//! ```rust,ignore
//! use meridian_world::{InstanceAllocator, World, ZoneRegion};
//!
//! let world = World::new();
//! let mut allocator = InstanceAllocator::default();
//! let source = ZoneRegion::new(0, 350, 412, 8, 8)?;
//! let handle = allocator.allocate(&mut world.write(), source, 0, 1)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod allocator;
pub mod collision;
pub mod coords;
pub mod error;
pub mod grid;
pub mod transform;
pub mod world;
pub mod zone;

pub use allocator::{AllocatorConfig, AllocatorStats, InstanceAllocator, InstanceHandle};
pub use collision::CollisionMatrix;
pub use coords::{
    MapSquare, Position, ZoneCoord, ZoneRegion, ALTITUDE_COUNT, GRID_TILES, MAP_SQUARES_PER_AXIS,
    TILES_PER_MAP_SQUARE, TILES_PER_ZONE, ZONES_PER_AXIS, ZONES_PER_MAP_SQUARE,
};
pub use error::{GridError, GridResult};
pub use grid::{WorldGrid, ZoneProvider};
pub use transform::{copy_from, copy_from_rotated, copy_zone, copy_zone_rotated, paste};
pub use world::World;
pub use zone::{FloorItem, PlacedObject, Zone, ZoneEntity};
