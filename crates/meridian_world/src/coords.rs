//! # Coordinate System
//!
//! The world is addressed at three granularities:
//!
//! - **Tile**: the atomic unit, `x,z ∈ [0, 16384)`, `altitude ∈ [0, 4)`.
//! - **Zone**: 8x8 tiles, the unit of storage, copy and network refresh.
//! - **Map square**: 64x64 tiles (8x8 zones), the unit of instance-area
//!   alignment.
//!
//! All coordinate types are bounds-checked at construction, so an
//! out-of-range address is unrepresentable downstream: holding a
//! [`ZoneCoord`] is proof the address is inside the grid.

use crate::error::{GridError, GridResult};

/// Tiles per zone along one axis.
pub const TILES_PER_ZONE: u16 = 8;

/// Tiles per map square along one axis.
pub const TILES_PER_MAP_SQUARE: u16 = 64;

/// Zones per map square along one axis.
pub const ZONES_PER_MAP_SQUARE: u16 = 8;

/// Tiles per horizontal axis of the fixed grid.
pub const GRID_TILES: u16 = 16384;

/// Zones per horizontal axis of the fixed grid.
pub const ZONES_PER_AXIS: u16 = GRID_TILES / TILES_PER_ZONE;

/// Map squares per horizontal axis of the fixed grid.
pub const MAP_SQUARES_PER_AXIS: u16 = GRID_TILES / TILES_PER_MAP_SQUARE;

/// Number of altitude levels.
pub const ALTITUDE_COUNT: u8 = 4;

/// An absolute tile position in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    x: u16,
    z: u16,
    altitude: u8,
}

impl Position {
    /// Creates a position, validating it against the fixed grid bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `x` or `z` is not in
    /// `[0, 16384)` or `altitude` is not in `[0, 4)`.
    pub fn new(x: u16, z: u16, altitude: u8) -> GridResult<Self> {
        if x >= GRID_TILES || z >= GRID_TILES || altitude >= ALTITUDE_COUNT {
            return Err(GridError::OutOfBounds {
                x: i32::from(x),
                z: i32::from(z),
                altitude,
            });
        }
        Ok(Self { x, z, altitude })
    }

    /// Absolute tile X.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> u16 {
        self.x
    }

    /// Absolute tile Z.
    #[inline]
    #[must_use]
    pub const fn z(&self) -> u16 {
        self.z
    }

    /// Altitude level.
    #[inline]
    #[must_use]
    pub const fn altitude(&self) -> u8 {
        self.altitude
    }

    /// The zone containing this position.
    #[inline]
    #[must_use]
    pub const fn zone(&self) -> ZoneCoord {
        ZoneCoord::new_unchecked(
            self.altitude,
            self.x / TILES_PER_ZONE,
            self.z / TILES_PER_ZONE,
        )
    }

    /// The map square containing this position.
    #[inline]
    #[must_use]
    pub const fn map_square(&self) -> MapSquare {
        MapSquare::new(
            (self.x / TILES_PER_MAP_SQUARE) as u8,
            (self.z / TILES_PER_MAP_SQUARE) as u8,
        )
    }

    /// Tile X within the containing zone (`[0, 8)`).
    #[inline]
    #[must_use]
    pub const fn local_x(&self) -> u8 {
        (self.x % TILES_PER_ZONE) as u8
    }

    /// Tile Z within the containing zone (`[0, 8)`).
    #[inline]
    #[must_use]
    pub const fn local_z(&self) -> u8 {
        (self.z % TILES_PER_ZONE) as u8
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.z, self.altitude)
    }
}

/// A bounds-checked zone address: `(altitude, zoneX, zoneZ)`.
///
/// This is the index type of the world grid. Construction validates the
/// address, so every live `ZoneCoord` refers to a slot inside the fixed
/// 4x2048x2048 address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ZoneCoord {
    altitude: u8,
    x: u16,
    z: u16,
}

impl ZoneCoord {
    /// Creates a zone coordinate, validating it against the grid bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `x` or `z` is not in
    /// `[0, 2048)` or `altitude` is not in `[0, 4)`.
    pub fn new(altitude: u8, x: u16, z: u16) -> GridResult<Self> {
        if x >= ZONES_PER_AXIS || z >= ZONES_PER_AXIS || altitude >= ALTITUDE_COUNT {
            return Err(GridError::OutOfBounds {
                x: i32::from(x),
                z: i32::from(z),
                altitude,
            });
        }
        Ok(Self { altitude, x, z })
    }

    /// Constructs without validation. Callers must uphold the bounds
    /// invariant structurally (e.g. values derived from a valid
    /// [`Position`]).
    #[inline]
    pub(crate) const fn new_unchecked(altitude: u8, x: u16, z: u16) -> Self {
        Self { altitude, x, z }
    }

    /// Altitude level.
    #[inline]
    #[must_use]
    pub const fn altitude(&self) -> u8 {
        self.altitude
    }

    /// Zone X (`[0, 2048)`).
    #[inline]
    #[must_use]
    pub const fn x(&self) -> u16 {
        self.x
    }

    /// Zone Z (`[0, 2048)`).
    #[inline]
    #[must_use]
    pub const fn z(&self) -> u16 {
        self.z
    }

    /// The south-west tile of this zone.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Position {
        Position {
            x: self.x * TILES_PER_ZONE,
            z: self.z * TILES_PER_ZONE,
            altitude: self.altitude,
        }
    }

    /// The zone offset by `(dx, dz)` zones, bounds-checked.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the offset address leaves the
    /// grid.
    pub fn translated(&self, dx: i32, dz: i32) -> GridResult<Self> {
        let x = i32::from(self.x) + dx;
        let z = i32::from(self.z) + dz;
        if x < 0 || x >= i32::from(ZONES_PER_AXIS) || z < 0 || z >= i32::from(ZONES_PER_AXIS) {
            return Err(GridError::OutOfBounds {
                x,
                z,
                altitude: self.altitude,
            });
        }
        Ok(Self {
            altitude: self.altitude,
            x: x as u16,
            z: z as u16,
        })
    }
}

impl std::fmt::Display for ZoneCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "altitude {} zone ({}, {})", self.altitude, self.x, self.z)
    }
}

/// A map square address: the 64x64-tile alignment unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MapSquare {
    /// Map square X (`[0, 256)`; every `u8` is valid).
    pub x: u8,
    /// Map square Z (`[0, 256)`; every `u8` is valid).
    pub z: u8,
}

impl MapSquare {
    /// Creates a map square address.
    #[inline]
    #[must_use]
    pub const fn new(x: u8, z: u8) -> Self {
        Self { x, z }
    }

    /// The zone X of this map square's south-west zone.
    #[inline]
    #[must_use]
    pub const fn base_zone_x(&self) -> u16 {
        self.x as u16 * ZONES_PER_MAP_SQUARE
    }

    /// The zone Z of this map square's south-west zone.
    #[inline]
    #[must_use]
    pub const fn base_zone_z(&self) -> u16 {
        self.z as u16 * ZONES_PER_MAP_SQUARE
    }
}

/// A rectangular block of zones at one altitude.
///
/// Used both as the source description for instance allocation and as the
/// reserved target footprint recorded in an instance handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneRegion {
    origin: ZoneCoord,
    width_zones: u16,
    length_zones: u16,
}

impl ZoneRegion {
    /// Creates a region, validating that it lies entirely inside the grid
    /// and spans at least one zone on each axis.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the region is empty or any
    /// part of it leaves the grid.
    pub fn new(
        altitude: u8,
        zone_x: u16,
        zone_z: u16,
        width_zones: u16,
        length_zones: u16,
    ) -> GridResult<Self> {
        let origin = ZoneCoord::new(altitude, zone_x, zone_z)?;
        if width_zones == 0
            || length_zones == 0
            || u32::from(zone_x) + u32::from(width_zones) > u32::from(ZONES_PER_AXIS)
            || u32::from(zone_z) + u32::from(length_zones) > u32::from(ZONES_PER_AXIS)
        {
            return Err(GridError::OutOfBounds {
                x: i32::from(zone_x) + i32::from(width_zones),
                z: i32::from(zone_z) + i32::from(length_zones),
                altitude,
            });
        }
        Ok(Self {
            origin,
            width_zones,
            length_zones,
        })
    }

    /// The south-west zone of the region.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> ZoneCoord {
        self.origin
    }

    /// Width in zones.
    #[inline]
    #[must_use]
    pub const fn width_zones(&self) -> u16 {
        self.width_zones
    }

    /// Length in zones.
    #[inline]
    #[must_use]
    pub const fn length_zones(&self) -> u16 {
        self.length_zones
    }

    /// Width in tiles.
    #[inline]
    #[must_use]
    pub const fn width_tiles(&self) -> u16 {
        self.width_zones * TILES_PER_ZONE
    }

    /// Length in tiles.
    #[inline]
    #[must_use]
    pub const fn length_tiles(&self) -> u16 {
        self.length_zones * TILES_PER_ZONE
    }

    /// The zone at region-local offset `(dx, dz)`.
    ///
    /// Offsets beyond the region dimensions are a caller bug; the result is
    /// still clamped inside the grid by construction of the region.
    #[inline]
    #[must_use]
    pub const fn at_offset(&self, dx: u16, dz: u16) -> ZoneCoord {
        ZoneCoord::new_unchecked(
            self.origin.altitude,
            self.origin.x + dx,
            self.origin.z + dz,
        )
    }

    /// Returns true if `coord` lies inside the region.
    #[must_use]
    pub fn contains(&self, coord: ZoneCoord) -> bool {
        coord.altitude == self.origin.altitude
            && coord.x >= self.origin.x
            && coord.x < self.origin.x + self.width_zones
            && coord.z >= self.origin.z
            && coord.z < self.origin.z + self.length_zones
    }

    /// Iterates region-local offsets, x-major then z.
    pub fn offsets(&self) -> impl Iterator<Item = (u16, u16)> {
        let (w, l) = (self.width_zones, self.length_zones);
        (0..w).flat_map(move |dx| (0..l).map(move |dz| (dx, dz)))
    }

    /// Iterates every zone address in the region, x-major then z.
    pub fn zones(&self) -> impl Iterator<Item = ZoneCoord> {
        let region = *self;
        region.offsets().map(move |(dx, dz)| region.at_offset(dx, dz))
    }
}
