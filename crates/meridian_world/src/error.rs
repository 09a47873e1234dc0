//! # Grid Error Types
//!
//! All errors that can occur in the world grid and instance allocator.

use crate::coords::ZoneCoord;
use thiserror::Error;

/// Errors that can occur in the world grid and instance allocator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Address outside the fixed grid. Indicates a caller bug; the address
    /// space never resizes, so this is not recoverable by retrying.
    #[error("coordinate out of bounds: x={x} z={z} altitude={altitude}")]
    OutOfBounds {
        /// X component of the offending address.
        x: i32,
        /// Z component of the offending address.
        z: i32,
        /// Altitude component of the offending address.
        altitude: u8,
    },

    /// Attempted to store a zone into a non-empty slot. Recoverable: clear
    /// the slot first or pick another address.
    #[error("zone slot already occupied at {zone}")]
    SlotOccupied {
        /// The occupied slot.
        zone: ZoneCoord,
    },

    /// Attempted to copy a zone that does not exist at the given address.
    /// Recoverable: the caller should abort the instance request.
    #[error("no zone at {zone}")]
    NotFound {
        /// The empty address.
        zone: ZoneCoord,
    },

    /// The allocator exhausted its search space without finding a free
    /// area. Recoverable: defer or queue the instance request.
    #[error("no free {width_tiles}x{length_tiles} tile area at altitude {altitude}")]
    ResourceExhausted {
        /// Altitude that was searched.
        altitude: u8,
        /// Requested area width in tiles.
        width_tiles: u16,
        /// Requested area length in tiles.
        length_tiles: u16,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
