//! # MERIDIAN View
//!
//! Per-observer dynamic view over the authoritative world grid:
//! - 13x13-zone build area with `[16, 88)` rebuild margins
//! - Palette of transformed-zone descriptors computed on each rebuild
//! - The two rebuild wire encodings (static / dynamic), bit-exact
//!
//! ## Architecture Rules
//!
//! 1. **Pure encoders** - Wire events are functions of a computed
//!    build-area snapshot; they never read grid or allocator state
//! 2. **Closed event set** - Exactly two shapes; new formats are new
//!    variants, not subtypes
//! 3. **Owned bookkeeping** - Each observer owns its pending-update set,
//!    reset on every rebuild; nothing is shared across observers
//!
//! ## Example
//!
//! ```rust,ignore
//! use meridian_view::{BuildArea, RebuildEvent, ViewSerializer};
//!
//! let mut area = BuildArea::new();
//! if area.rebuild_required(position) {
//!     let refresh = area.rebuild(position, &grid);
//!     let event = RebuildEvent::for_build_area(&area, false, key_sets);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod build_area;
pub mod palette;
pub mod protocol;

pub use build_area::{
    BuildArea, RefreshOp, ACTIVE_WINDOW_ZONES, BUILD_AREA_TILES, REBUILD_MARGIN_HIGH,
    REBUILD_MARGIN_LOW,
};
pub use palette::{BuildAreaPalette, PaletteSlot, BUILD_AREA_ZONES};
pub use protocol::{
    DynamicRebuild, KeySet, RebuildEvent, RebuildHeader, StaticRebuild, ViewDeserializer,
    ViewSerializer, MAX_BUFFER_SIZE,
};
