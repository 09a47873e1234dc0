//! # Rebuild Event Definitions
//!
//! The two wire events that communicate a viewport swap to a client.
//!
//! The set of shapes is closed: a rebuild is either static (every palette
//! slot maps identity-wise to the canonical grid) or dynamic (at least one
//! slot holds a transformed zone). New wire formats are new enum variants,
//! never subtypes of an open encoder interface.

use crate::build_area::BuildArea;
use crate::palette::BuildAreaPalette;
use bytemuck::{Pod, Zeroable};

/// Fixed-size header shared by both rebuild events.
///
/// Total size: 6 bytes, little-endian fields.
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct RebuildHeader {
    /// Zone X of the new build-area center.
    pub center_zone_x: u16,
    /// Zone Z of the new build-area center.
    pub center_zone_z: u16,
    /// Number of configuration key groups that follow the body.
    pub key_set_count: u16,
}

impl RebuildHeader {
    /// Creates a new rebuild header.
    #[inline]
    #[must_use]
    pub const fn new(center_zone_x: u16, center_zone_z: u16, key_set_count: u16) -> Self {
        Self {
            center_zone_x,
            center_zone_z,
            key_set_count,
        }
    }

    /// Size of the header in bytes.
    pub const SIZE: usize = 6;
}

/// One group of opaque configuration keys. The keys are client-side
/// identifiers; this crate carries them without interpreting them, and the
/// per-group key count is the config collaborator's contract.
pub type KeySet = Vec<u32>;

/// Rebuild with an all-identity palette: the client resolves every zone
/// from its own canonical map data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticRebuild {
    /// Zone X of the new center.
    pub center_zone_x: u16,
    /// Zone Z of the new center.
    pub center_zone_z: u16,
    /// Configuration key groups.
    pub key_sets: Vec<KeySet>,
}

/// Rebuild carrying transformed zones: a bit-packed palette tells the
/// client which slots are copies and where each copy's source lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynamicRebuild {
    /// Whether the client must block rendering until the swap is applied.
    pub immediate: bool,
    /// Zone X of the new center.
    pub center_zone_x: u16,
    /// Zone Z of the new center.
    pub center_zone_z: u16,
    /// The palette snapshot computed by the rebuild.
    pub palette: BuildAreaPalette,
    /// Configuration key groups.
    pub key_sets: Vec<KeySet>,
}

/// A rebuild wire event: exactly one of the two shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RebuildEvent {
    /// All-identity palette.
    Static(StaticRebuild),
    /// At least one transformed zone.
    Dynamic(DynamicRebuild),
}

impl RebuildEvent {
    /// Builds the event for a completed rebuild: static iff no palette slot
    /// is dynamic. Pure over the build-area snapshot; reads no grid or
    /// allocator state. Returns `None` if the area has never been rebuilt.
    #[must_use]
    pub fn for_build_area(
        area: &BuildArea,
        immediate: bool,
        key_sets: Vec<KeySet>,
    ) -> Option<Self> {
        let center = area.center_zone()?;
        if area.palette().has_dynamic() {
            Some(Self::Dynamic(DynamicRebuild {
                immediate,
                center_zone_x: center.x(),
                center_zone_z: center.z(),
                palette: area.palette().clone(),
                key_sets,
            }))
        } else {
            Some(Self::Static(StaticRebuild {
                center_zone_x: center.x(),
                center_zone_z: center.z(),
                key_sets,
            }))
        }
    }
}
