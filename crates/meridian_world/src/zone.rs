//! # Zone
//!
//! The 8x8-tile unit of world storage, copy and network refresh. A zone
//! owns its collision matrix and its transient entity collections (stacked
//! floor items and placed objects). A zone is exclusively owned by
//! whichever grid slot currently holds it.

use crate::collision::CollisionMatrix;
use crate::coords::ZoneCoord;
use std::collections::HashMap;

/// A stack entry of items lying on one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorItem {
    /// Item type identifier.
    pub item_id: u32,
    /// Stack amount.
    pub amount: u32,
}

/// An object placed in a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedObject {
    /// Object type identifier.
    pub object_id: u32,
    /// Object shape code.
    pub shape: u8,
    /// Object rotation in quarter turns.
    pub rotation: u8,
    /// Zone-local tile X (`[0, 8)`).
    pub tile_x: u8,
    /// Zone-local tile Z (`[0, 8)`).
    pub tile_z: u8,
}

/// One entity record yielded during a full-refresh re-spawn pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneEntity<'a> {
    /// A floor item stack entry at a zone-local tile.
    Item {
        /// Zone-local tile X.
        tile_x: u8,
        /// Zone-local tile Z.
        tile_z: u8,
        /// The item entry.
        item: &'a FloorItem,
    },
    /// A placed object.
    Object(&'a PlacedObject),
}

/// The 8x8-tile unit of storage, copy and network refresh.
#[derive(Clone, Debug)]
pub struct Zone {
    coord: ZoneCoord,
    source: Option<ZoneCoord>,
    collision: CollisionMatrix,
    floor_items: HashMap<(u8, u8), Vec<FloorItem>>,
    objects: Vec<PlacedObject>,
    dynamic: bool,
    rotation: u8,
}

impl Zone {
    /// Creates a canonical (static) zone at the given address.
    #[must_use]
    pub fn new(coord: ZoneCoord) -> Self {
        Self {
            coord,
            source: None,
            collision: CollisionMatrix::for_zone(),
            floor_items: HashMap::new(),
            objects: Vec::new(),
            dynamic: false,
            rotation: 0,
        }
    }

    /// Creates a dynamic copy produced by a zone transform. Entity
    /// collections start empty: instancing re-spawns entities logically, it
    /// does not clone live entity state.
    pub(crate) fn dynamic_copy(
        source: ZoneCoord,
        collision: CollisionMatrix,
        rotation: u8,
    ) -> Self {
        Self {
            coord: source,
            source: Some(source),
            collision,
            floor_items: HashMap::new(),
            objects: Vec::new(),
            dynamic: true,
            rotation: rotation % 4,
        }
    }

    /// Creates an empty dynamic zone used to reserve allocated space.
    pub(crate) fn placeholder(coord: ZoneCoord) -> Self {
        Self {
            coord,
            source: None,
            collision: CollisionMatrix::for_zone(),
            floor_items: HashMap::new(),
            objects: Vec::new(),
            dynamic: true,
            rotation: 0,
        }
    }

    /// The address this zone is currently stored at.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ZoneCoord {
        self.coord
    }

    /// The source address this zone was copied from, if it is a copy with
    /// real content (reserved placeholders and canonical zones have none).
    #[inline]
    #[must_use]
    pub const fn source(&self) -> Option<ZoneCoord> {
        self.source
    }

    /// True if this zone was produced by copy/paste.
    #[inline]
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Rotation in quarter turns (`[0, 4)`).
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    /// The zone's collision matrix.
    #[inline]
    #[must_use]
    pub const fn collision(&self) -> &CollisionMatrix {
        &self.collision
    }

    /// Mutable access to the zone's collision matrix.
    #[inline]
    pub fn collision_mut(&mut self) -> &mut CollisionMatrix {
        &mut self.collision
    }

    /// Moves the zone to a new address. Only a paste may do this; the grid
    /// slot and the recorded address must always agree.
    pub(crate) fn readdress(&mut self, coord: ZoneCoord) {
        self.coord = coord;
    }

    /// Adds a floor item stack entry at a zone-local tile.
    pub fn add_floor_item(&mut self, tile_x: u8, tile_z: u8, item: FloorItem) {
        self.floor_items
            .entry((tile_x, tile_z))
            .or_default()
            .push(item);
    }

    /// Removes the first matching floor item at a zone-local tile.
    pub fn remove_floor_item(&mut self, tile_x: u8, tile_z: u8, item_id: u32) -> Option<FloorItem> {
        let stack = self.floor_items.get_mut(&(tile_x, tile_z))?;
        let index = stack.iter().position(|item| item.item_id == item_id)?;
        let removed = stack.remove(index);
        if stack.is_empty() {
            self.floor_items.remove(&(tile_x, tile_z));
        }
        Some(removed)
    }

    /// The item stack at a zone-local tile.
    #[must_use]
    pub fn items_at(&self, tile_x: u8, tile_z: u8) -> &[FloorItem] {
        self.floor_items
            .get(&(tile_x, tile_z))
            .map_or(&[], Vec::as_slice)
    }

    /// Adds a placed object.
    pub fn add_object(&mut self, object: PlacedObject) {
        self.objects.push(object);
    }

    /// Removes the first object matching id and tile.
    pub fn remove_object(&mut self, object_id: u32, tile_x: u8, tile_z: u8) -> Option<PlacedObject> {
        let index = self.objects.iter().position(|object| {
            object.object_id == object_id && object.tile_x == tile_x && object.tile_z == tile_z
        })?;
        Some(self.objects.remove(index))
    }

    /// The placed objects in this zone.
    #[must_use]
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    /// Iterates every transient entity in the zone. This is the source of
    /// the "clear then re-spawn" pass a full viewport swap requires.
    pub fn entities(&self) -> impl Iterator<Item = ZoneEntity<'_>> {
        self.floor_items
            .iter()
            .flat_map(|(&(tile_x, tile_z), stack)| {
                stack.iter().map(move |item| ZoneEntity::Item {
                    tile_x,
                    tile_z,
                    item,
                })
            })
            .chain(self.objects.iter().map(ZoneEntity::Object))
    }
}
