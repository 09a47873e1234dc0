//! # Rebuild Wire Protocol
//!
//! Bit-exact framing for the two rebuild events.
//!
//! ## Event Structure
//!
//! ```text
//! Static:
//! ┌────────────────────────────────────────────────────────────┐
//! │ CenterZoneX (2) │ CenterZoneZ (2) │ KeySetCount (2)        │
//! ├────────────────────────────────────────────────────────────┤
//! │ KeySetCount groups of u32 keys (group lengths from config) │
//! └────────────────────────────────────────────────────────────┘
//!
//! Dynamic:
//! ┌────────────────────────────────────────────────────────────┐
//! │ Immediate (1)                                              │
//! ├────────────────────────────────────────────────────────────┤
//! │ CenterZoneX (2) │ CenterZoneZ (2) │ KeySetCount (2)        │
//! ├────────────────────────────────────────────────────────────┤
//! │ Bit-packed palette: per slot 1 presence bit, then a 26-bit │
//! │ descriptor if present; zero-padded to the byte boundary    │
//! ├────────────────────────────────────────────────────────────┤
//! │ KeySetCount groups of u32 keys                             │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Philosophy
//!
//! - The layout is a client contract: identical inputs produce identical
//!   bytes, and field positions are never re-derived
//! - Encoders are pure over a computed build-area snapshot
//! - Exactly two shapes, keyed on whether any palette slot is transformed

mod packets;
mod serialization;

pub use packets::{DynamicRebuild, KeySet, RebuildEvent, RebuildHeader, StaticRebuild};
pub use serialization::{ViewDeserializer, ViewSerializer, MAX_BUFFER_SIZE};
