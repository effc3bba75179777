// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pointer --heading-base-level=0

//! Understory Pointer: tracked pointing devices and the hits they produce on overlays.
//!
//! ## Overview
//!
//! This crate holds the value types shared by the overlay interaction engine:
//!
//! - [`TrackedDevice`]: identity of a pointing source (hands, head, extra trackers).
//! - [`PointerModifier`]: the hand posture the input source attaches to a pointer.
//! - [`PointerHit`]: one device's intersection with one overlay, for one frame.
//! - [`DeadZone`] and [`ActiveArea`]: the mapping from raw surface UV to the overlay's
//!   interactive area, with a configurable border that never reacts to pointers.
//!
//! It does not cast rays or decide which overlay is struck.
//! Feed it the UV that your ray test produced and it tells you whether the hit is live and
//! where it lands in the active area.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Size, Vec2};
//! use understory_pointer::{DeadZone, PointerHit, PointerModifier, TrackedDevice};
//!
//! // A 1000x500 texture with a 100x50 pixel border.
//! let dz = DeadZone::from_margin(Size::new(1000.0, 500.0), Vec2::new(100.0, 50.0)).unwrap();
//!
//! let raw = Point::new(0.5, 0.5);
//! let active = dz.map(raw).expect("center is live");
//!
//! let hit = PointerHit {
//!     device: TrackedDevice::RightHand,
//!     overlay: 7_u32,
//!     distance: 1.25,
//!     raw_uv: raw,
//!     active_uv: active,
//!     modifier: PointerModifier::None,
//! };
//! assert!(hit.is_live());
//!
//! // Hits in the border are dropped.
//! assert!(dz.map(Point::new(0.05, 0.5)).is_none());
//! ```
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

mod dead_zone;
mod types;

pub use dead_zone::{ActiveArea, DeadZone, DeadZoneError};
pub use types::{MODIFIER_FACING_THRESHOLD, PointerHit, PointerModifier, TrackedDevice};
