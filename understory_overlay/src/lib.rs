// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_overlay --heading-base-level=0

//! Understory Overlay: deterministic pointer arbitration for overlays in tracked 3D space.
//!
//! ## Overview
//!
//! Several tracked devices (usually two hand controllers) point at flat overlays. Every frame
//! this crate decides which overlay each device interacts with, which device is an overlay's
//! primary pointer, and how click, grab and scroll inputs turn into callbacks.
//!
//! It does not cast rays or render anything. The host supplies an [`InputSource`] (ray tests
//! and action bindings) and implements [`OverlaySurface`] for each overlay kind.
//!
//! ## Pieces
//!
//! - [`OverlayRegistry`]: owns the overlays, their flags, dead-zone configuration and
//!   per-overlay [`InteractionState`]. Ids are generational, so stale ids never alias.
//! - [`Arbiter`]: the per-frame pass. It keeps each device's owner overlay across frames,
//!   sends leaves on transitions, and finalizes every overlay that was hit.
//! - [`InteractionState`]: the per-overlay machine for primary/secondary promotion and the
//!   click and grab holds.
//! - [`Interaction`]: the ordered command list a pass produces. Collect it and dispatch it later,
//!   or use [`Arbiter::run_frame`] to do both.
//!
//! ## Ordering
//!
//! - A device's leave on its previous overlay precedes anything it does on a new one.
//! - Within one overlay: grab, then click, then scroll, then hover moves.
//! - A hold taken over by another device is released before the new press.
//! - Every device with a live hit receives exactly one move per frame, flagged primary only
//!   for the overlay's primary pointer.
//! - A device gets at most one click transition and one grab transition per frame, even
//!   when it crosses from one overlay to another with a button held.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use understory_overlay::{
//!     Arbiter, BoolAction, InputSource, Interaction, OverlayConfig, OverlayId, OverlayRegistry,
//!     RayHit, Vector2Action,
//! };
//! use understory_pointer::TrackedDevice;
//!
//! /// The right hand points at one overlay with the trigger held.
//! struct Fixed(OverlayId);
//!
//! impl InputSource<OverlayId> for Fixed {
//!     fn intersect(&mut self, device: TrackedDevice) -> Option<RayHit<OverlayId>> {
//!         (device == TrackedDevice::RightHand).then_some(RayHit {
//!             overlay: self.0,
//!             distance: 0.8,
//!             uv: Point::new(0.5, 0.5),
//!         })
//!     }
//!     fn bool_action(&self, action: BoolAction, _: TrackedDevice) -> bool {
//!         action == BoolAction::Click
//!     }
//!     fn vector2_action(&self, _: Vector2Action, _: TrackedDevice) -> (f32, f32) {
//!         (0.0, 0.0)
//!     }
//! }
//!
//! let mut registry = OverlayRegistry::new();
//! let panel = registry.insert("panel", OverlayConfig::default());
//! let mut arbiter = Arbiter::default();
//!
//! let frame = arbiter.collect(&mut registry, &mut Fixed(panel));
//! assert!(matches!(frame[0], Interaction::Move { primary: true, .. }));
//! assert!(matches!(frame[1], Interaction::Pressed(hit) if hit.device == TrackedDevice::RightHand));
//! assert_eq!(arbiter.owner(TrackedDevice::RightHand), Some(panel));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arbiter;
mod command;
mod input;
mod machine;
mod registry;
mod surface;

pub use arbiter::{Arbiter, LASER_MAX_LENGTH, PointerState};
pub use command::Interaction;
pub use input::{
    BoolAction, ButtonState, InputSource, PointerInput, RayHit, SCROLL_THRESHOLD, Vector2Action,
};
pub use machine::{FrameHit, InteractionState};
pub use registry::{OverlayConfig, OverlayFlags, OverlayId, OverlayRegistry};
pub use surface::OverlaySurface;
