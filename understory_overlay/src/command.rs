// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction commands collected during a frame and delivered afterwards.
//!
//! The state machine and the arbitration pass only append [`Interaction`] values to an
//! ordered list. Delivering them to surfaces is a separate step, so the sequence for a
//! frame can be inspected, recorded or replayed before (or instead of) being dispatched.

use understory_pointer::{PointerHit, TrackedDevice};

use crate::surface::OverlaySurface;

/// One callback to deliver to an overlay surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Interaction<K> {
    /// [`OverlaySurface::on_move`].
    Move {
        /// Current hit.
        hit: PointerHit<K>,
        /// Whether the device is the overlay's primary pointer.
        primary: bool,
    },
    /// [`OverlaySurface::on_left`].
    Left {
        /// Overlay the device left.
        overlay: K,
        /// Device that left.
        device: TrackedDevice,
        /// Whether the device was the primary pointer.
        was_primary: bool,
    },
    /// [`OverlaySurface::on_pressed`].
    Pressed(PointerHit<K>),
    /// [`OverlaySurface::on_released`].
    Released(PointerHit<K>),
    /// [`OverlaySurface::on_grabbed`].
    Grabbed(PointerHit<K>),
    /// [`OverlaySurface::on_dropped`].
    Dropped(PointerHit<K>),
    /// [`OverlaySurface::on_scroll`].
    Scroll {
        /// Current hit.
        hit: PointerHit<K>,
        /// Normalized y axis value.
        value: f32,
    },
}

impl<K: Copy> Interaction<K> {
    /// Overlay receiving the callback.
    pub fn overlay(&self) -> K {
        match self {
            Self::Move { hit, .. } | Self::Scroll { hit, .. } => hit.overlay,
            Self::Pressed(hit) | Self::Released(hit) | Self::Grabbed(hit) | Self::Dropped(hit) => {
                hit.overlay
            }
            Self::Left { overlay, .. } => *overlay,
        }
    }

    /// Device the callback is about.
    pub fn device(&self) -> TrackedDevice {
        match self {
            Self::Move { hit, .. } | Self::Scroll { hit, .. } => hit.device,
            Self::Pressed(hit) | Self::Released(hit) | Self::Grabbed(hit) | Self::Dropped(hit) => {
                hit.device
            }
            Self::Left { device, .. } => *device,
        }
    }

    /// Invoke the matching callback on `surface` and return its result.
    pub fn deliver<S: OverlaySurface<K> + ?Sized>(&self, surface: &mut S) -> bool {
        match self {
            Self::Move { hit, primary } => surface.on_move(hit, *primary),
            Self::Left {
                device,
                was_primary,
                ..
            } => surface.on_left(*device, *was_primary),
            Self::Pressed(hit) => surface.on_pressed(hit),
            Self::Released(hit) => surface.on_released(hit),
            Self::Grabbed(hit) => surface.on_grabbed(hit),
            Self::Dropped(hit) => surface.on_dropped(hit),
            Self::Scroll { hit, value } => surface.on_scroll(hit, *value),
        }
    }
}
