// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay-surface seam: the callbacks an interactive overlay receives.
//!
//! Each concrete overlay kind (a captured screen, a keyboard, a watch) implements
//! [`OverlaySurface`]. Registries can hold a tagged enum of kinds or boxed trait objects;
//! `Box<S>` forwards to `S`.
//!
//! Every callback returns a `bool` telling whether the surface handled the event. The
//! engine never branches on it; it only exists so surfaces can short-circuit their own
//! layered handling.

use alloc::boxed::Box;

use understory_pointer::{PointerHit, TrackedDevice};

/// Receiver of pointer interactions for one overlay.
pub trait OverlaySurface<K> {
    /// The pointer moved over the overlay.
    ///
    /// Called before [`on_pressed`](Self::on_pressed) for the same hit.
    fn on_move(&mut self, hit: &PointerHit<K>, primary: bool) -> bool;

    /// A device stopped pointing at the overlay.
    fn on_left(&mut self, device: TrackedDevice, was_primary: bool) -> bool;

    /// Click pressed.
    fn on_pressed(&mut self, hit: &PointerHit<K>) -> bool;

    /// Click released.
    fn on_released(&mut self, hit: &PointerHit<K>) -> bool;

    /// Grab started.
    fn on_grabbed(&mut self, hit: &PointerHit<K>) -> bool;

    /// Grab ended.
    fn on_dropped(&mut self, hit: &PointerHit<K>) -> bool;

    /// Scroll beyond the threshold; `value` is the normalized y axis.
    fn on_scroll(&mut self, hit: &PointerHit<K>, value: f32) -> bool;
}

impl<K, S: OverlaySurface<K> + ?Sized> OverlaySurface<K> for Box<S> {
    fn on_move(&mut self, hit: &PointerHit<K>, primary: bool) -> bool {
        (**self).on_move(hit, primary)
    }

    fn on_left(&mut self, device: TrackedDevice, was_primary: bool) -> bool {
        (**self).on_left(device, was_primary)
    }

    fn on_pressed(&mut self, hit: &PointerHit<K>) -> bool {
        (**self).on_pressed(hit)
    }

    fn on_released(&mut self, hit: &PointerHit<K>) -> bool {
        (**self).on_released(hit)
    }

    fn on_grabbed(&mut self, hit: &PointerHit<K>) -> bool {
        (**self).on_grabbed(hit)
    }

    fn on_dropped(&mut self, hit: &PointerHit<K>) -> bool {
        (**self).on_dropped(hit)
    }

    fn on_scroll(&mut self, hit: &PointerHit<K>, value: f32) -> bool {
        (**self).on_scroll(hit, value)
    }
}
