// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-overlay interaction state machine.
//!
//! ## Overview
//!
//! [`InteractionState`] owns everything an overlay remembers about pointers across frames:
//! the primary and secondary pointer, and which device holds the click and grab actions.
//! The arbitration pass drives it with two calls:
//!
//! - [`InteractionState::leave`] when a device stops pointing at the overlay.
//! - [`InteractionState::finalize`] once per frame with every live hit on the overlay.
//!
//! Both only append [`Interaction`] commands to a caller-provided list.
//!
//! ## Finalize order
//!
//! 1. Grab: release, take-over and press transitions for every hit.
//! 2. Promotion: the first grab press, else the first click press, else the device
//!    still holding click, else the first hit beyond
//!    [`SCROLL_THRESHOLD`](crate::SCROLL_THRESHOLD) becomes primary. While a device
//!    holds grab, click and scroll only consider that device's hit, so a drag never
//!    also registers as someone else's click.
//! 3. Click: release, take-over and press transitions. The presser and a continuing
//!    holder receive their `Move` here.
//! 4. Scroll.
//! 5. Hover: every hit that did not already receive a move from the click channel gets
//!    exactly one `Move`.
//!
//! Every `Move` is flagged primary exactly when its device is the primary pointer after
//! promotion.
//!
//! A take-over (another device pressing while the action is held) releases the previous
//! holder first. The release carries the holder's device with the geometry of the hit
//! that took over. At most one press transition per action happens per frame; the first
//! device in hit order wins.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use understory_pointer::{PointerHit, TrackedDevice};

use crate::command::Interaction;
use crate::input::PointerInput;

/// One live hit on an overlay together with the device's input this frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameHit<K> {
    /// The hit.
    pub hit: PointerHit<K>,
    /// Action snapshot of the hit's device.
    pub input: PointerInput,
}

/// Interaction state of one overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionState<K> {
    primary: Option<PointerHit<K>>,
    secondary: Option<PointerHit<K>>,
    click_held: Option<PointerHit<K>>,
    grab_held: Option<PointerHit<K>>,
}

impl<K> Default for InteractionState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> InteractionState<K> {
    /// Fresh state: no pointers, nothing held.
    pub const fn new() -> Self {
        Self {
            primary: None,
            secondary: None,
            click_held: None,
            grab_held: None,
        }
    }
}

impl<K: Copy> InteractionState<K> {
    /// Primary pointer, refreshed every frame its device is present.
    pub fn primary(&self) -> Option<&PointerHit<K>> {
        self.primary.as_ref()
    }

    /// Secondary pointer.
    pub fn secondary(&self) -> Option<&PointerHit<K>> {
        self.secondary.as_ref()
    }

    /// Last-known hit of the device holding click.
    pub fn click_held(&self) -> Option<&PointerHit<K>> {
        self.click_held.as_ref()
    }

    /// Last-known hit of the device holding grab.
    pub fn grab_held(&self) -> Option<&PointerHit<K>> {
        self.grab_held.as_ref()
    }

    /// True when the device is this overlay's primary pointer.
    pub fn is_primary(&self, device: TrackedDevice) -> bool {
        self.primary.is_some_and(|p| p.device == device)
    }

    /// True when no pointer is tracked and nothing is held.
    pub fn is_idle(&self) -> bool {
        self.primary.is_none()
            && self.secondary.is_none()
            && self.click_held.is_none()
            && self.grab_held.is_none()
    }

    /// Forget every pointer and hold without emitting anything.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// `device` no longer points at `overlay`.
    ///
    /// Releases the grab, then the click, if `device` holds them, then emits `Left`.
    /// If the device was primary, the secondary pointer (if any) takes its place.
    pub fn leave(&mut self, overlay: K, device: TrackedDevice, out: &mut Vec<Interaction<K>>) {
        if let Some(held) = self.grab_held.filter(|h| h.device == device) {
            self.grab_held = None;
            out.push(Interaction::Dropped(held));
        }
        if let Some(held) = self.click_held.filter(|h| h.device == device) {
            self.click_held = None;
            out.push(Interaction::Released(held));
        }
        let was_primary = if self.is_primary(device) {
            self.primary = self.secondary.take();
            true
        } else {
            if self.secondary.is_some_and(|s| s.device == device) {
                self.secondary = None;
            }
            false
        };
        out.push(Interaction::Left {
            overlay,
            device,
            was_primary,
        });
    }

    /// Resolve one frame of hits on this overlay.
    ///
    /// `hits` holds at most one entry per device, in dispatch order.
    pub fn finalize(&mut self, hits: &[FrameHit<K>], out: &mut Vec<Interaction<K>>) {
        if hits.is_empty() {
            return;
        }
        debug_assert!(
            hits.iter()
                .enumerate()
                .all(|(i, a)| hits[i + 1..].iter().all(|b| b.hit.device != a.hit.device)),
            "at most one hit per device"
        );

        let grab_pressed = self.grab_pass(hits, out);

        // An active grab narrows the click channel to the grabbing device.
        let channel = match self
            .grab_held
            .and_then(|g| hits.iter().position(|h| h.hit.device == g.device))
        {
            Some(i) => i..i + 1,
            None => 0..hits.len(),
        };

        let click_pressed = self.click_press(hits, channel.clone());
        let click_holding = self.click_held.and_then(|held| {
            channel
                .clone()
                .find(|&i| hits[i].hit.device == held.device && hits[i].input.click.down)
        });
        let scrolled = channel
            .clone()
            .find(|&i| hits[i].input.qualifying_scroll().is_some());

        if let Some(i) = grab_pressed
            .or(click_pressed)
            .or(click_holding)
            .or(scrolled)
        {
            self.promote(hits[i].hit);
        }

        let mut moved = vec![false; hits.len()];
        self.click_pass(hits, channel, click_pressed, &mut moved, out);
        if let Some(i) = scrolled {
            out.push(Interaction::Scroll {
                hit: hits[i].hit,
                value: hits[i].input.scroll,
            });
        }

        for (fh, moved) in hits.iter().zip(moved) {
            let hit = fh.hit;
            self.refresh(&hit);
            if moved {
                continue;
            }
            let primary = match self.primary {
                None => {
                    if self.secondary.is_some_and(|s| s.device == hit.device) {
                        self.secondary = None;
                    }
                    self.primary = Some(hit);
                    true
                }
                Some(p) => p.device == hit.device,
            };
            if !primary {
                self.secondary = Some(hit);
            }
            out.push(Interaction::Move { hit, primary });
        }
    }

    fn grab_pass(&mut self, hits: &[FrameHit<K>], out: &mut Vec<Interaction<K>>) -> Option<usize> {
        let mut pressed = None;
        for (i, fh) in hits.iter().enumerate() {
            let down = fh.input.grab.down;
            if let Some(held) = self.grab_held.as_mut().filter(|h| h.device == fh.hit.device) {
                held.update_from(&fh.hit);
                if !down {
                    out.push(Interaction::Dropped(*held));
                    self.grab_held = None;
                }
                continue;
            }
            if !down || pressed.is_some() {
                continue;
            }
            if fh.input.grab.pressed() || self.grab_held.is_none() {
                if let Some(mut prev) = self.grab_held.take() {
                    prev.update_from(&fh.hit);
                    out.push(Interaction::Dropped(prev));
                }
                out.push(Interaction::Grabbed(fh.hit));
                self.grab_held = Some(fh.hit);
                pressed = Some(i);
            }
        }
        pressed
    }

    /// Index of the hit that presses click this frame, if any.
    ///
    /// Follows the same rules as [`Self::click_pass`] without touching state.
    fn click_press(&self, hits: &[FrameHit<K>], channel: Range<usize>) -> Option<usize> {
        let mut holder = self.click_held.map(|h| h.device);
        for i in channel {
            let fh = &hits[i];
            let down = fh.input.click.down;
            if holder == Some(fh.hit.device) {
                if !down {
                    holder = None;
                }
                continue;
            }
            if down && (fh.input.click.pressed() || holder.is_none()) {
                return Some(i);
            }
        }
        None
    }

    fn click_pass(
        &mut self,
        hits: &[FrameHit<K>],
        channel: Range<usize>,
        pressed: Option<usize>,
        moved: &mut [bool],
        out: &mut Vec<Interaction<K>>,
    ) {
        for i in channel {
            let fh = &hits[i];
            let down = fh.input.click.down;
            let primary = self.is_primary(fh.hit.device);
            if let Some(held) = self.click_held.as_mut().filter(|h| h.device == fh.hit.device) {
                if down && pressed.is_some() {
                    // Taken over below; the holder only hovers.
                    continue;
                }
                held.update_from(&fh.hit);
                if down {
                    out.push(Interaction::Move {
                        hit: fh.hit,
                        primary,
                    });
                    moved[i] = true;
                } else {
                    out.push(Interaction::Released(*held));
                    self.click_held = None;
                }
                continue;
            }
            if pressed != Some(i) {
                continue;
            }
            if let Some(mut prev) = self.click_held.take() {
                prev.update_from(&fh.hit);
                out.push(Interaction::Released(prev));
            }
            out.push(Interaction::Move {
                hit: fh.hit,
                primary,
            });
            moved[i] = true;
            out.push(Interaction::Pressed(fh.hit));
            self.click_held = Some(fh.hit);
        }
    }

    fn promote(&mut self, hit: PointerHit<K>) {
        match self.primary {
            Some(p) if p.device == hit.device => {}
            Some(p) => self.secondary = Some(p),
            None => {
                if self.secondary.is_some_and(|s| s.device == hit.device) {
                    self.secondary = None;
                }
            }
        }
        self.primary = Some(hit);
    }

    fn refresh(&mut self, hit: &PointerHit<K>) {
        for slot in [&mut self.primary, &mut self.secondary] {
            if let Some(p) = slot.as_mut().filter(|p| p.device == hit.device) {
                *p = *hit;
            }
        }
    }
}
