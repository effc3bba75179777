// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame arbitration pass.
//!
//! ## Overview
//!
//! [`Arbiter`] keeps, for every registered device, the overlay it pointed at last frame and
//! the history of its buttons. [`Arbiter::collect`] then runs one frame:
//!
//! 1. Sample the device's actions and ray-test it through the [`InputSource`].
//! 2. Drop hits on overlays that are gone, hidden or not interactive, and hits inside the
//!    overlay's dead zone. Such a device has no hit this frame.
//! 3. If the device's overlay changed, run the leave path on the previous one (if it still
//!    exists) before anything happens on the new one. A button whose hold was released by
//!    that leave counts as up for the rest of the frame; if it is still down, the new
//!    overlay is pressed on the next frame.
//! 4. Group the remaining hits per overlay, in device order.
//! 5. Finalize every overlay that received a hit, in order of first hit.
//!
//! Finally a press of the show/hide binding on any device toggles the registry; hidden
//! overlays wind down on the next frame through the normal leave path.

use alloc::vec::Vec;
use understory_pointer::{PointerHit, PointerModifier, TrackedDevice};

use crate::command::Interaction;
use crate::input::{BoolAction, ButtonState, InputSource, PointerInput, Vector2Action};
use crate::machine::FrameHit;
use crate::registry::{OverlayId, OverlayRegistry};
use crate::surface::OverlaySurface;

/// Longest laser a renderer should draw, in metres.
pub const LASER_MAX_LENGTH: f32 = 10.0;

/// Where a device points after the last pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerState {
    /// Overlay under the pointer.
    pub overlay: OverlayId,
    /// Ray distance to the hit.
    pub distance: f32,
    /// Posture reported for the device.
    pub modifier: PointerModifier,
    /// Whether the device is the overlay's primary pointer.
    pub primary: bool,
}

impl PointerState {
    /// Hit distance clamped to [`LASER_MAX_LENGTH`].
    pub fn laser_length(&self) -> f32 {
        self.distance.min(LASER_MAX_LENGTH)
    }
}

#[derive(Clone, Debug)]
struct DeviceSlot {
    device: TrackedDevice,
    owner: Option<OverlayId>,
    click: ButtonState,
    grab: ButtonState,
    pointer: Option<PointerState>,
}

impl DeviceSlot {
    fn new(device: TrackedDevice) -> Self {
        Self {
            device,
            owner: None,
            click: ButtonState::UP,
            grab: ButtonState::UP,
            pointer: None,
        }
    }
}

/// Cross-frame driver of pointer interactions.
#[derive(Clone, Debug)]
pub struct Arbiter {
    slots: Vec<DeviceSlot>,
    show_hide: ButtonState,
}

impl Default for Arbiter {
    /// Arbiter for both hand controllers.
    fn default() -> Self {
        Self::new(TrackedDevice::HANDS)
    }
}

impl Arbiter {
    /// Create an arbiter for a set of devices.
    ///
    /// Devices are processed in ascending [`TrackedDevice`] order; duplicates are ignored.
    pub fn new(devices: impl IntoIterator<Item = TrackedDevice>) -> Self {
        let mut devices: Vec<_> = devices.into_iter().collect();
        devices.sort_unstable();
        devices.dedup();
        Self {
            slots: devices.into_iter().map(DeviceSlot::new).collect(),
            show_hide: ButtonState::UP,
        }
    }

    /// Registered devices in processing order.
    pub fn devices(&self) -> impl Iterator<Item = TrackedDevice> + '_ {
        self.slots.iter().map(|s| s.device)
    }

    /// Overlay the device pointed at after the last pass.
    pub fn owner(&self, device: TrackedDevice) -> Option<OverlayId> {
        self.slot(device).and_then(|s| s.owner)
    }

    /// Laser state of the device after the last pass.
    pub fn pointer(&self, device: TrackedDevice) -> Option<PointerState> {
        self.slot(device).and_then(|s| s.pointer)
    }

    /// Tear down every device: run the leave path on each owned overlay that still exists,
    /// then forget owners, pointers and button history.
    ///
    /// Returns the resulting releases and leaves in device order, undelivered.
    pub fn reset<S>(&mut self, registry: &mut OverlayRegistry<S>) -> Vec<Interaction<OverlayId>> {
        let mut out = Vec::new();
        for slot in &mut self.slots {
            if let Some(owner) = slot.owner {
                if let Some(state) = registry.state_mut(owner) {
                    state.leave(owner, slot.device, &mut out);
                }
            }
            *slot = DeviceSlot::new(slot.device);
        }
        self.show_hide = ButtonState::UP;
        tracing::debug!(interactions = out.len(), "arbiter reset");
        out
    }

    /// Run one frame and return the ordered interactions.
    ///
    /// Nothing is delivered to surfaces; see [`OverlayRegistry::dispatch`] or
    /// [`Arbiter::run_frame`].
    pub fn collect<S, I>(
        &mut self,
        registry: &mut OverlayRegistry<S>,
        input: &mut I,
    ) -> Vec<Interaction<OverlayId>>
    where
        I: InputSource<OverlayId> + ?Sized,
    {
        let mut out = Vec::new();
        let mut groups: Vec<(OverlayId, Vec<FrameHit<OverlayId>>)> = Vec::new();
        let mut show_hide = false;

        for slot in &mut self.slots {
            let device = slot.device;
            slot.click = slot.click.advance(input.bool_action(BoolAction::Click, device));
            slot.grab = slot.grab.advance(input.bool_action(BoolAction::Grab, device));
            show_hide |= input.bool_action(BoolAction::ShowHide, device);
            let (_, scroll) = input.vector2_action(Vector2Action::Scroll, device);

            let hit = live_hit(registry, input, device);
            let owner = hit.map(|h| h.overlay);
            let (mut click, mut grab) = (slot.click, slot.grab);
            if slot.owner != owner {
                if let Some(prev) = slot.owner {
                    match registry.state_mut(prev) {
                        Some(state) => {
                            let before = out.len();
                            state.leave(prev, device, &mut out);
                            // One transition per device and action per frame.
                            for cmd in &out[before..] {
                                match cmd {
                                    Interaction::Released(_) => click = ButtonState::UP,
                                    Interaction::Dropped(_) => grab = ButtonState::UP,
                                    _ => {}
                                }
                            }
                        }
                        None => {
                            tracing::debug!(?device, overlay = ?prev, "previous owner no longer exists");
                        }
                    }
                }
                slot.owner = owner;
            }
            slot.pointer = hit.map(|h| PointerState {
                overlay: h.overlay,
                distance: h.distance,
                modifier: h.modifier,
                primary: false,
            });

            let Some(hit) = hit else { continue };
            let frame_hit = FrameHit {
                hit,
                input: PointerInput {
                    click,
                    grab,
                    scroll,
                },
            };
            match groups.iter_mut().find(|(id, _)| *id == hit.overlay) {
                Some((_, hits)) => hits.push(frame_hit),
                None => groups.push((hit.overlay, alloc::vec![frame_hit])),
            }
        }

        for (id, hits) in &groups {
            if let Some(state) = registry.state_mut(*id) {
                state.finalize(hits, &mut out);
            }
        }

        for slot in &mut self.slots {
            if let Some(p) = slot.pointer.as_mut() {
                p.primary = registry
                    .state(p.overlay)
                    .is_some_and(|s| s.is_primary(slot.device));
            }
        }

        self.show_hide = self.show_hide.advance(show_hide);
        if self.show_hide.pressed() {
            registry.toggle_show_hide();
        }

        for cmd in &out {
            tracing::trace!(?cmd, "interaction");
        }
        out
    }

    /// Run one frame and deliver its interactions to the registry's surfaces.
    ///
    /// Returns the interactions in delivery order.
    pub fn run_frame<S, I>(
        &mut self,
        registry: &mut OverlayRegistry<S>,
        input: &mut I,
    ) -> Vec<Interaction<OverlayId>>
    where
        S: OverlaySurface<OverlayId>,
        I: InputSource<OverlayId> + ?Sized,
    {
        let commands = self.collect(registry, input);
        registry.dispatch(&commands);
        commands
    }

    fn slot(&self, device: TrackedDevice) -> Option<&DeviceSlot> {
        self.slots.iter().find(|s| s.device == device)
    }
}

/// Ray-test `device` and keep the hit only if it lands in a live overlay's active area.
fn live_hit<S, I>(
    registry: &OverlayRegistry<S>,
    input: &mut I,
    device: TrackedDevice,
) -> Option<PointerHit<OverlayId>>
where
    I: InputSource<OverlayId> + ?Sized,
{
    let ray = input.intersect(device)?;
    if !registry.accepts_pointer(ray.overlay) {
        return None;
    }
    let area = registry.active_area(ray.overlay)?;
    let Some(active_uv) = area.map(ray.uv) else {
        tracing::trace!(?device, overlay = ?ray.overlay, "hit in dead zone");
        return None;
    };
    Some(PointerHit {
        device,
        overlay: ray.overlay,
        distance: ray.distance,
        raw_uv: ray.uv,
        active_uv,
        modifier: input.modifier(device),
    })
}
