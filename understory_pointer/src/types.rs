// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core pointer types: device identities, hand postures, and per-frame hits.

use kurbo::Point;

/// Identity of a tracked pointing source.
///
/// Stable for the lifetime of the process and used as the key for all per-device state.
/// The ordering is the dispatch order: when several devices hit the same overlay in one
/// frame, they are processed in ascending `TrackedDevice` order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TrackedDevice {
    /// Head-mounted display.
    Hmd,
    /// Left hand controller.
    LeftHand,
    /// Right hand controller.
    RightHand,
    /// Any additional tracker, numbered from zero.
    Tracker(u8),
}

impl TrackedDevice {
    /// The two hand controllers, in dispatch order.
    pub const HANDS: [Self; 2] = [Self::LeftHand, Self::RightHand];
}

/// Absolute value of the facing dot product above which a posture is recognized.
pub const MODIFIER_FACING_THRESHOLD: f32 = 0.7;

/// Hand posture (or role) attached to a pointer, decided by the input source.
///
/// Surfaces typically map this to a mouse button: `None` acts as a left click.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PointerModifier {
    /// No posture: the primary button.
    #[default]
    None,
    /// Palm turned towards the face.
    RightClick,
    /// Back of the hand turned towards the face.
    MiddleClick,
    /// The posture could not be determined; carries no button role.
    Neutral,
}

impl PointerModifier {
    /// Classify a hand posture from the dot product between the pointer's up vector and
    /// the direction from the pointer to the eye.
    ///
    /// ```
    /// use understory_pointer::PointerModifier;
    /// assert_eq!(PointerModifier::from_facing(0.9), PointerModifier::MiddleClick);
    /// assert_eq!(PointerModifier::from_facing(-0.9), PointerModifier::RightClick);
    /// assert_eq!(PointerModifier::from_facing(0.1), PointerModifier::None);
    /// ```
    pub fn from_facing(dot: f32) -> Self {
        if !dot.is_finite() {
            Self::Neutral
        } else if dot > MODIFIER_FACING_THRESHOLD {
            Self::MiddleClick
        } else if dot < -MODIFIER_FACING_THRESHOLD {
            Self::RightClick
        } else {
            Self::None
        }
    }
}

/// One device's intersection with one overlay during a single frame.
///
/// A `PointerHit` is a value snapshot. State that must survive across frames (a held click
/// or grab, the primary pointer) is kept in long-lived records that are refreshed with
/// [`PointerHit::update_from`], never by holding on to a previous frame's hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerHit<K> {
    /// Device that produced the hit.
    pub device: TrackedDevice,
    /// Overlay that was struck.
    pub overlay: K,
    /// Ray distance to the hit point; never negative.
    pub distance: f32,
    /// Texture coordinates of the hit on the full overlay surface, in `[0, 1]²`.
    pub raw_uv: Point,
    /// `raw_uv` remapped to the active area. Outside `[0, 1]²` means the hit was dead.
    pub active_uv: Point,
    /// Hand posture at the time of the hit.
    pub modifier: PointerModifier,
}

impl<K: Copy> PointerHit<K> {
    /// Copy the geometry and posture of `other` into `self`, keeping `self.device` and
    /// `self.overlay`.
    pub fn update_from(&mut self, other: &Self) {
        self.distance = other.distance;
        self.raw_uv = other.raw_uv;
        self.active_uv = other.active_uv;
        self.modifier = other.modifier;
    }

    /// Returns true when `active_uv` lies inside the active area.
    pub fn is_live(&self) -> bool {
        (0.0..=1.0).contains(&self.active_uv.x) && (0.0..=1.0).contains(&self.active_uv.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(device: TrackedDevice, distance: f32, uv: (f64, f64)) -> PointerHit<u32> {
        PointerHit {
            device,
            overlay: 1,
            distance,
            raw_uv: Point::new(uv.0, uv.1),
            active_uv: Point::new(uv.0, uv.1),
            modifier: PointerModifier::None,
        }
    }

    #[test]
    fn update_from_keeps_device_identity() {
        let mut held = hit(TrackedDevice::LeftHand, 1.0, (0.2, 0.2));
        let mut other = hit(TrackedDevice::RightHand, 2.5, (0.7, 0.4));
        other.overlay = 9;
        other.modifier = PointerModifier::RightClick;

        held.update_from(&other);
        assert_eq!(held.device, TrackedDevice::LeftHand);
        assert_eq!(held.overlay, 1);
        assert_eq!(held.distance, 2.5);
        assert_eq!(held.raw_uv, Point::new(0.7, 0.4));
        assert_eq!(held.active_uv, Point::new(0.7, 0.4));
        assert_eq!(held.modifier, PointerModifier::RightClick);
    }

    #[test]
    fn liveness_follows_active_uv() {
        let mut h = hit(TrackedDevice::LeftHand, 1.0, (0.5, 0.5));
        assert!(h.is_live());
        h.active_uv = Point::new(-0.01, 0.5);
        assert!(!h.is_live());
        h.active_uv = Point::new(0.5, 1.01);
        assert!(!h.is_live());
        h.active_uv = Point::new(f64::NAN, 0.5);
        assert!(!h.is_live());
    }

    #[test]
    fn device_order_is_dispatch_order() {
        assert!(TrackedDevice::Hmd < TrackedDevice::LeftHand);
        assert!(TrackedDevice::LeftHand < TrackedDevice::RightHand);
        assert!(TrackedDevice::RightHand < TrackedDevice::Tracker(0));
        assert!(TrackedDevice::Tracker(0) < TrackedDevice::Tracker(1));
        assert!(TrackedDevice::HANDS.is_sorted(), "hands listed in dispatch order");
    }

    #[test]
    fn facing_thresholds_are_exclusive() {
        assert_eq!(PointerModifier::from_facing(0.7), PointerModifier::None);
        assert_eq!(PointerModifier::from_facing(-0.7), PointerModifier::None);
        assert_eq!(
            PointerModifier::from_facing(f32::NAN),
            PointerModifier::Neutral
        );
    }
}
