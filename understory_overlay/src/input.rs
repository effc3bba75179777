// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input-source seam: ray tests, action bindings, and per-frame button snapshots.
//!
//! ## Overview
//!
//! The arbitration pass never talks to a tracking runtime directly. Once per frame it asks
//! an [`InputSource`] which overlay each device's ray strikes, and samples the bound actions
//! for every device. Button levels are turned into [`ButtonState`] edges by comparing with
//! the previous frame.

use kurbo::Point;
use understory_pointer::{PointerModifier, TrackedDevice};

/// Scroll magnitudes at or below this value on the normalized axis are ignored.
pub const SCROLL_THRESHOLD: f32 = 0.1;

/// Boolean actions consumed by the engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BoolAction {
    /// Primary interaction (mouse-like button).
    Click,
    /// Pick up and move an overlay.
    Grab,
    /// Toggle the visibility of overlays bound to the show/hide action.
    ShowHide,
}

impl BoolAction {
    /// Binding name of the action.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "Click",
            Self::Grab => "Grab",
            Self::ShowHide => "ShowHide",
        }
    }
}

/// Two-axis analog actions consumed by the engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Vector2Action {
    /// Scroll wheel or thumbstick; only the y axis is consulted.
    Scroll,
}

impl Vector2Action {
    /// Binding name of the action.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scroll => "Scroll",
        }
    }
}

/// Result of a device's nearest-hit ray test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit<K> {
    /// Struck overlay.
    pub overlay: K,
    /// Ray distance to the hit point.
    pub distance: f32,
    /// Raw texture coordinates of the hit on the overlay surface.
    pub uv: Point,
}

/// Per-frame source of poses, intersections and action values.
///
/// Implemented by the hosting application on top of its tracking runtime.
pub trait InputSource<K> {
    /// Nearest overlay struck by `device`'s ray this frame, if any.
    ///
    /// When overlays stack, only the nearest hit is returned; the engine does not re-sort.
    fn intersect(&mut self, device: TrackedDevice) -> Option<RayHit<K>>;

    /// Current level of a boolean action for `device`.
    fn bool_action(&self, action: BoolAction, device: TrackedDevice) -> bool;

    /// Current value of a two-axis action for `device`.
    fn vector2_action(&self, action: Vector2Action, device: TrackedDevice) -> (f32, f32);

    /// Hand posture of `device` this frame.
    fn modifier(&self, _device: TrackedDevice) -> PointerModifier {
        PointerModifier::None
    }
}

impl<K, T: InputSource<K> + ?Sized> InputSource<K> for &mut T {
    fn intersect(&mut self, device: TrackedDevice) -> Option<RayHit<K>> {
        (**self).intersect(device)
    }

    fn bool_action(&self, action: BoolAction, device: TrackedDevice) -> bool {
        (**self).bool_action(action, device)
    }

    fn vector2_action(&self, action: Vector2Action, device: TrackedDevice) -> (f32, f32) {
        (**self).vector2_action(action, device)
    }

    fn modifier(&self, device: TrackedDevice) -> PointerModifier {
        (**self).modifier(device)
    }
}

/// Level of a boolean action this frame together with its level on the previous frame.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ButtonState {
    /// Level this frame.
    pub down: bool,
    /// Level on the previous frame.
    pub was_down: bool,
}

impl ButtonState {
    /// A button that is held and was already held.
    pub const HELD: Self = Self {
        down: true,
        was_down: true,
    };

    /// A button pressed this frame.
    pub const PRESSED: Self = Self {
        down: true,
        was_down: false,
    };

    /// A button released this frame.
    pub const RELEASED: Self = Self {
        down: false,
        was_down: true,
    };

    /// A button that stays up.
    pub const UP: Self = Self {
        down: false,
        was_down: false,
    };

    /// Advance to a new level, keeping the current one as history.
    pub fn advance(self, down: bool) -> Self {
        Self {
            down,
            was_down: self.down,
        }
    }

    /// False→true transition this frame.
    pub fn pressed(self) -> bool {
        self.down && !self.was_down
    }

    /// True→false transition this frame.
    pub fn released(self) -> bool {
        !self.down && self.was_down
    }
}

/// Snapshot of one device's actions for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Click action.
    pub click: ButtonState,
    /// Grab action.
    pub grab: ButtonState,
    /// Scroll value on the normalized y axis.
    pub scroll: f32,
}

impl PointerInput {
    /// Input with no action active.
    pub const IDLE: Self = Self {
        click: ButtonState::UP,
        grab: ButtonState::UP,
        scroll: 0.0,
    };

    /// Scroll value when its magnitude exceeds [`SCROLL_THRESHOLD`].
    pub fn qualifying_scroll(&self) -> Option<f32> {
        (self.scroll > SCROLL_THRESHOLD || self.scroll < -SCROLL_THRESHOLD).then_some(self.scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_history() {
        let b = ButtonState::default();
        assert!(!b.pressed() && !b.released());
        let b = b.advance(true);
        assert_eq!(b, ButtonState::PRESSED);
        assert!(b.pressed());
        let b = b.advance(true);
        assert_eq!(b, ButtonState::HELD);
        assert!(!b.pressed() && !b.released());
        let b = b.advance(false);
        assert_eq!(b, ButtonState::RELEASED);
        assert!(b.released());
        assert_eq!(b.advance(false), ButtonState::UP);
    }

    #[test]
    fn scroll_threshold_is_exclusive() {
        let mut input = PointerInput::IDLE;
        input.scroll = 0.1;
        assert_eq!(input.qualifying_scroll(), None);
        input.scroll = -0.1;
        assert_eq!(input.qualifying_scroll(), None);
        input.scroll = 0.11;
        assert_eq!(input.qualifying_scroll(), Some(0.11));
        input.scroll = -0.5;
        assert_eq!(input.qualifying_scroll(), Some(-0.5));
    }

    #[test]
    fn binding_names() {
        assert_eq!(BoolAction::Click.name(), "Click");
        assert_eq!(BoolAction::Grab.name(), "Grab");
        assert_eq!(BoolAction::ShowHide.name(), "ShowHide");
        assert_eq!(Vector2Action::Scroll.name(), "Scroll");
    }
}
