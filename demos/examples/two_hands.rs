// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two hands contending for a grabbable window.
//!
//! Overlays are boxed trait objects. The left hand grabs the window, the right hand
//! takes the grab over, then the show/hide binding hides everything and the held grab
//! winds down through the leave path. Finally the window is removed while still
//! pointed at, which the next frame tolerates.
//!
//! Run:
//! - `cargo run -p understory_demos --example two_hands`
//! - `RUST_LOG=debug cargo run -p understory_demos --example two_hands`

use kurbo::{Point, Vec2};
use tracing_subscriber::EnvFilter;
use understory_overlay::{
    Arbiter, BoolAction, InputSource, OverlayConfig, OverlayFlags, OverlayId, OverlayRegistry,
    OverlaySurface, RayHit, Vector2Action,
};
use understory_pointer::{PointerHit, PointerModifier, TrackedDevice};

type Surface = Box<dyn OverlaySurface<OverlayId>>;

/// Window that follows whichever hand grabs it.
struct Window {
    name: &'static str,
    held_by: Option<TrackedDevice>,
    anchor: Point,
}

impl OverlaySurface<OverlayId> for Window {
    fn on_move(&mut self, hit: &PointerHit<OverlayId>, primary: bool) -> bool {
        if self.held_by == Some(hit.device) {
            self.anchor = hit.raw_uv;
        }
        primary
    }

    fn on_left(&mut self, device: TrackedDevice, was_primary: bool) -> bool {
        println!("  {}: {device:?} left (primary: {was_primary})", self.name);
        true
    }

    fn on_pressed(&mut self, _: &PointerHit<OverlayId>) -> bool {
        false
    }

    fn on_released(&mut self, _: &PointerHit<OverlayId>) -> bool {
        false
    }

    fn on_grabbed(&mut self, hit: &PointerHit<OverlayId>) -> bool {
        println!("  {}: grabbed by {:?} at {:.2} m", self.name, hit.device, hit.distance);
        self.held_by = Some(hit.device);
        true
    }

    fn on_dropped(&mut self, hit: &PointerHit<OverlayId>) -> bool {
        println!(
            "  {}: dropped by {:?}, anchored at {:.2}",
            self.name, hit.device, self.anchor.x
        );
        if self.held_by == Some(hit.device) {
            self.held_by = None;
        }
        true
    }

    fn on_scroll(&mut self, _: &PointerHit<OverlayId>, _: f32) -> bool {
        false
    }
}

/// Wrist watch that only counts taps.
struct Watch {
    taps: u32,
}

impl OverlaySurface<OverlayId> for Watch {
    fn on_move(&mut self, _: &PointerHit<OverlayId>, _: bool) -> bool {
        false
    }

    fn on_left(&mut self, _: TrackedDevice, _: bool) -> bool {
        false
    }

    fn on_pressed(&mut self, _: &PointerHit<OverlayId>) -> bool {
        self.taps += 1;
        println!("  watch: tap {}", self.taps);
        true
    }

    fn on_released(&mut self, _: &PointerHit<OverlayId>) -> bool {
        true
    }

    fn on_grabbed(&mut self, _: &PointerHit<OverlayId>) -> bool {
        false
    }

    fn on_dropped(&mut self, _: &PointerHit<OverlayId>) -> bool {
        false
    }

    fn on_scroll(&mut self, _: &PointerHit<OverlayId>, _: f32) -> bool {
        false
    }
}

#[derive(Clone, Copy, Default)]
struct Hand {
    target: Option<(OverlayId, f64)>,
    click: bool,
    grab: bool,
    facing: f32,
}

#[derive(Default)]
struct Hands {
    left: Hand,
    right: Hand,
    show_hide: bool,
}

impl Hands {
    fn get(&self, device: TrackedDevice) -> Option<&Hand> {
        match device {
            TrackedDevice::LeftHand => Some(&self.left),
            TrackedDevice::RightHand => Some(&self.right),
            _ => None,
        }
    }
}

impl InputSource<OverlayId> for Hands {
    fn intersect(&mut self, device: TrackedDevice) -> Option<RayHit<OverlayId>> {
        let (overlay, x) = self.get(device)?.target?;
        Some(RayHit {
            overlay,
            distance: 0.5 + x as f32,
            uv: Point::new(x, 0.5),
        })
    }

    fn bool_action(&self, action: BoolAction, device: TrackedDevice) -> bool {
        let Some(hand) = self.get(device) else {
            return false;
        };
        match action {
            BoolAction::Click => hand.click,
            BoolAction::Grab => hand.grab,
            BoolAction::ShowHide => self.show_hide && device == TrackedDevice::LeftHand,
        }
    }

    fn vector2_action(&self, _: Vector2Action, _: TrackedDevice) -> (f32, f32) {
        (0.0, 0.0)
    }

    fn modifier(&self, device: TrackedDevice) -> PointerModifier {
        self.get(device)
            .map_or(PointerModifier::None, |h| PointerModifier::from_facing(h.facing))
    }
}

fn report(arbiter: &Arbiter) {
    for device in arbiter.devices() {
        match arbiter.pointer(device) {
            Some(p) => println!(
                "  laser {device:?}: {:?} {:.2} m {:?}{}",
                p.overlay,
                p.laser_length(),
                p.modifier,
                if p.primary { " (primary)" } else { "" }
            ),
            None => println!("  laser {device:?}: idle"),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry: OverlayRegistry<Surface> = OverlayRegistry::new();
    let window = registry.insert(
        Box::new(Window {
            name: "window",
            held_by: None,
            anchor: Point::ZERO,
        }),
        OverlayConfig {
            margin: Vec2::new(0.02, 0.02),
            ..OverlayConfig::default()
        },
    );
    let watch = registry.insert(
        Box::new(Watch { taps: 0 }),
        OverlayConfig {
            // The watch stays when everything else is hidden.
            flags: OverlayFlags::VISIBLE | OverlayFlags::INTERACTIVE,
            ..OverlayConfig::default()
        },
    );

    let mut arbiter = Arbiter::default();
    let mut hands = Hands::default();
    let mut step = |label: &str, hands: &mut Hands, registry: &mut OverlayRegistry<Surface>| {
        println!("{label}");
        let frame = arbiter.run_frame(registry, hands);
        println!("  {} interactions, shown: {}", frame.len(), registry.is_shown());
        report(&arbiter);
    };

    hands.left.target = Some((window, 0.3));
    hands.right.target = Some((window, 0.7));
    hands.right.facing = -0.9;
    step("both hands hover the window", &mut hands, &mut registry);

    hands.left.grab = true;
    step("left hand grabs", &mut hands, &mut registry);

    hands.left.target = Some((window, 0.35));
    step("left hand drags", &mut hands, &mut registry);

    hands.right.grab = true;
    step("right hand takes the grab over", &mut hands, &mut registry);

    hands.left.target = Some((watch, 0.5));
    hands.left.grab = false;
    hands.left.click = true;
    step("left hand taps the watch", &mut hands, &mut registry);

    hands.show_hide = true;
    step("show/hide pressed", &mut hands, &mut registry);

    hands.show_hide = false;
    step("hidden window releases the right hand's grab", &mut hands, &mut registry);

    hands.show_hide = true;
    step("show/hide pressed again", &mut hands, &mut registry);

    registry.remove(window);
    step("window removed while pointed at", &mut hands, &mut registry);

    tracing::info!(overlays = registry.len(), "tearing down");
    registry.clear();
}
