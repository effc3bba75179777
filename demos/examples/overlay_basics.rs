// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One hand driving a captured screen and a keyboard.
//!
//! Overlays are a tagged enum of kinds. The screen carries letterbox bands that
//! never react to the pointer. Interactions are collected per frame, printed, then
//! dispatched.
//!
//! Run:
//! - `cargo run -p understory_demos --example overlay_basics`
//! - `RUST_LOG=understory_overlay=trace cargo run -p understory_demos --example overlay_basics`

use kurbo::{Point, Size, Vec2};
use tracing_subscriber::EnvFilter;
use understory_overlay::{
    Arbiter, BoolAction, InputSource, OverlayConfig, OverlayId, OverlayRegistry, OverlaySurface,
    RayHit, Vector2Action,
};
use understory_pointer::{PointerHit, PointerModifier, TrackedDevice};

/// Mouse button a screen click maps to.
fn button(modifier: PointerModifier) -> &'static str {
    match modifier {
        PointerModifier::None => "left",
        PointerModifier::RightClick => "right",
        PointerModifier::MiddleClick => "middle",
        PointerModifier::Neutral => "none",
    }
}

#[derive(Debug)]
enum Overlay {
    Screen { cursor: Point, buttons_down: u32 },
    Keyboard { typed: String },
}

impl OverlaySurface<OverlayId> for Overlay {
    fn on_move(&mut self, hit: &PointerHit<OverlayId>, primary: bool) -> bool {
        match self {
            Self::Screen { cursor, .. } if primary => {
                *cursor = hit.active_uv;
                true
            }
            _ => false,
        }
    }

    fn on_left(&mut self, device: TrackedDevice, was_primary: bool) -> bool {
        println!("  {device:?} left (primary: {was_primary})");
        true
    }

    fn on_pressed(&mut self, hit: &PointerHit<OverlayId>) -> bool {
        match self {
            Self::Screen { buttons_down, .. } => {
                *buttons_down += 1;
                println!("  screen: {} button down", button(hit.modifier));
            }
            Self::Keyboard { typed } => {
                // Four keys per row, one row.
                let key = (hit.active_uv.x * 4.0).floor().clamp(0.0, 3.0) as u8;
                typed.push(char::from(b'a' + key));
                println!("  keyboard: typed {typed:?}");
            }
        }
        true
    }

    fn on_released(&mut self, hit: &PointerHit<OverlayId>) -> bool {
        if let Self::Screen { buttons_down, .. } = self {
            *buttons_down = buttons_down.saturating_sub(1);
            println!("  screen: {} button up", button(hit.modifier));
        }
        true
    }

    fn on_grabbed(&mut self, _: &PointerHit<OverlayId>) -> bool {
        false
    }

    fn on_dropped(&mut self, _: &PointerHit<OverlayId>) -> bool {
        false
    }

    fn on_scroll(&mut self, _: &PointerHit<OverlayId>, value: f32) -> bool {
        println!("  scroll {value:+.2}");
        matches!(self, Self::Screen { .. })
    }
}

/// Right hand only; every frame of the script names a target, a trigger level and a scroll.
struct Script {
    frame: (Option<RayHit<OverlayId>>, bool, f32),
}

impl InputSource<OverlayId> for Script {
    fn intersect(&mut self, device: TrackedDevice) -> Option<RayHit<OverlayId>> {
        (device == TrackedDevice::RightHand).then_some(self.frame.0).flatten()
    }

    fn bool_action(&self, action: BoolAction, device: TrackedDevice) -> bool {
        action == BoolAction::Click && device == TrackedDevice::RightHand && self.frame.1
    }

    fn vector2_action(&self, _: Vector2Action, device: TrackedDevice) -> (f32, f32) {
        if device == TrackedDevice::RightHand {
            (0.0, self.frame.2)
        } else {
            (0.0, 0.0)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry = OverlayRegistry::new();
    let screen = registry.insert(
        Overlay::Screen {
            cursor: Point::ZERO,
            buttons_down: 0,
        },
        OverlayConfig {
            // 1920x1080 capture letterboxed into a square texture.
            texture_size: Size::new(1920.0, 1920.0),
            margin: Vec2::new(0.0, 420.0),
            ..OverlayConfig::default()
        },
    );
    let keyboard = registry.insert(
        Overlay::Keyboard {
            typed: String::new(),
        },
        OverlayConfig::default(),
    );

    let ray = |overlay, x, y| {
        Some(RayHit {
            overlay,
            distance: 0.7,
            uv: Point::new(x, y),
        })
    };
    let script = [
        ("hover the screen", ray(screen, 0.5, 0.5), false, 0.0),
        ("click", ray(screen, 0.5, 0.5), true, 0.0),
        ("drag while held", ray(screen, 0.6, 0.55), true, 0.0),
        ("release and scroll", ray(screen, 0.6, 0.55), false, -0.8),
        ("into the letterbox band", ray(screen, 0.6, 0.1), false, 0.0),
        ("keyboard, key b", ray(keyboard, 0.3, 0.5), true, 0.0),
        ("keep holding", ray(keyboard, 0.3, 0.5), true, 0.0),
        ("key d", ray(keyboard, 0.9, 0.5), false, 0.0),
        ("", ray(keyboard, 0.9, 0.5), true, 0.0),
        ("point away", None, false, 0.0),
    ];

    let mut arbiter = Arbiter::default();
    let mut input = Script {
        frame: (None, false, 0.0),
    };
    for (n, (label, target, trigger, scroll)) in script.into_iter().enumerate() {
        println!("frame {n}: {label}");
        input.frame = (target, trigger, scroll);
        let frame = arbiter.collect(&mut registry, &mut input);
        for cmd in &frame {
            println!("  -> {cmd:?}");
        }
        registry.dispatch(&frame);
        if let Some(p) = arbiter.pointer(TrackedDevice::RightHand) {
            println!("  laser {:.2} m", p.laser_length());
        }
    }

    for (id, overlay) in registry.iter() {
        println!("{id:?}: {overlay:?}");
    }
}
