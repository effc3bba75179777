// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the arbitration pass over random two-hand input scripts.
//!
//! 1. Determinism: the same script yields the same interactions every run.
//! 2. No double dispatch: per frame and device, at most one click transition and at most
//!    one grab transition, across all overlays.
//! 3. Exactly one move per device with a live hit, none for the others.
//! 4. Primary and secondary never name the same device.
//! 5. Releases precede presses on the same overlay, leaves precede callbacks elsewhere.
//! 6. A move is flagged primary exactly when its device is the overlay's primary pointer.

use kurbo::{Point, Size, Vec2};
use proptest::prelude::*;
use understory_overlay::{
    Arbiter, BoolAction, InputSource, Interaction, OverlayConfig, OverlayId, OverlayRegistry,
    RayHit, Vector2Action,
};
use understory_pointer::TrackedDevice;

// ── Strategies ──────────────────────────────────────────────────────────

/// One hand's input for one frame.
#[derive(Debug, Clone, Copy)]
struct HandInput {
    /// Overlay index and raw UV, or pointing at nothing.
    target: Option<(usize, f64, f64)>,
    click: bool,
    grab: bool,
    scroll: f32,
}

type Frame = [HandInput; 2];

fn hand_strategy() -> impl Strategy<Value = HandInput> {
    (
        prop::option::weighted(0.8, (0usize..3, 0.0f64..=1.0, 0.0f64..=1.0)),
        any::<bool>(),
        prop::bool::weighted(0.3),
        prop_oneof![3 => Just(0.0f32), 1 => -1.0f32..=1.0],
    )
        .prop_map(|(target, click, grab, scroll)| HandInput {
            target,
            click,
            grab,
            scroll,
        })
}

fn script_strategy() -> impl Strategy<Value = Vec<Frame>> {
    prop::collection::vec([hand_strategy(), hand_strategy()], 1..40)
}

// ── Harness ─────────────────────────────────────────────────────────────

struct Scripted {
    overlays: Vec<OverlayId>,
    frame: Frame,
}

fn hand(device: TrackedDevice) -> usize {
    usize::from(device == TrackedDevice::RightHand)
}

impl InputSource<OverlayId> for Scripted {
    fn intersect(&mut self, device: TrackedDevice) -> Option<RayHit<OverlayId>> {
        let (idx, u, v) = self.frame[hand(device)].target?;
        Some(RayHit {
            overlay: self.overlays[idx],
            distance: 1.0,
            uv: Point::new(u, v),
        })
    }

    fn bool_action(&self, action: BoolAction, device: TrackedDevice) -> bool {
        let input = &self.frame[hand(device)];
        match action {
            BoolAction::Click => input.click,
            BoolAction::Grab => input.grab,
            BoolAction::ShowHide => false,
        }
    }

    fn vector2_action(&self, _: Vector2Action, device: TrackedDevice) -> (f32, f32) {
        (0.0, self.frame[hand(device)].scroll)
    }
}

struct Run {
    frames: Vec<Vec<Interaction<OverlayId>>>,
    owners: Vec<[Option<OverlayId>; 2]>,
    primaries: Vec<[Option<bool>; 2]>,
    violations: Vec<String>,
}

/// Run a script against three overlays: two with a dead-zone border, one removed halfway.
fn run(script: &[Frame]) -> Run {
    let mut registry = OverlayRegistry::new();
    let bordered = OverlayConfig {
        texture_size: Size::new(800.0, 600.0),
        margin: Vec2::new(80.0, 60.0),
        ..OverlayConfig::default()
    };
    let overlays = vec![
        registry.insert((), bordered),
        registry.insert((), bordered),
        registry.insert((), OverlayConfig::default()),
    ];
    let mut arbiter = Arbiter::default();
    let mut source = Scripted {
        overlays: overlays.clone(),
        frame: script[0],
    };
    let mut out = Run {
        frames: Vec::new(),
        owners: Vec::new(),
        primaries: Vec::new(),
        violations: Vec::new(),
    };
    for (n, frame) in script.iter().enumerate() {
        if n == script.len() / 2 {
            registry.remove(overlays[2]);
        }
        source.frame = *frame;
        out.frames.push(arbiter.collect(&mut registry, &mut source));
        out.owners.push(TrackedDevice::HANDS.map(|d| arbiter.owner(d)));
        out.primaries
            .push(TrackedDevice::HANDS.map(|d| arbiter.pointer(d).map(|p| p.primary)));
        for &id in &overlays {
            if let Some(state) = registry.state(id) {
                if let (Some(p), Some(s)) = (state.primary(), state.secondary()) {
                    if p.device == s.device {
                        out.violations
                            .push(format!("frame {n}: {id:?} primary == secondary"));
                    }
                }
            }
        }
    }
    out
}

fn is_click(cmd: &Interaction<OverlayId>) -> bool {
    matches!(cmd, Interaction::Pressed(_) | Interaction::Released(_))
}

fn is_grab(cmd: &Interaction<OverlayId>) -> bool {
    matches!(cmd, Interaction::Grabbed(_) | Interaction::Dropped(_))
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Determinism
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_script_same_interactions(script in script_strategy()) {
        let a = run(&script);
        let b = run(&script);
        prop_assert_eq!(a.frames, b.frames, "interactions must be reproducible");
        prop_assert_eq!(a.owners, b.owners, "owners must be reproducible");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2-5. Per-frame invariants
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn at_most_one_transition_per_device(script in script_strategy()) {
        let r = run(&script);
        for (n, frame) in r.frames.iter().enumerate() {
            for cmd in frame {
                let same = |c: &&Interaction<OverlayId>| c.device() == cmd.device();
                let clicks = frame.iter().filter(same).filter(|c| is_click(c)).count();
                let grabs = frame.iter().filter(same).filter(|c| is_grab(c)).count();
                prop_assert!(clicks <= 1, "frame {}: {} click transitions in {:?}", n, clicks, frame);
                prop_assert!(grabs <= 1, "frame {}: {} grab transitions in {:?}", n, grabs, frame);
            }
        }
    }

    #[test]
    fn one_move_per_live_device(script in script_strategy()) {
        let r = run(&script);
        for (n, (frame, owners)) in r.frames.iter().zip(&r.owners).enumerate() {
            for (device, owner) in TrackedDevice::HANDS.iter().zip(owners) {
                let moves: Vec<_> = frame
                    .iter()
                    .filter(|c| matches!(c, Interaction::Move { .. }) && c.device() == *device)
                    .collect();
                match owner {
                    Some(id) => {
                        prop_assert_eq!(moves.len(), 1, "frame {}: {:?} moves {:?}", n, device, frame);
                        prop_assert_eq!(moves[0].overlay(), *id, "move lands on the owner");
                    }
                    None => prop_assert!(moves.is_empty(), "frame {}: {:?} has no hit", n, device),
                }
            }
        }
    }

    #[test]
    fn primary_flag_matches_pointer_state(script in script_strategy()) {
        let r = run(&script);
        for (n, (frame, primaries)) in r.frames.iter().zip(&r.primaries).enumerate() {
            for cmd in frame {
                let Interaction::Move { hit, primary } = cmd else { continue };
                let expected = primaries[usize::from(hit.device == TrackedDevice::RightHand)];
                prop_assert_eq!(
                    Some(*primary),
                    expected,
                    "frame {}: {:?} flagged {} in {:?}",
                    n,
                    hit.device,
                    primary,
                    frame
                );
            }
            let mut flagged: Vec<_> = frame
                .iter()
                .filter(|c| matches!(c, Interaction::Move { primary: true, .. }))
                .map(|c| c.overlay())
                .collect();
            let total = flagged.len();
            flagged.sort_unstable();
            flagged.dedup();
            prop_assert_eq!(flagged.len(), total, "frame {}: two primaries on one overlay", n);
        }
    }

    #[test]
    fn primary_and_secondary_differ(script in script_strategy()) {
        let r = run(&script);
        prop_assert!(r.violations.is_empty(), "{:?}", r.violations);
    }

    #[test]
    fn releases_and_leaves_come_first(script in script_strategy()) {
        let r = run(&script);
        for (n, frame) in r.frames.iter().enumerate() {
            for (i, cmd) in frame.iter().enumerate() {
                match cmd {
                    Interaction::Pressed(hit) => {
                        let late_release = frame[i..].iter().any(|c| {
                            matches!(c, Interaction::Released(_)) && c.overlay() == hit.overlay
                        });
                        prop_assert!(!late_release, "frame {}: release after press in {:?}", n, frame);
                    }
                    Interaction::Left { overlay, device, .. } => {
                        let earlier_elsewhere = frame[..i]
                            .iter()
                            .any(|c| c.device() == *device && c.overlay() != *overlay);
                        prop_assert!(!earlier_elsewhere, "frame {}: leave not first in {:?}", n, frame);
                    }
                    _ => {}
                }
            }
        }
    }
}
