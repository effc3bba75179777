// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};
use understory_overlay::{
    Arbiter, BoolAction, ButtonState, FrameHit, InputSource, InteractionState, OverlayConfig,
    OverlayId, OverlayRegistry, PointerInput, RayHit, Vector2Action,
};
use understory_pointer::{PointerHit, PointerModifier, TrackedDevice};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

#[derive(Clone, Copy)]
struct Hand {
    target: Option<(usize, Point)>,
    click: bool,
    grab: bool,
    scroll: f32,
}

/// Random two-hand script. Buttons flip rarely so holds span several frames.
fn gen_script(frames: usize, overlays: usize) -> Vec<[Hand; 2]> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut hands = [Hand {
        target: None,
        click: false,
        grab: false,
        scroll: 0.0,
    }; 2];
    let mut out = Vec::with_capacity(frames);
    for _ in 0..frames {
        for h in &mut hands {
            if rng.chance(0.05) || h.target.is_none() {
                h.target = rng.chance(0.9).then(|| {
                    let idx = (rng.next_u64() % overlays as u64) as usize;
                    (idx, Point::new(rng.next_f64(), rng.next_f64()))
                });
            } else if let Some((_, uv)) = h.target.as_mut() {
                uv.x = (uv.x + (rng.next_f64() - 0.5) * 0.02).clamp(0.0, 1.0);
                uv.y = (uv.y + (rng.next_f64() - 0.5) * 0.02).clamp(0.0, 1.0);
            }
            if rng.chance(0.1) {
                h.click = !h.click;
            }
            if rng.chance(0.03) {
                h.grab = !h.grab;
            }
            h.scroll = if rng.chance(0.1) {
                (rng.next_f64() * 2.0 - 1.0) as f32
            } else {
                0.0
            };
        }
        out.push(hands);
    }
    out
}

struct Replay<'a> {
    overlays: &'a [OverlayId],
    frame: [Hand; 2],
}

fn hand(device: TrackedDevice) -> usize {
    usize::from(device == TrackedDevice::RightHand)
}

impl InputSource<OverlayId> for Replay<'_> {
    fn intersect(&mut self, device: TrackedDevice) -> Option<RayHit<OverlayId>> {
        let (idx, uv) = self.frame[hand(device)].target?;
        Some(RayHit {
            overlay: self.overlays[idx],
            distance: 1.0,
            uv,
        })
    }

    fn bool_action(&self, action: BoolAction, device: TrackedDevice) -> bool {
        let h = &self.frame[hand(device)];
        match action {
            BoolAction::Click => h.click,
            BoolAction::Grab => h.grab,
            BoolAction::ShowHide => false,
        }
    }

    fn vector2_action(&self, _: Vector2Action, device: TrackedDevice) -> (f32, f32) {
        (0.0, self.frame[hand(device)].scroll)
    }
}

fn build_registry(n: usize) -> (OverlayRegistry<()>, Vec<OverlayId>) {
    let mut reg = OverlayRegistry::new();
    let ids = (0..n)
        .map(|i| {
            reg.insert(
                (),
                OverlayConfig {
                    texture_size: Size::new(1920.0, 1920.0),
                    margin: Vec2::new(0.0, if i % 2 == 0 { 420.0 } else { 0.0 }),
                    ..OverlayConfig::default()
                },
            )
        })
        .collect();
    (reg, ids)
}

fn bench_arbiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("arbiter_two_hands");
    let frames = 1_000;
    for &n in &[1_usize, 4, 16, 64] {
        let script = gen_script(frames, n);
        group.throughput(Throughput::Elements(frames as u64));
        group.bench_function(format!("collect_n{}", n), |b| {
            b.iter_batched(
                || build_registry(n),
                |(mut reg, ids)| {
                    let mut arbiter = Arbiter::default();
                    let mut source = Replay {
                        overlays: &ids,
                        frame: script[0],
                    };
                    let mut total = 0;
                    for frame in &script {
                        source.frame = *frame;
                        total += arbiter.collect(&mut reg, &mut source).len();
                    }
                    black_box(total);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_finalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("interaction_state");
    let hit = |device| PointerHit {
        device,
        overlay: 0_u32,
        distance: 1.0,
        raw_uv: Point::new(0.5, 0.5),
        active_uv: Point::new(0.5, 0.5),
        modifier: PointerModifier::None,
    };
    let pressed = [
        FrameHit {
            hit: hit(TrackedDevice::LeftHand),
            input: PointerInput {
                click: ButtonState::PRESSED,
                ..PointerInput::IDLE
            },
        },
        FrameHit {
            hit: hit(TrackedDevice::RightHand),
            input: PointerInput {
                grab: ButtonState::PRESSED,
                scroll: 0.5,
                ..PointerInput::IDLE
            },
        },
    ];
    let hover = pressed.map(|h| FrameHit {
        input: PointerInput::IDLE,
        ..h
    });
    group.throughput(Throughput::Elements(2));
    group.bench_function("finalize_press_then_hover", |b| {
        let mut out = Vec::with_capacity(16);
        b.iter(|| {
            let mut state = InteractionState::new();
            out.clear();
            state.finalize(black_box(&pressed), &mut out);
            state.finalize(black_box(&hover), &mut out);
            black_box(out.len());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_arbiter, bench_finalize);
criterion_main!(benches);
