//! Per-frame integration step and the blast transition
//!
//! One discrete step per animation frame; the active branch is chosen by a
//! read of [`Mode`] at the top of the step. Semi-implicit Euler, no
//! sub-stepping.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Mode, SceneState};
use crate::clamp_abs;
use crate::consts::MIN_REPEL_DIST;
use crate::tuning::{BlastFeel, Feel, RepelFeel};

/// Screen-space geometry seam: a block's current on-screen center in client
/// coordinates. The browser scene implements this with live SVG transforms;
/// tests and headless runs substitute fixed points.
pub trait CenterSource {
    fn center_of(&self, index: usize) -> Vec2;
}

/// Fixed block centers for tests and headless runs
pub struct FixedCenters(pub Vec<Vec2>);

impl CenterSource for FixedCenters {
    fn center_of(&self, index: usize) -> Vec2 {
        self.0.get(index).copied().unwrap_or(Vec2::ZERO)
    }
}

/// Advance every body by one frame under the active mode's force law
pub fn step(state: &mut SceneState, feel: &Feel, centers: &dyn CenterSource) {
    state.frames += 1;
    match state.mode {
        Mode::Repel => repel_step(state, &feel.repel, centers),
        Mode::Blast => blast_step(state, &feel.blast),
    }
}

/// Hover phase: cursor repulsion, spring return, damping, hard clamp
fn repel_step(state: &mut SceneState, feel: &RepelFeel, centers: &dyn CenterSource) {
    let cursor = state.cursor;
    for (i, body) in state.bodies.iter_mut().enumerate() {
        if cursor.active {
            let delta = centers.center_of(i) - cursor.pos;
            let d = delta.length();
            if d > MIN_REPEL_DIST && d < feel.radius {
                let f = (1.0 - d / feel.radius) * feel.strength;
                body.vel += delta / d * f;
            }
        }

        // spring + damping pull back toward the rest offset while hovering
        body.vel += -body.pos * feel.spring;
        body.vel *= feel.damp;

        body.pos += body.vel;
        // positional clamp only: velocity survives, so a pinned body keeps
        // re-clamping (soft wall)
        body.pos.x = clamp_abs(body.pos.x, feel.max_offset);
        body.pos.y = clamp_abs(body.pos.y, feel.max_offset);
    }
}

/// Fall phase: gravity + anisotropic drag, no floor, no bounce
fn blast_step(state: &mut SceneState, feel: &BlastFeel) {
    for body in &mut state.bodies {
        body.vel.y += feel.gravity;
        body.vel.x *= feel.drag_x;
        body.vel.y *= feel.drag_y;
        body.pos += body.vel;
    }
}

/// The Repel -> Blast transition: flips the mode and imparts an outward
/// impulse from the click point to every body. Returns false (leaving all
/// state untouched) if the mode has already transitioned.
pub fn trigger_blast(
    state: &mut SceneState,
    feel: &BlastFeel,
    click: Vec2,
    centers: &dyn CenterSource,
    rng: &mut Pcg32,
) -> bool {
    if state.mode == Mode::Blast {
        return false;
    }
    state.mode = Mode::Blast;

    for (i, body) in state.bodies.iter_mut().enumerate() {
        let delta = centers.center_of(i) - click;
        // unit direction, divisor falling back to 1 when the click sits
        // exactly on the block center (zero direction, kick still applies)
        let d = delta.length();
        let unit = delta / if d > 0.0 { d } else { 1.0 };

        let k = feel.impulse + rng.random::<f32>() * feel.impulse_random;
        body.vel.x += unit.x * k + (rng.random::<f32>() - 0.5) * feel.jitter_x;
        body.vel.y += unit.y * k - feel.up_kick + (rng.random::<f32>() - 0.5) * feel.jitter_y;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BlockBody, Cursor};

    fn centers_at(points: &[(f32, f32)]) -> FixedCenters {
        FixedCenters(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    #[test]
    fn no_repulsion_at_or_beyond_radius() {
        let feel = Feel::default();
        let mut state = SceneState::new(1, 1);
        state.cursor = Cursor {
            pos: Vec2::ZERO,
            active: true,
        };
        // block center exactly at the influence radius
        let centers = centers_at(&[(feel.repel.radius, 0.0)]);
        step(&mut state, &feel, &centers);
        assert_eq!(state.bodies[0].vel, Vec2::ZERO);
        assert_eq!(state.bodies[0].pos, Vec2::ZERO);
    }

    #[test]
    fn repulsion_pushes_away_from_cursor() {
        let feel = Feel::default();
        let mut state = SceneState::new(1, 1);
        state.cursor = Cursor {
            pos: Vec2::ZERO,
            active: true,
        };
        let centers = centers_at(&[(50.0, 0.0)]);
        step(&mut state, &feel, &centers);
        assert!(state.bodies[0].vel.x > 0.0);
        assert_eq!(state.bodies[0].vel.y, 0.0);
        assert!(state.bodies[0].pos.x > 0.0);
    }

    #[test]
    fn cursor_on_block_center_is_skipped() {
        let feel = Feel::default();
        let mut state = SceneState::new(1, 1);
        state.cursor = Cursor {
            pos: Vec2::new(120.0, 80.0),
            active: true,
        };
        let centers = centers_at(&[(120.0, 80.0)]);
        step(&mut state, &feel, &centers);
        assert_eq!(state.bodies[0].vel, Vec2::ZERO);
    }

    #[test]
    fn inactive_cursor_leaves_resting_bodies_alone() {
        let feel = Feel::default();
        let mut state = SceneState::new(3, 1);
        let centers = centers_at(&[(0.0, 0.0), (40.0, 0.0), (80.0, 0.0)]);
        for _ in 0..10 {
            step(&mut state, &feel, &centers);
        }
        for body in &state.bodies {
            assert_eq!(*body, BlockBody::default());
        }
    }

    #[test]
    fn displaced_bodies_settle_to_rest() {
        let feel = Feel::default();
        let mut state = SceneState::new(10, 9);
        for (i, body) in state.bodies.iter_mut().enumerate() {
            body.pos = Vec2::new((i as f32 - 5.0) * 8.0, 25.0 - i as f32);
        }
        let centers = FixedCenters(vec![Vec2::ZERO; 10]);
        for _ in 0..100 {
            step(&mut state, &feel, &centers);
        }
        for body in &state.bodies {
            assert!(body.pos.length() < 1e-3, "did not settle: {:?}", body.pos);
        }
    }

    #[test]
    fn clamp_bounds_hover_displacement_but_not_velocity() {
        let feel = Feel::default();
        let mut state = SceneState::new(1, 1);
        state.bodies[0].vel = Vec2::new(1000.0, -1000.0);
        let centers = centers_at(&[(0.0, 0.0)]);
        step(&mut state, &feel, &centers);
        assert_eq!(state.bodies[0].pos.x, feel.repel.max_offset);
        assert_eq!(state.bodies[0].pos.y, -feel.repel.max_offset);
        // soft wall: the body still carries velocity into the next frame
        assert!(state.bodies[0].vel.x > feel.repel.max_offset);
    }

    #[test]
    fn blast_transition_is_one_way_and_once() {
        let feel = Feel::default();
        let mut state = SceneState::new(2, 3);
        let centers = centers_at(&[(100.0, 50.0), (200.0, 300.0)]);
        let mut rng = state.rng_state.to_rng();

        let click = Vec2::new(100.0, 100.0);
        assert!(trigger_blast(
            &mut state,
            &feel.blast,
            click,
            &centers,
            &mut rng
        ));
        assert_eq!(state.mode, Mode::Blast);

        let before = state.bodies.clone();
        assert!(!trigger_blast(
            &mut state,
            &feel.blast,
            click,
            &centers,
            &mut rng
        ));
        assert_eq!(state.mode, Mode::Blast);
        assert_eq!(state.bodies, before);
    }

    #[test]
    fn upward_kick_biases_block_above_click() {
        let feel = Feel::default();
        let mut state = SceneState::new(1, 3);
        let centers = centers_at(&[(100.0, 50.0)]);
        let mut rng = state.rng_state.to_rng();
        trigger_blast(
            &mut state,
            &feel.blast,
            Vec2::new(100.0, 100.0),
            &centers,
            &mut rng,
        );
        // straight above the click: outward impulse and kick both point up
        assert!(state.bodies[0].vel.y < 0.0);
    }

    #[test]
    fn click_on_block_center_stays_finite() {
        let feel = Feel::default();
        let mut state = SceneState::new(1, 5);
        let centers = centers_at(&[(100.0, 100.0)]);
        let mut rng = state.rng_state.to_rng();
        trigger_blast(
            &mut state,
            &feel.blast,
            Vec2::new(100.0, 100.0),
            &centers,
            &mut rng,
        );
        let vel = state.bodies[0].vel;
        assert!(vel.x.is_finite() && vel.y.is_finite());
        // jitter alone cannot cancel the fixed upward kick
        assert!(vel.y < 0.0);
    }

    #[test]
    fn blast_debris_falls_out_of_frame() {
        let feel = Feel::default();
        let mut state = SceneState::new(4, 11);
        let centers = centers_at(&[(10.0, 10.0), (60.0, 20.0), (110.0, 30.0), (160.0, 40.0)]);
        let mut rng = state.rng_state.to_rng();
        trigger_blast(
            &mut state,
            &feel.blast,
            Vec2::new(80.0, 25.0),
            &centers,
            &mut rng,
        );

        let view_height = 300.0;
        let mut frames = 0;
        while !state.all_offscreen(view_height) {
            step(&mut state, &feel, &centers);
            frames += 1;
            assert!(frames < 1000, "debris never left the frame");
        }
        // gravity keeps winning: everything is below the padded view bottom
        for body in &state.bodies {
            assert!(body.pos.y >= view_height * crate::consts::OFFSCREEN_FACTOR);
        }
    }

    #[test]
    fn identical_seeds_produce_identical_impulses() {
        let feel = Feel::default();
        let centers = centers_at(&[(30.0, 40.0), (250.0, 90.0)]);
        let click = Vec2::new(140.0, 60.0);

        let mut a = SceneState::new(2, 77);
        let mut rng_a = a.rng_state.to_rng();
        trigger_blast(&mut a, &feel.blast, click, &centers, &mut rng_a);

        let mut b = SceneState::new(2, 77);
        let mut rng_b = b.rng_state.to_rng();
        trigger_blast(&mut b, &feel.blast, click, &centers, &mut rng_b);

        assert_eq!(a.bodies, b.bodies);
    }
}

#[cfg(test)]
mod invariants {
    use super::*;
    use crate::sim::state::{BlockBody, Cursor};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn hover_offsets_never_exceed_clamp(
            px in -500.0f32..500.0,
            py in -500.0f32..500.0,
            vx in -200.0f32..200.0,
            vy in -200.0f32..200.0,
            cx in -400.0f32..400.0,
            cy in -400.0f32..400.0,
        ) {
            let feel = Feel::default();
            let mut state = SceneState::new(1, 7);
            state.bodies[0] = BlockBody {
                pos: Vec2::new(px, py),
                vel: Vec2::new(vx, vy),
            };
            state.cursor = Cursor {
                pos: Vec2::new(cx, cy),
                active: true,
            };
            let centers = FixedCenters(vec![Vec2::new(cx + 10.0, cy)]);
            for _ in 0..5 {
                step(&mut state, &feel, &centers);
                prop_assert!(state.bodies[0].pos.x.abs() <= feel.repel.max_offset);
                prop_assert!(state.bodies[0].pos.y.abs() <= feel.repel.max_offset);
            }
        }

        #[test]
        fn cursor_beyond_radius_never_repels(
            angle in 0.0f32..std::f32::consts::TAU,
            extra in 0.5f32..400.0,
        ) {
            let feel = Feel::default();
            let mut state = SceneState::new(1, 7);
            let center = Vec2::new(120.0, -40.0);
            let offset = Vec2::from_angle(angle) * (feel.repel.radius + extra);
            state.cursor = Cursor {
                pos: center + offset,
                active: true,
            };
            let centers = FixedCenters(vec![center]);
            step(&mut state, &feel, &centers);
            prop_assert_eq!(state.bodies[0], BlockBody::default());
        }
    }
}
