//! Scene state and simulation context types
//!
//! Everything the frame loop mutates lives here, owned by one context object
//! rather than free-standing globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{CURSOR_PARKED, OFFSCREEN_FACTOR};

/// Which force law drives the per-frame step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Cursor repulsion plus spring return, active before the first click
    Repel,
    /// Gravity plus drag free fall, active after the triggering click
    Blast,
}

/// Process-wide pointer state, last write wins
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    /// Raw client coordinates of the last move event
    pub pos: Vec2,
    /// False until the pointer first moves onto the page, false again after
    /// pointer-leave / touch-end
    pub active: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            pos: Vec2::splat(CURSOR_PARKED),
            active: false,
        }
    }
}

/// Kinematic offset state for one block (device pixels from rest)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockBody {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// RNG state wrapper for the blast impulse stream
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete simulation context, created once at scene load
#[derive(Debug, Clone)]
pub struct SceneState {
    /// Active force law; Repel -> Blast is one-way
    pub mode: Mode,
    /// Shared pointer state, written by input events, read once per frame
    pub cursor: Cursor,
    /// One kinematic state per block, never resized after creation
    pub bodies: Vec<BlockBody>,
    /// Seed for the blast randomness
    pub rng_state: RngState,
    /// Frames stepped so far
    pub frames: u64,
    /// One-shot gate for the credits sequence
    credits_started: bool,
}

impl SceneState {
    /// Create the context for `block_count` blocks, all at rest
    pub fn new(block_count: usize, seed: u64) -> Self {
        Self {
            mode: Mode::Repel,
            cursor: Cursor::default(),
            bodies: vec![BlockBody::default(); block_count],
            rng_state: RngState::new(seed),
            frames: 0,
            credits_started: false,
        }
    }

    /// One-shot credits gate: true on the first call, false forever after.
    /// Keeps the sequence non-reentrant no matter how the trigger paths race.
    pub fn begin_credits(&mut self) -> bool {
        if self.credits_started {
            false
        } else {
            self.credits_started = true;
            true
        }
    }

    /// Debris-exit heuristic: every body has fallen past the bottom of the
    /// (padded) view. Informational only; the credits handoff is a fixed
    /// delay, not a measured exit.
    pub fn all_offscreen(&self, view_height: f32) -> bool {
        !self.bodies.is_empty()
            && self
                .bodies
                .iter()
                .all(|b| b.pos.y >= view_height * OFFSCREEN_FACTOR)
    }
}
