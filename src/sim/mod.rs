//! Deterministic simulation module
//!
//! All motion logic lives here. This module must be pure and deterministic:
//! - One discrete step per animation frame
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod credits;
pub mod state;
pub mod step;

pub use credits::{Stage, Timeline};
pub use state::{BlockBody, Cursor, Mode, RngState, SceneState};
pub use step::{CenterSource, FixedCenters, step, trigger_blast};
