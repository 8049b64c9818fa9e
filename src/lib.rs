//! Title Blast - physics-driven opening title sequence
//!
//! Core modules:
//! - `sim`: Deterministic simulation (repel/blast physics, credits timeline)
//! - `tuning`: Data-driven motion feel parameters
//! - `scene`: SVG scene loading and screen-space geometry (browser)
//! - `overlay`: Credits captions and the final reveal surface (browser)
//! - `platform`: Browser event-loop plumbing

pub mod platform;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod overlay;
#[cfg(target_arch = "wasm32")]
pub mod scene;

pub use tuning::Feel;

/// Structural constants (the tunable feel lives in [`tuning`])
pub mod consts {
    /// View-box height assumed when the SVG ships without a usable viewBox
    pub const FALLBACK_VIEW_HEIGHT: f32 = 300.0;
    /// A body counts as gone once its y offset passes this multiple of the
    /// view height
    pub const OFFSCREEN_FACTOR: f32 = 1.2;
    /// Minimum cursor distance considered for repulsion (divide-by-zero guard)
    pub const MIN_REPEL_DIST: f32 = 1e-4;
    /// Cursor rest coordinate before the pointer first enters the page
    pub const CURSOR_PARKED: f32 = -9999.0;
}

/// Clamp a scalar into `[-limit, limit]`
#[inline]
pub fn clamp_abs(v: f32, limit: f32) -> f32 {
    v.clamp(-limit, limit)
}
