//! Motion feel parameters
//!
//! Tunable configuration, not derived state: everything here is immutable
//! for the life of the scene. Defaults are the shipped feel; a partial JSON
//! blob can override individual fields for tuning sessions.

use serde::{Deserialize, Serialize};

/// Hover-phase repulsion feel
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RepelFeel {
    /// Cursor influence radius (px)
    pub radius: f32,
    /// Peak repulsion added to velocity at zero distance
    pub strength: f32,
    /// Spring pull-back toward the rest offset
    pub spring: f32,
    /// Per-frame velocity damping (both axes)
    pub damp: f32,
    /// Hard positional clamp per axis (px)
    pub max_offset: f32,
}

impl Default for RepelFeel {
    fn default() -> Self {
        Self {
            radius: 180.0,
            strength: 60.0,
            spring: 0.12,
            damp: 0.62,
            max_offset: 55.0,
        }
    }
}

/// Fall-phase and click-impulse feel
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastFeel {
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Horizontal air drag per frame
    pub drag_x: f32,
    /// Vertical air drag per frame
    pub drag_y: f32,
    /// Base explosion impulse
    pub impulse: f32,
    /// Extra randomized kick on top of the base impulse
    pub impulse_random: f32,
    /// Fixed upward pop subtracted from the vertical impulse
    pub up_kick: f32,
    /// Per-axis jitter spans added to the impulse
    pub jitter_x: f32,
    pub jitter_y: f32,
}

impl Default for BlastFeel {
    fn default() -> Self {
        Self {
            gravity: 0.9,
            drag_x: 0.985,
            drag_y: 0.992,
            impulse: 5.0,
            impulse_random: 20.0,
            up_kick: 6.0,
            jitter_x: 4.0,
            jitter_y: 3.0,
        }
    }
}

/// Credits sequence timing
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditsFeel {
    /// Beat between the blast and the first caption, letting debris separate
    pub settle_ms: f64,
    /// How long each caption stays visible
    pub hold_ms: f64,
    /// Dark gap between captions
    pub gap_ms: f64,
    /// Playback rate of the final reveal loop
    pub video_rate: f64,
}

impl Default for CreditsFeel {
    fn default() -> Self {
        Self {
            settle_ms: 600.0,
            hold_ms: 2200.0,
            gap_ms: 1000.0,
            video_rate: 0.5,
        }
    }
}

/// All feel parameters for the title sequence
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Feel {
    pub repel: RepelFeel,
    pub blast: BlastFeel,
    pub credits: CreditsFeel,
    /// Auto-advance timeout for viewers who never click
    pub auto_advance_ms: f64,
}

impl Default for Feel {
    fn default() -> Self {
        Self {
            repel: RepelFeel::default(),
            blast: BlastFeel::default(),
            credits: CreditsFeel::default(),
            auto_advance_ms: 6000.0,
        }
    }
}

impl Feel {
    /// Parse a partial override; anything malformed falls back to the
    /// shipped defaults with a warning, never an error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(feel) => feel,
            Err(err) => {
                log::warn!("feel override ignored (parse error: {err})");
                Self::default()
            }
        }
    }
}
