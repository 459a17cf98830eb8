//! Star Drift - A side-scrolling arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, combat, health, score)
//! - `events`: Notifications the simulation raises for the host
//! - `hud`: Presentation sink and HUD text formatting
//! - `audio`: Audio sink for one-shot sound triggers
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod events;
pub mod hud;
pub mod sim;
pub mod tuning;

pub use events::{GameEvent, Sinks, dispatch};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Visible play field (world units)
    pub const FIELD_WIDTH: f32 = 17.0;
    pub const FIELD_HEIGHT: f32 = 10.0;
    /// Entities are culled one unit outside the visible field
    pub const CULL_MARGIN: f32 = 1.0;

    /// Ship movement bounds
    pub const SHIP_MIN_X: f32 = 1.5;
    pub const SHIP_MAX_X: f32 = 16.0;
    pub const SHIP_MIN_Y: f32 = 1.0;
    pub const SHIP_MAX_Y: f32 = 9.0;

    /// Collision radii
    pub const SHIP_RADIUS: f32 = 0.5;
    pub const BULLET_RADIUS: f32 = 0.1;

    /// Countdowns within this of zero have expired. Absorbs the rounding
    /// left over from subtracting `SIM_DT` (which is not exact in f32).
    pub const TIMER_EPSILON: f32 = 1e-4;
}

/// Axis-aligned rectangle used for play-field bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Clamp a point into the rectangle
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Region outside of which entities are culled
pub fn cull_bounds() -> Rect {
    use consts::*;
    Rect::new(
        Vec2::splat(-CULL_MARGIN),
        Vec2::new(FIELD_WIDTH + CULL_MARGIN, FIELD_HEIGHT + CULL_MARGIN),
    )
}

/// Region the player ship is held inside
pub fn ship_bounds() -> Rect {
    use consts::*;
    Rect::new(
        Vec2::new(SHIP_MIN_X, SHIP_MIN_Y),
        Vec2::new(SHIP_MAX_X, SHIP_MAX_Y),
    )
}

/// Round half away from zero to an unsigned integer, saturating at zero
#[inline]
pub fn round_points(value: f32) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.round() as u64
    }
}
