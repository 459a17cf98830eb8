//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod combat;
pub mod damage;
pub mod entity;
pub mod health;
pub mod score;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Body, Overlap, circles_overlap, find_overlaps};
pub use combat::{resolve_overlap, resolve_overlaps};
pub use damage::{Effect, Role, ram_damage, resolve};
pub use entity::{
    AsteroidSize, EnemySize, Entity, EntityId, EntityKind, Motion, SineWave, StarSize, World,
};
pub use health::{Hull, PlayerDamage, PlayerHealth};
pub use score::ScoreEconomy;
pub use state::{GamePhase, GameState, Ship};
pub use tick::{TickInput, tick};
pub use wave::{SpawnOrder, WaveDirector, WaveEvent, WavePhase, WaveState};
