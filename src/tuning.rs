//! Data-driven game balance
//!
//! Every balance knob lives here so a session can be re-tuned from a JSON
//! file without touching simulation code. Missing fields fall back to the
//! shipped defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    /// File could not be read
    #[error("Failed to read tuning file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing failed
    #[error("Failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its usable range
    #[error("Invalid tuning value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Wave escalation and spawn timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Starting probability of a big enemy (0-1)
    pub base_difficulty: f32,
    /// Difficulty added per completed wave
    pub difficulty_step: f32,
    /// Seconds between enemy spawns on wave 0
    pub base_spawn_rate: f32,
    /// Spawn interval removed every second wave
    pub spawn_rate_step: f32,
    /// Spawn interval floor
    pub min_spawn_rate: f32,
    /// Enemy quota of wave 0
    pub base_enemies: u32,
    /// Quota added per completed wave
    pub enemies_step: u32,
    /// Drift speed of wave 0
    pub base_enemy_speed: f32,
    /// Drift speed added every second wave
    pub enemy_speed_step: f32,
    /// Drift speed cap
    pub max_enemy_speed: f32,
    /// Multiplier added per completed wave
    pub multiplier_step: f32,
    /// Seconds between wave completion and the next wave
    pub wave_delay: f32,
    /// Seconds from wave start to the first enemy
    pub first_enemy_delay: f32,
    /// Seconds between asteroid spawn attempts
    pub asteroid_spawn_rate: f32,
    /// Seconds from session start to the first asteroid attempt
    pub first_asteroid_delay: f32,
    /// Seconds between star spawn attempts
    pub star_spawn_rate: f32,
    /// Seconds from session start to the first star attempt
    pub first_star_delay: f32,
    /// Probability that a star attempt spawns anything
    pub star_spawn_probability: f32,
    /// Draw above which an enemy gets the sine pattern
    pub sine_threshold: f32,
    /// Fixed spawner anchor (right edge of the field)
    pub spawner_anchor: Vec2,
    /// Lateral offset of the upper and lower spawn lanes
    pub lane_offset: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_difficulty: 0.2,
            difficulty_step: 0.02,
            base_spawn_rate: 2.0,
            spawn_rate_step: 0.1,
            min_spawn_rate: 0.5,
            base_enemies: 10,
            enemies_step: 3,
            base_enemy_speed: 5.0,
            enemy_speed_step: 0.5,
            max_enemy_speed: 15.0,
            multiplier_step: 0.1,
            wave_delay: 5.0,
            first_enemy_delay: 1.0,
            asteroid_spawn_rate: 1.0,
            first_asteroid_delay: 0.5,
            star_spawn_rate: 0.8,
            first_star_delay: 0.5,
            star_spawn_probability: 0.6,
            sine_threshold: 0.7,
            spawner_anchor: Vec2::new(17.5, 5.0),
            lane_offset: 2.5,
        }
    }
}

/// Player ship handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTuning {
    /// Units per second
    pub move_speed: f32,
    /// Speed factor while boosting
    pub boost_factor: f32,
    /// Seconds between volleys
    pub fire_cooldown: f32,
    /// Gun muzzle offsets relative to the ship
    pub gun_offsets: Vec<Vec2>,
    /// Friendly bullet speed
    pub bullet_speed: f32,
    /// Number of health pips
    pub max_health: u32,
    /// Health at or below which the low-health warning fires
    pub low_health_threshold: u32,
    /// Where the ship starts
    pub start_position: Vec2,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            move_speed: 15.0,
            boost_factor: 1.5,
            fire_cooldown: 0.3,
            gun_offsets: vec![Vec2::new(0.6, 0.2), Vec2::new(0.6, -0.2)],
            bullet_speed: 12.0,
            max_health: 15,
            low_health_threshold: 5,
            start_position: Vec2::new(3.0, 5.0),
        }
    }
}

/// Enemy weapons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyGunTuning {
    /// Seconds between shots
    pub interval: f32,
    /// Seconds before the first shot
    pub delay: f32,
    /// Hostile bullet speed
    pub bullet_speed: f32,
}

impl Default for EnemyGunTuning {
    fn default() -> Self {
        Self {
            interval: 1.5,
            delay: 0.5,
            bullet_speed: 6.0,
        }
    }
}

/// Complete balance table for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub wave: WaveTuning,
    pub ship: ShipTuning,
    pub enemy_gun: EnemyGunTuning,
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let w = &self.wave;
        positive("wave.base_spawn_rate", w.base_spawn_rate)?;
        positive("wave.min_spawn_rate", w.min_spawn_rate)?;
        positive("wave.asteroid_spawn_rate", w.asteroid_spawn_rate)?;
        positive("wave.star_spawn_rate", w.star_spawn_rate)?;
        positive("ship.fire_cooldown", self.ship.fire_cooldown)?;
        positive("enemy_gun.interval", self.enemy_gun.interval)?;
        unit("wave.base_difficulty", w.base_difficulty)?;
        unit("wave.star_spawn_probability", w.star_spawn_probability)?;
        unit("wave.sine_threshold", w.sine_threshold)?;
        non_negative("wave.wave_delay", w.wave_delay)?;
        non_negative("wave.difficulty_step", w.difficulty_step)?;
        non_negative("wave.multiplier_step", w.multiplier_step)?;
        non_negative("wave.enemy_speed_step", w.enemy_speed_step)?;
        non_negative("wave.spawn_rate_step", w.spawn_rate_step)?;

        if w.base_enemies == 0 {
            return Err(TuningError::Invalid {
                field: "wave.base_enemies",
                reason: "a wave needs at least one enemy".to_string(),
            });
        }
        if w.max_enemy_speed < w.base_enemy_speed {
            return Err(TuningError::Invalid {
                field: "wave.max_enemy_speed",
                reason: format!(
                    "cap {} is below base speed {}",
                    w.max_enemy_speed, w.base_enemy_speed
                ),
            });
        }
        if self.ship.max_health == 0 {
            return Err(TuningError::Invalid {
                field: "ship.max_health",
                reason: "the ship needs at least one health pip".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("expected a non-negative number, got {value}"),
        })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("expected a value in [0, 1], got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "wave": { "base_enemies": 4 } }"#).unwrap();
        assert_eq!(tuning.wave.base_enemies, 4);
        assert_eq!(tuning.wave.enemies_step, 3);
        assert_eq!(tuning.ship.max_health, 15);
    }

    #[test]
    fn test_rejects_zero_spawn_rate() {
        let err = Tuning::from_json(r#"{ "wave": { "base_spawn_rate": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "wave.base_spawn_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_speed_cap_below_base() {
        let mut tuning = Tuning::default();
        tuning.wave.max_enemy_speed = 1.0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TuningError::Io { .. }));
    }
}
