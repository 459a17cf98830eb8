//! Game state and session context
//!
//! [`GameState`] owns exactly one of everything a session needs: the world,
//! the player's health, the score economy and the wave director. Everything
//! else borrows it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::damage::Role;
use super::entity::{EnemyGun, EnemySize, Entity, EntityId, EntityKind, Motion, SineWave, World};
use super::health::PlayerHealth;
use super::score::ScoreEconomy;
use super::wave::{SpawnOrder, WaveDirector, WaveEvent, WavePhase, WaveState};
use crate::audio::SoundEffect;
use crate::events::GameEvent;
use crate::hud::STATUS_DURATION;
use crate::ship_bounds;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Session created, not started
    Ready,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player destroyed; the world keeps drifting
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: EntityId,
    pub pos: Vec2,
    /// Seconds until the guns can fire again
    pub fire_cooldown: f32,
    pub alive: bool,
}

impl Ship {
    /// Move by an already-scaled step and stay inside the ship bounds
    pub fn move_by(&mut self, step: Vec2) {
        self.pos = ship_bounds().clamp(self.pos + step);
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub ship: Ship,
    pub world: World,
    pub health: PlayerHealth,
    pub score: ScoreEconomy,
    pub director: WaveDirector,
    /// Notifications not yet drained by the host
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed and balance table
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut world = World::new();
        let ship = Ship {
            id: world.next_entity_id(),
            pos: ship_bounds().clamp(tuning.ship.start_position),
            fire_cooldown: 0.0,
            alive: true,
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            health: PlayerHealth::new(tuning.ship.max_health, tuning.ship.low_health_threshold),
            score: ScoreEconomy::new(),
            director: WaveDirector::new(tuning.wave.clone()),
            tuning,
            time_ticks: 0,
            phase: GamePhase::Ready,
            ship,
            world,
            events: Vec::new(),
        }
    }

    /// Start spawning and publish the initial HUD values
    pub fn start_session(&mut self) {
        if self.phase != GamePhase::Ready {
            log::warn!("start_session called twice, ignoring");
            return;
        }
        log::info!("Session started with seed {}", self.seed);
        self.phase = GamePhase::Playing;
        self.director.start_session();
        self.apply_wave_events();

        self.events.extend([
            GameEvent::WaveDisplay { wave: 0 },
            GameEvent::ScoreDisplay {
                score: self.score.score(),
            },
            GameEvent::MultiplierDisplay {
                multiplier: self.score.multiplier(),
            },
            GameEvent::StarsDisplay {
                count: self.score.stars(),
            },
            GameEvent::HealthDisplay {
                current: self.health.current(),
                max: self.health.max(),
            },
        ]);
    }

    /// Take every notification raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn wave(&self) -> &WaveState {
        self.director.state()
    }

    pub fn wave_phase(&self) -> WavePhase {
        self.director.phase()
    }

    /// Role of a participant still in play; `None` for removed, pending or
    /// unknown handles and for a dead ship
    pub fn role_of(&self, id: EntityId) -> Option<Role> {
        if id == self.ship.id {
            return self.ship.alive.then_some(Role::Player);
        }
        self.world.live(id).map(|e| Role::of(e.kind))
    }

    /// Put a director spawn order into play
    pub fn apply_spawn(&mut self, order: SpawnOrder) -> EntityId {
        let gun = &self.tuning.enemy_gun;
        let armed = matches!(order.kind, EntityKind::Enemy(EnemySize::Big));
        let (delay, interval) = (gun.delay, gun.interval);
        self.world.spawn_with(order.kind, order.pos, |entity| {
            let mut entity = entity.with_motion(Motion::Drift { speed: order.speed });
            if order.sine {
                entity = entity.with_sine(SineWave::new(order.pos.y));
            }
            if armed {
                entity = entity.with_gun(EnemyGun::new(delay, interval));
            }
            entity
        })
    }

    /// Fire one friendly bullet from every gun
    pub fn fire_volley(&mut self) {
        let velocity = Vec2::new(self.tuning.ship.bullet_speed, 0.0);
        let muzzles: Vec<Vec2> = self
            .tuning
            .ship
            .gun_offsets
            .iter()
            .map(|offset| self.ship.pos + *offset)
            .collect();
        for muzzle in muzzles {
            self.world
                .spawn_with(EntityKind::Bullet { hostile: false }, muzzle, |e| {
                    e.with_motion(Motion::Linear { vel: velocity })
                });
        }
        self.events.push(GameEvent::Sound(SoundEffect::Gunshot));
    }

    /// Fire a hostile bullet leftward from an enemy gun
    pub fn fire_enemy_bullet(&mut self, from: Vec2) -> EntityId {
        let velocity = Vec2::new(-self.tuning.enemy_gun.bullet_speed, 0.0);
        self.world
            .spawn_with(EntityKind::Bullet { hostile: true }, from, |e| {
                e.with_motion(Motion::Linear { vel: velocity })
            })
    }

    /// Remove every entity marked this tick and report enemy removals
    pub fn sweep(&mut self) -> Vec<Entity> {
        let removed = self.world.sweep();
        for entity in removed.iter().filter(|e| e.kind.is_enemy()) {
            log::debug!("Enemy #{} left play", entity.id);
            self.director.on_enemy_removed();
        }
        self.apply_wave_events();
        removed
    }

    /// Fold director transitions into the score economy and the event queue
    pub fn apply_wave_events(&mut self) {
        for event in self.director.drain_events() {
            match event {
                WaveEvent::Started { wave, enemies } => {
                    log::debug!("Wave {} running with {} enemies", wave, enemies);
                }
                WaveEvent::Completed { wave, multiplier } => {
                    self.score.set_multiplier(multiplier);
                    let multiplier = self.score.multiplier();
                    self.events.extend([
                        GameEvent::WaveDisplay { wave },
                        GameEvent::MultiplierDisplay { multiplier },
                        GameEvent::StatusMessage {
                            text: format!("Multiplier increased to {:.1}X!", multiplier),
                            duration: STATUS_DURATION,
                            permanent: false,
                            blinking: false,
                        },
                    ]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::AsteroidSize;

    #[test]
    fn test_new_state() {
        let state = GameState::new(12345, Tuning::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.health.current(), 15);
        assert_eq!(state.role_of(state.ship.id), Some(Role::Player));
        assert!(state.world.is_empty());
    }

    #[test]
    fn test_start_session_publishes_hud() {
        let mut state = GameState::new(1, Tuning::default());
        state.start_session();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave_phase(), WavePhase::Spawning);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::WaveDisplay { wave: 0 }));
        assert!(events.contains(&GameEvent::HealthDisplay { current: 15, max: 15 }));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_big_enemies_are_armed() {
        let mut state = GameState::new(1, Tuning::default());
        let order = SpawnOrder {
            kind: EntityKind::Enemy(EnemySize::Big),
            pos: Vec2::new(17.5, 5.0),
            speed: 5.0,
            sine: true,
        };
        let id = state.apply_spawn(order);
        let enemy = state.world.get(id).unwrap();
        assert!(enemy.gun.is_some());
        assert_eq!(enemy.sine.unwrap().center_y, 5.0);
        assert_eq!(enemy.motion, Motion::Drift { speed: 5.0 });

        let small = state.apply_spawn(SpawnOrder {
            kind: EntityKind::Enemy(EnemySize::Small),
            sine: false,
            ..order
        });
        assert!(state.world.get(small).unwrap().gun.is_none());
    }

    #[test]
    fn test_volley_fires_every_gun() {
        let mut state = GameState::new(1, Tuning::default());
        state.fire_volley();
        assert_eq!(state.world.count(|k| *k == EntityKind::Bullet { hostile: false }), 2);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Sound(SoundEffect::Gunshot)]
        );
    }

    #[test]
    fn test_ship_clamped() {
        let mut state = GameState::new(1, Tuning::default());
        state.ship.move_by(Vec2::new(-100.0, 100.0));
        assert_eq!(state.ship.pos, Vec2::new(1.5, 9.0));
    }

    #[test]
    fn test_sweep_counts_enemy_removals() {
        let mut state = GameState::new(1, Tuning::default());
        state.start_session();
        let enemy = state.world.spawn(EntityKind::Enemy(EnemySize::Small), Vec2::new(5.0, 5.0));
        let rock = state.world.spawn(
            EntityKind::Asteroid(AsteroidSize::Small),
            Vec2::new(6.0, 5.0),
        );
        state.world.destroy(enemy);
        state.world.destroy(rock);
        assert_eq!(state.sweep().len(), 2);
        assert_eq!(state.wave().enemies_remaining, 9);
    }
}
