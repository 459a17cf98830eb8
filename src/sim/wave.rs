//! Wave director: spawn scheduling, weighted selection and difficulty curves
//!
//! State machine: `Idle -> Spawning -> WaveComplete -> (delay) -> Spawning`.
//!
//! Three independent countdowns drive spawning. The enemy timer is restarted
//! by every wave start and stopped by every completion. The asteroid timer is
//! paused while a wave is complete and resumes where it left off. The star
//! timer starts with the session and never stops.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{AsteroidSize, EnemySize, EntityKind, StarSize};
use crate::consts::TIMER_EPSILON;
use crate::tuning::WaveTuning;

/// Director phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Session not started
    Idle,
    /// Enemy quota still alive or unspawned
    Spawning,
    /// Quota eliminated, waiting for the next wave
    WaveComplete,
}

/// Read-only view of the current wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    /// Wave index (0-based, monotonic)
    pub wave: u32,
    /// Enemies of this wave not yet removed from play
    pub enemies_remaining: u32,
    /// Enemy quota of this wave
    pub enemies_total: u32,
    /// Enemies of this wave spawned so far
    pub enemies_spawned: u32,
    /// Probability of a big enemy, in [0, 1]
    pub difficulty: f32,
    /// Seconds between enemy spawns
    pub spawn_rate: f32,
    /// Drift speed given to spawned entities
    pub enemy_speed: f32,
    /// Score multiplier earned by completed waves
    pub multiplier: f32,
    pub is_wave_complete: bool,
}

impl WaveState {
    fn for_wave(tuning: &WaveTuning, wave: u32, enemies_total: u32) -> Self {
        Self {
            wave,
            enemies_remaining: enemies_total,
            enemies_total,
            enemies_spawned: 0,
            difficulty: difficulty_for_wave(tuning, wave),
            spawn_rate: spawn_rate_for_wave(tuning, wave),
            enemy_speed: enemy_speed_for_wave(tuning, wave),
            multiplier: multiplier_for_wave(tuning, wave),
            is_wave_complete: false,
        }
    }
}

/// `min(1, base + step * wave)`
pub fn difficulty_for_wave(tuning: &WaveTuning, wave: u32) -> f32 {
    (tuning.base_difficulty + tuning.difficulty_step * wave as f32).clamp(0.0, 1.0)
}

/// `1 + step * wave`
pub fn multiplier_for_wave(tuning: &WaveTuning, wave: u32) -> f32 {
    1.0 + tuning.multiplier_step * wave as f32
}

/// Speed rises on every even wave, up to the cap
pub fn enemy_speed_for_wave(tuning: &WaveTuning, wave: u32) -> f32 {
    let steps = (wave / 2) as f32;
    (tuning.base_enemy_speed + tuning.enemy_speed_step * steps).min(tuning.max_enemy_speed)
}

/// Spawn interval shrinks on every even wave, down to the floor
pub fn spawn_rate_for_wave(tuning: &WaveTuning, wave: u32) -> f32 {
    let steps = (wave / 2) as f32;
    (tuning.base_spawn_rate - tuning.spawn_rate_step * steps).max(tuning.min_spawn_rate)
}

/// Big enemy when `r <= difficulty`
pub fn pick_enemy(r: f32, difficulty: f32) -> EnemySize {
    if r <= difficulty {
        EnemySize::Big
    } else {
        EnemySize::Small
    }
}

/// 30% small, 20% normal, 10% large, 40% nothing
pub fn pick_asteroid(r: f32) -> Option<AsteroidSize> {
    if r < 0.3 {
        Some(AsteroidSize::Small)
    } else if r < 0.5 {
        Some(AsteroidSize::Normal)
    } else if r < 0.6 {
        Some(AsteroidSize::Large)
    } else {
        None
    }
}

/// 5% bigger, 15% big, 80% normal
pub fn pick_star(r: f32) -> StarSize {
    if r < 0.05 {
        StarSize::Bigger
    } else if r < 0.2 {
        StarSize::Big
    } else {
        StarSize::Normal
    }
}

/// Centre, upper or lower lane relative to the spawner anchor
pub fn pick_lane(r: f32, anchor: Vec2, offset: f32) -> Vec2 {
    if r < 0.33 {
        anchor
    } else if r < 0.66 {
        anchor + Vec2::new(0.0, offset)
    } else {
        anchor - Vec2::new(0.0, offset)
    }
}

/// Repeating countdown advanced by simulation time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepeatingTimer {
    remaining: f32,
    interval: f32,
    running: bool,
}

impl RepeatingTimer {
    pub fn stopped() -> Self {
        Self {
            remaining: 0.0,
            interval: 0.0,
            running: false,
        }
    }

    /// First firing after `delay`, then every `interval`
    pub fn start(&mut self, delay: f32, interval: f32) {
        self.remaining = delay;
        self.interval = interval;
        self.running = true;
    }

    /// Stop without discarding the countdown
    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Advance by `dt`; returns how many times the timer fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.running || self.interval <= 0.0 {
            return 0;
        }
        self.remaining -= dt;
        let mut fired = 0;
        while self.remaining <= TIMER_EPSILON {
            fired += 1;
            self.remaining += self.interval;
        }
        fired
    }
}

/// A request to put a new entity into play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnOrder {
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Leftward drift speed
    pub speed: f32,
    /// Layer the sine pattern on top of the drift
    pub sine: bool,
}

/// Wave transitions, for the host and the score economy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WaveEvent {
    Started { wave: u32, enemies: u32 },
    /// `wave` is the index of the upcoming wave
    Completed { wave: u32, multiplier: f32 },
}

/// Owner of the wave state and every spawn timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDirector {
    tuning: WaveTuning,
    state: WaveState,
    phase: WavePhase,
    enemy_timer: RepeatingTimer,
    asteroid_timer: RepeatingTimer,
    star_timer: RepeatingTimer,
    /// Seconds until the next wave starts (WaveComplete only)
    next_wave_in: f32,
    events: Vec<WaveEvent>,
}

impl WaveDirector {
    pub fn new(tuning: WaveTuning) -> Self {
        let state = WaveState::for_wave(&tuning, 0, tuning.base_enemies);
        Self {
            tuning,
            state,
            phase: WavePhase::Idle,
            enemy_timer: RepeatingTimer::stopped(),
            asteroid_timer: RepeatingTimer::stopped(),
            star_timer: RepeatingTimer::stopped(),
            next_wave_in: 0.0,
            events: Vec::new(),
        }
    }

    /// Reset to wave 0 and start every timer
    pub fn start_session(&mut self) {
        let t = &self.tuning;
        self.state = WaveState::for_wave(t, 0, t.base_enemies);
        self.star_timer.start(t.first_star_delay, t.star_spawn_rate);
        self.asteroid_timer
            .start(t.first_asteroid_delay, t.asteroid_spawn_rate);
        self.events.clear();
        self.start_wave();
    }

    fn start_wave(&mut self) {
        self.state.enemies_remaining = self.state.enemies_total;
        self.state.enemies_spawned = 0;
        self.state.is_wave_complete = false;
        self.phase = WavePhase::Spawning;
        self.enemy_timer
            .start(self.tuning.first_enemy_delay, self.state.spawn_rate);
        self.asteroid_timer.resume();
        log::info!(
            "Wave {} started: {} enemies, difficulty {:.2}, speed {:.1}, spawn rate {:.2}s",
            self.state.wave,
            self.state.enemies_total,
            self.state.difficulty,
            self.state.enemy_speed,
            self.state.spawn_rate
        );
        self.events.push(WaveEvent::Started {
            wave: self.state.wave,
            enemies: self.state.enemies_total,
        });
    }

    fn complete_wave(&mut self) {
        self.state.is_wave_complete = true;
        self.phase = WavePhase::WaveComplete;
        self.enemy_timer.pause();
        self.asteroid_timer.pause();

        let wave = self.state.wave + 1;
        let enemies_total = self.state.enemies_total + self.tuning.enemies_step;
        self.state = WaveState {
            enemies_remaining: 0,
            is_wave_complete: true,
            ..WaveState::for_wave(&self.tuning, wave, enemies_total)
        };
        self.next_wave_in = self.tuning.wave_delay;

        log::info!(
            "Wave complete, next wave {} in {:.1}s (multiplier {:.1}X)",
            wave,
            self.next_wave_in,
            self.state.multiplier
        );
        self.events.push(WaveEvent::Completed {
            wave,
            multiplier: self.state.multiplier,
        });
    }

    /// Report that an enemy of the current wave left play
    pub fn on_enemy_removed(&mut self) {
        if self.phase != WavePhase::Spawning {
            return;
        }
        self.state.enemies_remaining = self.state.enemies_remaining.saturating_sub(1);
        if self.state.enemies_remaining == 0 && !self.state.is_wave_complete {
            self.complete_wave();
        }
    }

    /// Advance every timer and return the spawns that came due
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Vec<SpawnOrder> {
        let mut orders = Vec::new();
        if self.phase == WavePhase::Idle {
            return orders;
        }

        for _ in 0..self.star_timer.advance(dt) {
            if let Some(order) = self.roll_star(rng) {
                orders.push(order);
            }
        }

        match self.phase {
            WavePhase::Spawning => {
                for _ in 0..self.enemy_timer.advance(dt) {
                    if self.state.enemies_spawned < self.state.enemies_total {
                        orders.push(self.roll_enemy(rng));
                        self.state.enemies_spawned += 1;
                    }
                }
                for _ in 0..self.asteroid_timer.advance(dt) {
                    if let Some(order) = self.roll_asteroid(rng) {
                        orders.push(order);
                    }
                }
            }
            WavePhase::WaveComplete => {
                self.next_wave_in -= dt;
                if self.next_wave_in <= TIMER_EPSILON {
                    self.start_wave();
                }
            }
            WavePhase::Idle => {}
        }

        orders
    }

    fn lane<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        pick_lane(
            rng.random::<f32>(),
            self.tuning.spawner_anchor,
            self.tuning.lane_offset,
        )
    }

    fn roll_enemy<R: Rng + ?Sized>(&self, rng: &mut R) -> SpawnOrder {
        let pos = self.lane(rng);
        let size = pick_enemy(rng.random::<f32>(), self.state.difficulty);
        let sine = rng.random::<f32>() > self.tuning.sine_threshold;
        SpawnOrder {
            kind: EntityKind::Enemy(size),
            pos,
            speed: self.state.enemy_speed,
            sine,
        }
    }

    fn roll_asteroid<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SpawnOrder> {
        let size = pick_asteroid(rng.random::<f32>())?;
        Some(SpawnOrder {
            kind: EntityKind::Asteroid(size),
            pos: self.lane(rng),
            speed: self.state.enemy_speed,
            sine: false,
        })
    }

    fn roll_star<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SpawnOrder> {
        if rng.random::<f32>() > self.tuning.star_spawn_probability {
            return None;
        }
        let size = pick_star(rng.random::<f32>());
        Some(SpawnOrder {
            kind: EntityKind::Star(size),
            pos: self.lane(rng),
            speed: self.state.enemy_speed,
            sine: false,
        })
    }

    pub fn state(&self) -> &WaveState {
        &self.state
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn tuning(&self) -> &WaveTuning {
        &self.tuning
    }

    /// Take the transitions raised since the last call
    pub fn drain_events(&mut self) -> Vec<WaveEvent> {
        std::mem::take(&mut self.events)
    }
}
