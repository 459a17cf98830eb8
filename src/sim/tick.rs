//! Fixed timestep simulation tick
//!
//! Order within one tick: ship movement and fire, spawn timers, entity
//! movement (and enemy guns), boundary cull, overlap detection, combat
//! resolution, then the sweep of everything marked for removal.

use glam::Vec2;

use super::collision::{Body, find_overlaps};
use super::combat::resolve_overlaps;
use super::state::{GamePhase, GameState};
use crate::consts::{SHIP_RADIUS, TIMER_EPSILON};

/// Input commands for a single tick (sampled once per tick)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Move faster while held
    pub boost: bool,
    /// Fire whenever the guns are ready
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Unit-length (or zero) direction from the held keys
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y += 1.0;
        }
        if self.down {
            dir.y -= 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    // Nothing runs before the session starts or while paused
    match state.phase {
        GamePhase::Ready | GamePhase::Paused => return,
        GamePhase::Playing | GamePhase::GameOver => {}
    }

    state.time_ticks += 1;

    if state.ship.alive {
        update_ship(state, input, dt);
    }

    let orders = state.director.tick(dt, &mut state.rng);
    for order in orders {
        state.apply_spawn(order);
    }
    state.apply_wave_events();

    for muzzle in state.world.step(dt) {
        state.fire_enemy_bullet(muzzle);
    }
    state.world.cull_out_of_bounds();

    let overlaps = find_overlaps(&collision_bodies(state));
    resolve_overlaps(state, &overlaps);

    state.sweep();
}

fn update_ship(state: &mut GameState, input: &TickInput, dt: f32) {
    let tuning = &state.tuning.ship;
    let mut speed = tuning.move_speed;
    if input.boost {
        speed *= tuning.boost_factor;
    }
    let step = input.direction() * speed * dt;
    state.ship.move_by(step);

    if state.ship.fire_cooldown > TIMER_EPSILON {
        state.ship.fire_cooldown -= dt;
    }
    if input.fire && state.ship.fire_cooldown <= TIMER_EPSILON {
        state.ship.fire_cooldown = state.tuning.ship.fire_cooldown;
        state.fire_volley();
    }
}

/// Circles for the live ship and every live entity
fn collision_bodies(state: &GameState) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(state.world.len() + 1);
    if state.ship.alive {
        bodies.push(Body {
            id: state.ship.id,
            pos: state.ship.pos,
            radius: SHIP_RADIUS,
        });
    }
    bodies.extend(state.world.iter().filter(|e| e.is_live()).map(|e| Body {
        id: e.id,
        pos: e.pos,
        radius: e.radius(),
    }));
    bodies
}
