//! Entity lifecycle: creation, movement patterns and boundary culling
//!
//! Every live bullet, enemy, asteroid and star is an [`Entity`] owned by the
//! [`World`]. Removal is two-phase: [`World::destroy`] only marks an entity,
//! and [`World::sweep`] drops marked entities once the tick is over, so combat
//! never resolves against something that already left play.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::health::Hull;
use crate::consts::*;
use crate::{Rect, cull_bounds};

/// Stable handle to an entity (0 is never allocated)
pub type EntityId = u32;

/// Enemy size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemySize {
    Small,
    Big,
}

/// Asteroid size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Small,
    Normal,
    Large,
}

/// Star pickup size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarSize {
    Normal,
    Big,
    Bigger,
}

/// Kind tag set at creation time, used for damage lookup and role dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Bullet { hostile: bool },
    Enemy(EnemySize),
    Asteroid(AsteroidSize),
    Star(StarSize),
    /// A destructible with no damage class of its own
    Hazard,
}

impl EntityKind {
    /// Enemies and asteroids (anything with a hull)
    pub fn is_destructible(&self) -> bool {
        matches!(
            self,
            EntityKind::Enemy(_) | EntityKind::Asteroid(_) | EntityKind::Hazard
        )
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, EntityKind::Enemy(_))
    }

    /// Collision radius in world units
    pub fn radius(&self) -> f32 {
        match self {
            EntityKind::Bullet { .. } => BULLET_RADIUS,
            EntityKind::Enemy(EnemySize::Small) => 0.4,
            EntityKind::Enemy(EnemySize::Big) => 0.7,
            EntityKind::Asteroid(AsteroidSize::Small) => 0.3,
            EntityKind::Asteroid(AsteroidSize::Normal) => 0.5,
            EntityKind::Asteroid(AsteroidSize::Large) => 0.8,
            EntityKind::Star(StarSize::Normal) => 0.3,
            EntityKind::Star(StarSize::Big) => 0.4,
            EntityKind::Star(StarSize::Bigger) => 0.5,
            EntityKind::Hazard => 0.5,
        }
    }

    /// Health and score value for destructible kinds
    pub fn hull(&self) -> Option<Hull> {
        let (max_health, score_value) = match self {
            EntityKind::Enemy(EnemySize::Small) => (1, 100),
            EntityKind::Enemy(EnemySize::Big) => (3, 250),
            EntityKind::Asteroid(AsteroidSize::Small) => (1, 25),
            EntityKind::Asteroid(AsteroidSize::Normal) => (2, 50),
            EntityKind::Asteroid(AsteroidSize::Large) => (3, 100),
            EntityKind::Hazard => (1, 50),
            EntityKind::Bullet { .. } | EntityKind::Star(_) => return None,
        };
        Some(Hull::new(max_health, score_value))
    }
}

/// Base movement pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Constant-velocity translation
    Linear { vel: Vec2 },
    /// Leftward drift at a fixed speed (enters from the right edge)
    Drift { speed: f32 },
    /// Does not move
    Stationary,
}

/// Sinusoidal vertical offset layered over the base motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineWave {
    /// Vertical centre line (spawn height)
    pub center_y: f32,
    pub amplitude: f32,
    pub frequency: f32,
}

impl SineWave {
    pub const AMPLITUDE: f32 = 2.0;
    pub const FREQUENCY: f32 = 2.0;

    pub fn new(center_y: f32) -> Self {
        Self {
            center_y,
            amplitude: Self::AMPLITUDE,
            frequency: Self::FREQUENCY,
        }
    }

    /// Height for a given horizontal position
    #[inline]
    pub fn y_at(&self, x: f32) -> f32 {
        self.center_y + (x * self.frequency).sin() * self.amplitude
    }
}

/// Auto-firing gun carried by some enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyGun {
    /// Seconds until the next shot
    pub cooldown: f32,
    pub interval: f32,
}

impl EnemyGun {
    pub fn new(delay: f32, interval: f32) -> Self {
        Self {
            cooldown: delay,
            interval,
        }
    }

    /// Advance the gun; returns true when it fires this step
    pub fn advance(&mut self, dt: f32) -> bool {
        self.cooldown -= dt;
        if self.cooldown <= TIMER_EPSILON {
            self.cooldown += self.interval;
            true
        } else {
            false
        }
    }
}

/// A simulated entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub motion: Motion,
    pub sine: Option<SineWave>,
    /// Health counter (destructibles only)
    pub hull: Option<Hull>,
    pub gun: Option<EnemyGun>,
    /// Marked for removal at the end of the tick
    pub pending_destroy: bool,
}

impl Entity {
    /// Create an entity with the default motion for its kind
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2) -> Self {
        let motion = match kind {
            EntityKind::Bullet { hostile: false } => Motion::Linear {
                vel: Vec2::new(12.0, 0.0),
            },
            EntityKind::Bullet { hostile: true } => Motion::Linear {
                vel: Vec2::new(-6.0, 0.0),
            },
            EntityKind::Enemy(_) | EntityKind::Asteroid(_) | EntityKind::Star(_) => {
                Motion::Drift { speed: 5.0 }
            }
            EntityKind::Hazard => Motion::Stationary,
        };
        Self {
            id,
            kind,
            pos,
            motion,
            sine: None,
            hull: kind.hull(),
            gun: None,
            pending_destroy: false,
        }
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_sine(mut self, sine: SineWave) -> Self {
        self.sine = Some(sine);
        self
    }

    pub fn with_gun(mut self, gun: EnemyGun) -> Self {
        self.gun = Some(gun);
        self
    }

    pub fn radius(&self) -> f32 {
        self.kind.radius()
    }

    /// Still taking part in the simulation
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.pending_destroy
    }

    /// Advance position by one step of the movement pattern
    pub fn step(&mut self, dt: f32) {
        match self.motion {
            Motion::Linear { vel } => self.pos += vel * dt,
            Motion::Drift { speed } => self.pos.x -= speed * dt,
            Motion::Stationary => {}
        }
        if let Some(sine) = &self.sine {
            self.pos.y = sine.y_at(self.pos.x);
        }
    }

    /// Outside the cull region for this entity's movement pattern
    pub fn is_out_of_bounds(&self) -> bool {
        is_out_of_bounds(self.pos, self.motion, &cull_bounds())
    }
}

/// Drifting entities enter from the right, so only the left, top and bottom
/// edges cull them. Everything else culls on all four edges.
pub fn is_out_of_bounds(pos: Vec2, motion: Motion, bounds: &Rect) -> bool {
    match motion {
        Motion::Drift { .. } => {
            pos.x < bounds.min.x || pos.y < bounds.min.y || pos.y > bounds.max.y
        }
        Motion::Linear { .. } | Motion::Stationary => !bounds.contains(pos),
    }
}

/// Owner of all live entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    entities: Vec<Entity>,
    next_id: EntityId,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an entity of the given kind with its default motion
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(Entity::new(id, kind, pos));
        log::debug!("Spawned {:?} #{} at ({:.2}, {:.2})", kind, id, pos.x, pos.y);
        id
    }

    /// Spawn a fully configured entity built by the caller
    pub fn spawn_with(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        build: impl FnOnce(Entity) -> Entity,
    ) -> EntityId {
        let id = self.next_entity_id();
        self.entities.push(build(Entity::new(id, kind, pos)));
        log::debug!("Spawned {:?} #{} at ({:.2}, {:.2})", kind, id, pos.x, pos.y);
        id
    }

    /// Mark an entity for removal. Returns true only for the call that
    /// actually marked it; unknown or already-marked IDs are a no-op.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if !entity.pending_destroy => {
                entity.pending_destroy = true;
                true
            }
            _ => false,
        }
    }

    /// Advance every live entity; returns the positions of enemy guns that fired
    pub fn step(&mut self, dt: f32) -> Vec<Vec2> {
        let mut shots = Vec::new();
        for entity in self.entities.iter_mut().filter(|e| e.is_live()) {
            entity.step(dt);
            if let Some(gun) = entity.gun.as_mut() {
                if gun.advance(dt) {
                    shots.push(entity.pos);
                }
            }
        }
        shots
    }

    /// Mark everything outside the cull region; returns how many were marked
    pub fn cull_out_of_bounds(&mut self) -> usize {
        let mut culled = 0;
        for entity in self.entities.iter_mut() {
            if entity.is_live() && entity.is_out_of_bounds() {
                entity.pending_destroy = true;
                culled += 1;
            }
        }
        culled
    }

    /// Remove marked entities, returning them in ID order
    pub fn sweep(&mut self) -> Vec<Entity> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            self.entities.drain(..).partition(|e| e.pending_destroy);
        self.entities = kept;
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Live (not pending-destroy) entity by ID
    pub fn live(&self, id: EntityId) -> Option<&Entity> {
        self.get(id).filter(|e| e.is_live())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Count of live entities matching a predicate
    pub fn count(&self, pred: impl Fn(&EntityKind) -> bool) -> usize {
        self.entities
            .iter()
            .filter(|e| e.is_live() && pred(&e.kind))
            .count()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_step() {
        let mut world = World::new();
        let id = world.spawn(EntityKind::Bullet { hostile: false }, Vec2::new(1.0, 1.0));
        world.step(0.5);
        let bullet = world.get(id).unwrap();
        assert!((bullet.pos.x - 7.0).abs() < 1e-5);
        assert!((bullet.pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_drift_moves_left_only() {
        let mut world = World::new();
        let id = world.spawn_with(
            EntityKind::Asteroid(AsteroidSize::Small),
            Vec2::new(10.0, 3.0),
            |e| e.with_motion(Motion::Drift { speed: 4.0 }),
        );
        world.step(0.25);
        let rock = world.get(id).unwrap();
        assert!((rock.pos.x - 9.0).abs() < 1e-5);
        assert_eq!(rock.pos.y, 3.0);
    }

    #[test]
    fn test_sine_follows_x() {
        let sine = SineWave::new(5.0);
        let mut entity = Entity::new(1, EntityKind::Enemy(EnemySize::Small), Vec2::new(3.0, 5.0))
            .with_motion(Motion::Drift { speed: 1.0 })
            .with_sine(sine);
        entity.step(0.5);
        let expected = 5.0 + (2.5f32 * 2.0).sin() * 2.0;
        assert!((entity.pos.y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_enemy_gun_fires_on_exact_ticks() {
        let mut gun = EnemyGun::new(0.5, 1.5);
        let shots: Vec<u32> = (1..=200).filter(|_| gun.advance(SIM_DT)).collect();
        assert_eq!(shots, vec![25, 100, 175]);
    }

    #[test]
    fn test_drift_not_culled_on_right_edge() {
        let bounds = cull_bounds();
        let drift = Motion::Drift { speed: 5.0 };
        assert!(!is_out_of_bounds(Vec2::new(19.0, 5.0), drift, &bounds));
        assert!(is_out_of_bounds(Vec2::new(-1.5, 5.0), drift, &bounds));
        assert!(is_out_of_bounds(Vec2::new(8.0, 11.5), drift, &bounds));
        assert!(is_out_of_bounds(Vec2::new(8.0, -1.5), drift, &bounds));
    }

    #[test]
    fn test_bullet_culled_on_every_edge() {
        let bounds = cull_bounds();
        let linear = Motion::Linear { vel: Vec2::X };
        assert!(is_out_of_bounds(Vec2::new(18.5, 5.0), linear, &bounds));
        assert!(is_out_of_bounds(Vec2::new(-1.5, 5.0), linear, &bounds));
        assert!(!is_out_of_bounds(Vec2::new(17.9, 10.9), linear, &bounds));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut world = World::new();
        let id = world.spawn(EntityKind::Enemy(EnemySize::Small), Vec2::new(5.0, 5.0));
        assert!(world.destroy(id));
        assert!(!world.destroy(id));
        assert!(world.live(id).is_none());
        assert_eq!(world.sweep().len(), 1);
        assert!(!world.destroy(id));
        assert!(world.is_empty());
    }

    #[test]
    fn test_cull_then_sweep() {
        let mut world = World::new();
        let inside = world.spawn(EntityKind::Star(StarSize::Normal), Vec2::new(5.0, 5.0));
        world.spawn(EntityKind::Bullet { hostile: false }, Vec2::new(30.0, 5.0));
        assert_eq!(world.cull_out_of_bounds(), 1);
        let removed = world.sweep();
        assert_eq!(removed.len(), 1);
        assert!(world.get(inside).is_some());
    }

    #[test]
    fn test_enemy_gun_fires_on_interval() {
        let mut gun = EnemyGun::new(0.5, 1.5);
        assert!(!gun.advance(0.4));
        assert!(gun.advance(0.2));
        assert!(!gun.advance(1.0));
        assert!(gun.advance(0.6));
    }

    #[test]
    fn test_hulls_only_on_destructibles() {
        assert!(EntityKind::Star(StarSize::Big).hull().is_none());
        assert!(EntityKind::Bullet { hostile: true }.hull().is_none());
        assert_eq!(EntityKind::Enemy(EnemySize::Big).hull().unwrap().max_health(), 3);
        assert!(EntityKind::Hazard.is_destructible());
    }
}
