//! Damage taxonomy
//!
//! Maps kind tags to damage values and decides what a contact between two
//! participants does. Lookups go through the kind tag assigned at spawn, so
//! a small asteroid can never be mistaken for the generic class.

use serde::{Deserialize, Serialize};

use super::entity::{AsteroidSize, EnemySize, EntityKind, StarSize};

/// Damage a hostile bullet deals to the player
pub const HOSTILE_BULLET_DAMAGE: u32 = 2;
/// Damage a friendly bullet deals to any destructible
pub const FRIENDLY_BULLET_DAMAGE: u32 = 1;
/// Ram damage for destructibles without a damage class
pub const DEFAULT_RAM_DAMAGE: u32 = 3;

/// Role of a collision participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Bullet { hostile: bool },
    Destructible(EntityKind),
    Collectible(StarSize),
}

impl Role {
    pub fn of(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Bullet { hostile } => Role::Bullet { hostile },
            EntityKind::Star(size) => Role::Collectible(size),
            EntityKind::Enemy(_) | EntityKind::Asteroid(_) | EntityKind::Hazard => {
                Role::Destructible(kind)
            }
        }
    }
}

/// Outcome of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    NoEffect,
    /// Friendly bullet is consumed and the destructible loses
    /// [`FRIENDLY_BULLET_DAMAGE`]
    DestroyBullet,
    /// Hostile bullet is consumed and the player loses the amount
    DamagePlayer(u32),
    /// Player rammed the defender: the player loses the amount and the
    /// defender is destroyed outright
    DamageAndDestroyDefender(u32),
    /// Player picked up a collectible
    CollectNoDamage,
}

/// Damage a destructible deals when it rams the player
pub fn ram_damage(kind: EntityKind) -> u32 {
    match kind {
        EntityKind::Asteroid(AsteroidSize::Small) => 3,
        EntityKind::Asteroid(AsteroidSize::Normal) => 5,
        EntityKind::Asteroid(AsteroidSize::Large) => 7,
        EntityKind::Enemy(EnemySize::Small) => 4,
        EntityKind::Enemy(EnemySize::Big) => 6,
        _ => DEFAULT_RAM_DAMAGE,
    }
}

/// Resolve what `attacker` does to `defender`.
///
/// `attacker` is the projectile carrying the hit, or `None` for direct body
/// contact with the player.
pub fn resolve(attacker: Option<Role>, defender: Role) -> Effect {
    match (attacker, defender) {
        (None, Role::Collectible(_)) => Effect::CollectNoDamage,
        (None, Role::Destructible(kind)) => Effect::DamageAndDestroyDefender(ram_damage(kind)),
        (Some(Role::Bullet { hostile: true }), Role::Player) => {
            Effect::DamagePlayer(HOSTILE_BULLET_DAMAGE)
        }
        (Some(Role::Bullet { hostile: false }), Role::Destructible(_)) => Effect::DestroyBullet,
        _ => Effect::NoEffect,
    }
}

/// Score and star award of a collectible
pub fn collectible_award(size: StarSize) -> (u32, u32) {
    match size {
        StarSize::Normal => (75, 1),
        StarSize::Big => (150, 2),
        StarSize::Bigger => (300, 5),
    }
}
