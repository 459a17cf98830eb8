//! Combat mediation
//!
//! Turns overlap reports into effects: identify both participants' roles,
//! ask the damage taxonomy what the contact does, then apply it to health,
//! score and the world. Participants that already left play (or are marked
//! to leave) make the contact a no-op.

use std::collections::HashSet;

use super::collision::Overlap;
use super::damage::{Effect, FRIENDLY_BULLET_DAMAGE, Role, collectible_award, resolve};
use super::entity::EntityId;
use super::state::{GamePhase, GameState};
use crate::audio::SoundEffect;
use crate::events::GameEvent;

/// Which side of a contact acts on which
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Contact {
    /// Projectile carrying the hit, if any
    attacker: Option<(EntityId, Role)>,
    defender: (EntityId, Role),
}

/// Order a pair into attacker/defender. Collectible pickups come first,
/// then bullets, then direct contact with the player.
fn classify(a: (EntityId, Role), b: (EntityId, Role)) -> Option<Contact> {
    use Role::*;
    match (a.1, b.1) {
        (Player, Collectible(_)) | (Player, Destructible(_)) => Some(Contact {
            attacker: None,
            defender: b,
        }),
        (Collectible(_), Player) | (Destructible(_), Player) => Some(Contact {
            attacker: None,
            defender: a,
        }),
        (Bullet { .. }, Bullet { .. }) => None,
        (Bullet { .. }, _) => Some(Contact {
            attacker: Some(a),
            defender: b,
        }),
        (_, Bullet { .. }) => Some(Contact {
            attacker: Some(b),
            defender: a,
        }),
        _ => None,
    }
}

/// Resolve one reported overlap and return the effect that was applied
pub fn resolve_overlap(state: &mut GameState, a: EntityId, b: EntityId) -> Effect {
    let (Some(role_a), Some(role_b)) = (state.role_of(a), state.role_of(b)) else {
        return Effect::NoEffect;
    };
    let Some(contact) = classify((a, role_a), (b, role_b)) else {
        return Effect::NoEffect;
    };

    let effect = resolve(contact.attacker.map(|(_, role)| role), contact.defender.1);
    let defender = contact.defender.0;
    match effect {
        Effect::NoEffect => {}
        Effect::CollectNoDamage => collect(state, defender),
        Effect::DamagePlayer(amount) => {
            if let Some((bullet, _)) = contact.attacker {
                state.world.destroy(bullet);
            }
            damage_player(state, amount);
        }
        Effect::DestroyBullet => {
            if let Some((bullet, _)) = contact.attacker {
                state.world.destroy(bullet);
            }
            damage_destructible(state, defender, FRIENDLY_BULLET_DAMAGE);
        }
        Effect::DamageAndDestroyDefender(amount) => {
            if state.world.destroy(defender) {
                state.events.push(GameEvent::Sound(SoundEffect::EnemyDestroyed));
            }
            damage_player(state, amount);
        }
    }
    effect
}

/// Resolve a batch of overlaps; each pair is handled at most once
pub fn resolve_overlaps(state: &mut GameState, overlaps: &[Overlap]) -> Vec<Effect> {
    let mut seen = HashSet::new();
    let mut applied = Vec::new();
    for overlap in overlaps {
        let pair = Overlap::new(overlap.a, overlap.b);
        if !seen.insert(pair) {
            continue;
        }
        let effect = resolve_overlap(state, pair.a, pair.b);
        if effect != Effect::NoEffect {
            applied.push(effect);
        }
    }
    applied
}

fn collect(state: &mut GameState, star: EntityId) {
    let Some(entity) = state.world.live(star) else {
        return;
    };
    let Role::Collectible(size) = Role::of(entity.kind) else {
        return;
    };
    let pos = entity.pos;
    if !state.world.destroy(star) {
        return;
    }

    let (points, stars) = collectible_award(size);
    let awarded = state.score.add_score(points);
    state.score.add_stars(stars);
    log::debug!("Collected {:?} star: +{} points, +{} stars", size, awarded, stars);
    state.events.extend([
        GameEvent::ScorePopup {
            amount: awarded,
            pos,
        },
        GameEvent::ScoreDisplay {
            score: state.score.score(),
        },
        GameEvent::StarsDisplay {
            count: state.score.stars(),
        },
    ]);
}

fn damage_destructible(state: &mut GameState, id: EntityId, amount: u32) {
    let Some(entity) = state.world.get_mut(id) else {
        return;
    };
    if !entity.is_live() {
        return;
    }
    let pos = entity.pos;
    let kind = entity.kind;
    let Some(value) = entity.hull.as_mut().and_then(|hull| hull.take_damage(amount)) else {
        return;
    };
    state.world.destroy(id);

    let awarded = state.score.add_score(value);
    log::debug!("Destroyed {:?} #{}: +{} points", kind, id, awarded);
    state.events.extend([
        GameEvent::ScorePopup {
            amount: awarded,
            pos,
        },
        GameEvent::ScoreDisplay {
            score: state.score.score(),
        },
        GameEvent::Sound(SoundEffect::EnemyDestroyed),
    ]);
}

fn damage_player(state: &mut GameState, amount: u32) {
    if !state.ship.alive {
        return;
    }
    let report = state.health.take_damage(amount);
    state.events.push(GameEvent::HealthDisplay {
        current: state.health.current(),
        max: state.health.max(),
    });

    if report.low_health_warning {
        log::info!("Low health: {} left", state.health.current());
        state.events.extend([
            GameEvent::StatusMessage {
                text: "LOW HEALTH!".to_string(),
                duration: 0.0,
                permanent: true,
                blinking: true,
            },
            GameEvent::Sound(SoundEffect::LowHealthLoopStart),
        ]);
    }

    if report.died {
        state.ship.alive = false;
        state.phase = GamePhase::GameOver;
        log::info!(
            "Player destroyed on wave {} with score {}",
            state.wave().wave + 1,
            state.score.score()
        );
        state.events.extend([
            GameEvent::StatusMessage {
                text: "GAME OVER".to_string(),
                duration: 0.0,
                permanent: true,
                blinking: false,
            },
            GameEvent::PlayerDied {
                score: state.score.score(),
                wave: state.wave().wave,
            },
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{AsteroidSize, EnemySize, EntityKind, StarSize};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn playing() -> GameState {
        let mut state = GameState::new(5, Tuning::default());
        state.start_session();
        state.drain_events();
        state
    }

    fn spawn(state: &mut GameState, kind: EntityKind) -> EntityId {
        state.world.spawn(kind, Vec2::new(8.0, 5.0))
    }

    #[test]
    fn test_friendly_bullet_removes_one_point_from_any_destructible() {
        for kind in [
            EntityKind::Enemy(EnemySize::Small),
            EntityKind::Enemy(EnemySize::Big),
            EntityKind::Asteroid(AsteroidSize::Small),
            EntityKind::Asteroid(AsteroidSize::Normal),
            EntityKind::Asteroid(AsteroidSize::Large),
            EntityKind::Hazard,
        ] {
            let mut state = playing();
            let target = spawn(&mut state, kind);
            let bullet = spawn(&mut state, EntityKind::Bullet { hostile: false });
            let before = state.world.get(target).unwrap().hull.unwrap().current();

            let effect = resolve_overlap(&mut state, bullet, target);
            assert_eq!(effect, Effect::DestroyBullet);
            assert!(state.world.live(bullet).is_none());
            let after = state.world.get(target).unwrap().hull.unwrap().current();
            assert_eq!(before - after, 1, "{:?}", kind);
        }
    }

    #[test]
    fn test_kill_awards_multiplied_score() {
        let mut state = playing();
        state.score.set_multiplier(1.3);
        let enemy = spawn(&mut state, EntityKind::Enemy(EnemySize::Small));
        let bullet = spawn(&mut state, EntityKind::Bullet { hostile: false });
        resolve_overlap(&mut state, enemy, bullet);

        assert!(state.world.live(enemy).is_none());
        assert_eq!(state.score.score(), 130);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::EnemyDestroyed)));
        assert!(events.contains(&GameEvent::ScorePopup {
            amount: 130,
            pos: Vec2::new(8.0, 5.0)
        }));
    }

    #[test]
    fn test_hostile_bullet_hits_player() {
        let mut state = playing();
        let bullet = spawn(&mut state, EntityKind::Bullet { hostile: true });
        let ship = state.ship.id;
        assert_eq!(resolve_overlap(&mut state, ship, bullet), Effect::DamagePlayer(2));
        assert_eq!(state.health.current(), 13);
        assert!(state.world.live(bullet).is_none());
    }

    #[test]
    fn test_hostile_bullet_ignores_destructibles() {
        let mut state = playing();
        let rock = spawn(&mut state, EntityKind::Asteroid(AsteroidSize::Large));
        let bullet = spawn(&mut state, EntityKind::Bullet { hostile: true });
        assert_eq!(resolve_overlap(&mut state, bullet, rock), Effect::NoEffect);
        assert!(state.world.live(bullet).is_some());
    }

    #[test]
    fn test_ram_unclassified_hazard_deals_default() {
        let mut state = playing();
        let hazard = spawn(&mut state, EntityKind::Hazard);
        let ship = state.ship.id;
        let effect = resolve_overlap(&mut state, hazard, ship);
        assert_eq!(effect, Effect::DamageAndDestroyDefender(3));
        assert_eq!(state.health.current(), 12);
        assert!(state.world.live(hazard).is_none());
        assert_eq!(state.score.score(), 0);
    }

    #[test]
    fn test_ram_uses_specific_asteroid_damage() {
        let mut state = playing();
        let rock = spawn(&mut state, EntityKind::Asteroid(AsteroidSize::Large));
        let ship = state.ship.id;
        resolve_overlap(&mut state, ship, rock);
        assert_eq!(state.health.current(), 8);
    }

    #[test]
    fn test_collect_star_without_damage() {
        let mut state = playing();
        let star = spawn(&mut state, EntityKind::Star(StarSize::Big));
        let ship = state.ship.id;
        assert_eq!(resolve_overlap(&mut state, star, ship), Effect::CollectNoDamage);
        assert_eq!(state.health.current(), 15);
        assert_eq!(state.score.score(), 150);
        assert_eq!(state.score.stars(), 2);
        assert!(state.world.live(star).is_none());
        // A second report of the same contact is a no-op
        assert_eq!(resolve_overlap(&mut state, star, ship), Effect::NoEffect);
        assert_eq!(state.score.stars(), 2);
    }

    #[test]
    fn test_duplicate_pairs_resolve_once() {
        let mut state = playing();
        let rock = spawn(&mut state, EntityKind::Asteroid(AsteroidSize::Large));
        let first = spawn(&mut state, EntityKind::Bullet { hostile: false });
        let overlaps = [
            Overlap::new(first, rock),
            Overlap::new(rock, first),
            Overlap::new(first, rock),
        ];
        let applied = resolve_overlaps(&mut state, &overlaps);
        assert_eq!(applied, vec![Effect::DestroyBullet]);
        assert_eq!(state.world.get(rock).unwrap().hull.unwrap().current(), 2);
    }

    #[test]
    fn test_two_bullets_same_tick_on_one_hull() {
        let mut state = playing();
        let enemy = spawn(&mut state, EntityKind::Enemy(EnemySize::Small));
        let b1 = spawn(&mut state, EntityKind::Bullet { hostile: false });
        let b2 = spawn(&mut state, EntityKind::Bullet { hostile: false });
        let applied = resolve_overlaps(
            &mut state,
            &[Overlap::new(b1, enemy), Overlap::new(b2, enemy)],
        );
        // Second bullet finds the enemy already pending removal
        assert_eq!(applied.len(), 1);
        assert!(state.world.live(b2).is_some());
        assert_eq!(state.score.score(), 100);
    }

    #[test]
    fn test_death_stops_damage() {
        let mut state = playing();
        let ship = state.ship.id;
        for _ in 0..3 {
            let rock = spawn(&mut state, EntityKind::Asteroid(AsteroidSize::Large));
            resolve_overlap(&mut state, ship, rock);
        }
        assert_eq!(state.health.current(), 0);
        assert!(!state.ship.alive);
        assert_eq!(state.phase, GamePhase::GameOver);

        let events = state.drain_events();
        let deaths = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerDied { .. }))
            .count();
        let warnings = events
            .iter()
            .filter(|e| **e == GameEvent::Sound(SoundEffect::LowHealthLoopStart))
            .count();
        assert_eq!(deaths, 1);
        assert_eq!(warnings, 1);

        let bullet = spawn(&mut state, EntityKind::Bullet { hostile: true });
        assert_eq!(resolve_overlap(&mut state, ship, bullet), Effect::NoEffect);
        assert!(state.world.live(bullet).is_some());
    }

    #[test]
    fn test_stale_handles_are_noop() {
        let mut state = playing();
        assert_eq!(resolve_overlap(&mut state, 999, 1000), Effect::NoEffect);
        let enemy = spawn(&mut state, EntityKind::Enemy(EnemySize::Small));
        state.world.destroy(enemy);
        let ship = state.ship.id;
        assert_eq!(resolve_overlap(&mut state, ship, enemy), Effect::NoEffect);
        assert_eq!(state.health.current(), 15);
    }
}
