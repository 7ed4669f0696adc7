//! Per-tick simulation
//!
//! Advances bullets, resolves hits, removes destroyed tanks and decides
//! when the match is over. Constants are per tick, not per second: the
//! driver is expected to call `tick` at a fixed rate.

use glam::Vec2;

use super::collision::{bullet_hits_ground, bullet_hits_tank, bullet_out_of_bounds};
use super::state::{GameEvent, GamePhase, GameState, Outcome};
use super::turn::hand_over_if_destroyed;

/// Why a bullet stopped flying this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BulletFate {
    Flying,
    Landed,
    HitTank,
    LeftField,
}

/// Advance the game state by one tick
///
/// Does nothing once the game is over.
pub fn tick(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.time_ticks += 1;

    update_bullets(state);
    remove_destroyed_tanks(state);
    hand_over_if_destroyed(state);
    check_game_over(state);
}

/// Move every bullet one step and resolve its collisions
///
/// Tanks are only damaged here, never removed, so every bullet sees the same
/// tank set and hits from several bullets accumulate.
fn update_bullets(state: &mut GameState) {
    let config = &state.config;
    let gravity = config.gravity;
    let radius = config.bullet_radius;
    let tank_size = Vec2::new(config.tank_width, config.tank_height);
    let field = Vec2::new(config.width, config.height);
    let damage = config.bullet_damage;

    let terrain = &state.terrain;
    let tanks = &mut state.tanks;
    let events = &mut state.events;

    state.bullets.retain_mut(|bullet| {
        // Explicit Euler: position first, then gravity
        bullet.pos += bullet.vel;
        bullet.vel.y += gravity;

        let mut fate = BulletFate::Flying;

        if bullet_hits_ground(bullet.pos, terrain.height_at(bullet.pos.x)) {
            fate = BulletFate::Landed;
        }

        if fate == BulletFate::Flying {
            let target = tanks
                .iter_mut()
                .filter(|tank| tank.id != bullet.owner_id)
                .find(|tank| bullet_hits_tank(bullet.pos, radius, tank.pos, tank_size));
            if let Some(tank) = target {
                tank.health -= damage;
                fate = BulletFate::HitTank;
                log::debug!(
                    "Tank {} hit by bullet {} from tank {}, health {}",
                    tank.id,
                    bullet.id,
                    bullet.owner_id,
                    tank.health
                );
                events.push(GameEvent::TankHit {
                    tank_id: tank.id,
                    bullet_id: bullet.id,
                    owner_id: bullet.owner_id,
                    health: tank.health,
                });
            }
        }

        if fate == BulletFate::Flying && bullet_out_of_bounds(bullet.pos, radius, field) {
            fate = BulletFate::LeftField;
        }

        match fate {
            BulletFate::Flying => true,
            BulletFate::Landed => {
                events.push(GameEvent::BulletLanded {
                    bullet_id: bullet.id,
                    pos: bullet.pos,
                });
                false
            }
            BulletFate::LeftField => {
                events.push(GameEvent::BulletLeftField { bullet_id: bullet.id });
                false
            }
            BulletFate::HitTank => false,
        }
    });
}

/// Drop tanks whose health ran out
fn remove_destroyed_tanks(state: &mut GameState) {
    let events = &mut state.events;
    state.tanks.retain(|tank| {
        if tank.is_destroyed() {
            log::info!("Tank {} destroyed", tank.id);
            events.push(GameEvent::TankDestroyed { tank_id: tank.id });
            false
        } else {
            true
        }
    });
}

/// Enter GameOver once at most one tank survives
fn check_game_over(state: &mut GameState) {
    if state.phase != GamePhase::Playing || state.tanks.len() > 1 {
        return;
    }
    let outcome = match state.tanks.as_slice() {
        [survivor] => Outcome::Winner(survivor.id),
        _ => Outcome::Draw,
    };
    state.phase = GamePhase::GameOver;
    state.outcome = Some(outcome);
    state.events.push(GameEvent::GameOver { outcome });
    match outcome {
        Outcome::Winner(id) => log::info!("Game over: player {id} wins"),
        Outcome::Draw => log::info!("Game over: draw"),
    }
}
