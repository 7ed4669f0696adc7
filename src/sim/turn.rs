//! Turn and charge controller
//!
//! Input handlers run synchronously between ticks. Each takes the whole
//! `GameState` explicitly; none of them can fail. Inputs aimed at a tank that
//! no longer exists hand the turn to the survivor or are dropped.

use glam::Vec2;

use super::state::{Bullet, ChargeState, GameEvent, GameState, TANK_IDS, Tank, TankId};
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::direction_from_degrees;

/// Discrete player inputs delivered by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    AimLeft,
    AimRight,
    /// Fire held down
    ChargeStart,
    /// Fire released
    ChargeRelease,
    SwitchTurn,
    Reset,
}

/// Dispatch one input to its handler
pub fn handle_input(state: &mut GameState, event: InputEvent, clock: &dyn Clock) {
    match event {
        InputEvent::AimLeft => aim_left(state),
        InputEvent::AimRight => aim_right(state),
        InputEvent::ChargeStart => charge_start(state, clock),
        InputEvent::ChargeRelease => {
            charge_release(state, clock);
        }
        InputEvent::SwitchTurn => switch_turn(state),
        InputEvent::Reset => state.reset(),
    }
}

/// Hand the turn to `id`, dropping any charge from the previous tank
fn set_active(state: &mut GameState, id: TankId) {
    state.active_tank_id = id;
    state.charge = ChargeState::Idle;
    state.events.push(GameEvent::TurnChanged { active_tank_id: id });
}

/// Pass the turn to the first survivor if the active tank is gone
pub fn hand_over_if_destroyed(state: &mut GameState) {
    if state.active_tank().is_some() {
        return;
    }
    let Some(survivor) = state.tanks.first().map(|t| t.id) else {
        return;
    };
    log::info!(
        "Tank {} is gone, turn passes to tank {}",
        state.active_tank_id,
        survivor
    );
    set_active(state, survivor);
}

/// Make sure the active tank still exists
///
/// Returns `false` when it did not, so the triggering input is consumed.
fn ensure_active_tank(state: &mut GameState) -> bool {
    if state.active_tank().is_some() {
        return true;
    }
    hand_over_if_destroyed(state);
    false
}

/// Whether a press-type input should be acted on
fn accepts_press(state: &mut GameState) -> bool {
    !state.is_over() && ensure_active_tank(state)
}

fn aim_by(state: &mut GameState, delta: f32) {
    if !accepts_press(state) {
        return;
    }
    let id = state.active_tank_id;
    if let Some(tank) = state.tank_mut(id) {
        tank.turret_angle += delta;
    }
}

/// Rotate the active turret counter-clockwise on screen
pub fn aim_left(state: &mut GameState) {
    let step = state.config.angle_step;
    aim_by(state, -step);
}

/// Rotate the active turret clockwise on screen
pub fn aim_right(state: &mut GameState) {
    let step = state.config.angle_step;
    aim_by(state, step);
}

/// Begin charging a shot; ignored if a charge is already running
pub fn charge_start(state: &mut GameState, clock: &dyn Clock) {
    if !accepts_press(state) || state.charge.is_charging() {
        return;
    }
    state.charge = ChargeState::Charging {
        started_ms: clock.now_ms(),
    };
}

/// Release a charging shot and fire it
///
/// Returns the new bullet's id, or `None` when nothing was fired (not
/// charging, game over, or the active tank is gone).
pub fn charge_release(state: &mut GameState, clock: &dyn Clock) -> Option<u32> {
    if state.is_over() {
        return None;
    }
    let ChargeState::Charging { started_ms } = state.charge else {
        return None;
    };
    let Some(tank) = state.active_tank() else {
        log::warn!("Fire released with no active tank");
        state.charge = ChargeState::Idle;
        return None;
    };

    let ratio = charge_ratio_between(&state.config, started_ms, clock.now_ms());
    let speed = shot_speed(&state.config, ratio);
    let (pos, vel) = launch_vector(tank, speed, state.config.barrel_length);
    let owner_id = tank.id;

    state.charge = ChargeState::Idle;
    let id = state.next_bullet_id();
    state.bullets.push(Bullet {
        id,
        pos,
        vel,
        owner_id,
    });
    state.events.push(GameEvent::BulletFired {
        bullet_id: id,
        owner_id,
        speed,
    });
    log::debug!("Tank {owner_id} fired bullet {id} at speed {speed:.2} ({:.0}% charge)", ratio * 100.0);
    Some(id)
}

/// Pass the turn to the other tank
pub fn switch_turn(state: &mut GameState) {
    if !accepts_press(state) {
        return;
    }
    let next = if state.active_tank_id == TANK_IDS[0] {
        TANK_IDS[1]
    } else {
        TANK_IDS[0]
    };
    set_active(state, next);
}

/// Fraction of full power reached after holding from `started_ms` to `now_ms`
pub fn charge_ratio_between(config: &GameConfig, started_ms: f64, now_ms: f64) -> f32 {
    let elapsed = (now_ms - started_ms).max(0.0);
    (elapsed / config.max_charge_duration_ms).min(1.0) as f32
}

/// Current charge of the active tank in `[0, 1]` (0 when not charging)
pub fn charge_ratio(state: &GameState, now_ms: f64) -> f32 {
    match state.charge {
        ChargeState::Charging { started_ms } => charge_ratio_between(&state.config, started_ms, now_ms),
        ChargeState::Idle => 0.0,
    }
}

/// Muzzle speed for a charge ratio (linear between min and max)
pub fn shot_speed(config: &GameConfig, ratio: f32) -> f32 {
    let ratio = ratio.clamp(0.0, 1.0);
    config.min_bullet_speed + (config.max_bullet_speed - config.min_bullet_speed) * ratio
}

/// Spawn position (barrel tip) and velocity for a shot from `tank`
pub fn launch_vector(tank: &Tank, speed: f32, barrel_length: f32) -> (Vec2, Vec2) {
    let dir = direction_from_degrees(tank.turret_angle);
    (tank.pos + dir * barrel_length, dir * speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sim::state::GamePhase;
    use crate::sim::terrain::Terrain;
    use proptest::prelude::*;

    fn flat_state() -> GameState {
        let config = GameConfig::default();
        let terrain = Terrain::flat(800, 500.0, config.height);
        GameState::with_terrain(terrain, config)
    }

    #[test]
    fn test_aim_is_unbounded() {
        let mut state = flat_state();
        for _ in 0..80 {
            aim_right(&mut state);
        }
        // -45 + 80 * 5
        assert_eq!(state.tanks[0].turret_angle, 355.0);
        aim_right(&mut state);
        assert_eq!(state.tanks[0].turret_angle, 360.0);
        aim_right(&mut state);
        assert_eq!(state.tanks[0].turret_angle, 365.0);

        for _ in 0..100 {
            aim_left(&mut state);
        }
        assert_eq!(state.tanks[0].turret_angle, -135.0);
        // Other tank untouched
        assert_eq!(state.tanks[1].turret_angle, -135.0);
    }

    #[test]
    fn test_charge_start_is_not_reentrant() {
        let mut state = flat_state();
        let clock = ManualClock::new(1000.0);
        charge_start(&mut state, &clock);
        clock.advance(500.0);
        charge_start(&mut state, &clock);
        assert_eq!(state.charge, ChargeState::Charging { started_ms: 1000.0 });
        assert!((charge_ratio(&state, clock.now_ms()) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_charge_ratio_caps_at_one() {
        let mut state = flat_state();
        let clock = ManualClock::new(0.0);
        charge_start(&mut state, &clock);
        assert_eq!(charge_ratio(&state, 0.0), 0.0);
        assert_eq!(charge_ratio(&state, 1500.0), 1.0);
        assert_eq!(charge_ratio(&state, 10_000.0), 1.0);
    }

    #[test]
    fn test_shot_speed_endpoints() {
        let config = GameConfig::default();
        assert_eq!(shot_speed(&config, 0.0), config.min_bullet_speed);
        assert_eq!(shot_speed(&config, 1.0), config.max_bullet_speed);
        assert_eq!(shot_speed(&config, 0.5), 6.5);
    }

    #[test]
    fn test_release_without_charge_is_noop() {
        let mut state = flat_state();
        let clock = ManualClock::new(0.0);
        assert_eq!(charge_release(&mut state, &clock), None);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_release_fires_from_barrel_tip() {
        let mut state = flat_state();
        state.tanks[0].turret_angle = 0.0;
        let clock = ManualClock::new(0.0);
        charge_start(&mut state, &clock);
        clock.advance(1500.0);
        let id = charge_release(&mut state, &clock).expect("bullet fired");

        assert_eq!(state.charge, ChargeState::Idle);
        assert_eq!(state.bullets.len(), 1);
        let bullet = &state.bullets[0];
        assert_eq!(bullet.id, id);
        assert_eq!(bullet.owner_id, 1);
        assert!((bullet.pos.x - 140.0).abs() < 1e-4);
        assert!((bullet.pos.y - 485.0).abs() < 1e-4);
        assert!((bullet.vel.x - 10.0).abs() < 1e-4);
        assert!(bullet.vel.y.abs() < 1e-4);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::BulletFired { owner_id: 1, .. })
        ));
    }

    #[test]
    fn test_release_half_charge_midpoint_speed() {
        let mut state = flat_state();
        let clock = ManualClock::new(0.0);
        charge_start(&mut state, &clock);
        clock.advance(750.0);
        charge_release(&mut state, &clock);
        let speed = state.bullets[0].vel.length();
        assert!((speed - 6.5).abs() < 1e-4);
    }

    #[test]
    fn test_switch_turn_toggles() {
        let mut state = flat_state();
        switch_turn(&mut state);
        assert_eq!(state.active_tank_id, 2);
        switch_turn(&mut state);
        assert_eq!(state.active_tank_id, 1);
    }

    #[test]
    fn test_switch_turn_drops_pending_charge() {
        let mut state = flat_state();
        let clock = ManualClock::new(0.0);
        charge_start(&mut state, &clock);
        switch_turn(&mut state);
        assert_eq!(state.charge, ChargeState::Idle);
        assert_eq!(charge_release(&mut state, &clock), None);
    }

    #[test]
    fn test_input_on_destroyed_tank_passes_turn() {
        let mut state = flat_state();
        state.tanks.retain(|t| t.id != 1);
        let before = state.tanks[0].turret_angle;

        aim_left(&mut state);
        // Input consumed by the hand-over
        assert_eq!(state.active_tank_id, 2);
        assert_eq!(state.tanks[0].turret_angle, before);

        aim_left(&mut state);
        assert_eq!(state.tanks[0].turret_angle, before - 5.0);
    }

    #[test]
    fn test_release_after_active_tank_destroyed_clears_charge() {
        let mut state = flat_state();
        let clock = ManualClock::new(0.0);
        charge_start(&mut state, &clock);
        state.tanks.retain(|t| t.id != 1);
        clock.advance(600.0);

        assert_eq!(charge_release(&mut state, &clock), None);
        assert_eq!(state.charge, ChargeState::Idle);
        assert!(state.bullets.is_empty());
        assert_eq!(charge_ratio(&state, clock.now_ms()), 0.0);
    }

    #[test]
    fn test_switch_turn_with_destroyed_active_goes_to_survivor() {
        let mut state = flat_state();
        state.active_tank_id = 2;
        state.tanks.retain(|t| t.id != 2);
        switch_turn(&mut state);
        assert_eq!(state.active_tank_id, 1);
    }

    #[test]
    fn test_inputs_ignored_after_game_over() {
        let mut state = flat_state();
        let clock = ManualClock::new(0.0);
        state.phase = GamePhase::GameOver;
        handle_input(&mut state, InputEvent::AimRight, &clock);
        handle_input(&mut state, InputEvent::ChargeStart, &clock);
        handle_input(&mut state, InputEvent::SwitchTurn, &clock);
        assert_eq!(state.tanks[0].turret_angle, -45.0);
        assert_eq!(state.charge, ChargeState::Idle);
        assert_eq!(state.active_tank_id, 1);

        handle_input(&mut state, InputEvent::Reset, &clock);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    proptest! {
        #[test]
        fn prop_shot_speed_is_linear(ratio in 0.0f32..=1.0) {
            let config = GameConfig::default();
            let expected = config.min_bullet_speed
                + (config.max_bullet_speed - config.min_bullet_speed) * ratio;
            prop_assert!((shot_speed(&config, ratio) - expected).abs() < 1e-5);
        }

        #[test]
        fn prop_launch_speed_matches_charge(angle in -720.0f32..720.0, held in 0.0f64..3000.0) {
            let mut state = flat_state();
            state.tanks[0].turret_angle = angle;
            let clock = ManualClock::new(0.0);
            charge_start(&mut state, &clock);
            clock.advance(held);
            charge_release(&mut state, &clock);

            let config = &state.config;
            let ratio = (held / config.max_charge_duration_ms).min(1.0) as f32;
            let bullet = &state.bullets[0];
            prop_assert!((bullet.vel.length() - shot_speed(config, ratio)).abs() < 1e-3);
            prop_assert!(((bullet.pos - state.tanks[0].pos).length() - config.barrel_length).abs() < 1e-3);
        }
    }
}
