//! Read-only view of the game for the presentation layer

use serde::Serialize;

use super::state::{GamePhase, GameState, Outcome, TankId};
use super::turn::charge_ratio;
use crate::normalize_degrees;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankView {
    pub id: TankId,
    pub x: f32,
    pub y: f32,
    pub body_angle: f32,
    pub turret_angle: f32,
    /// Turret angle wrapped into `[0, 360)` for display
    pub heading: f32,
    /// Never negative
    pub health: i32,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// Everything needed to redraw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<'a> {
    /// Seed of the session's terrain stream
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    pub terrain: &'a [f32],
    pub tanks: Vec<TankView>,
    pub bullets: Vec<BulletView>,
    pub active_tank_id: TankId,
    /// Whether the active tank is still on the field
    pub active_tank_alive: bool,
    /// Current shot power in `[0, 1]`
    pub charge_ratio: f32,
    pub phase: GamePhase,
    pub outcome: Option<Outcome>,
}

impl GameState {
    /// Capture the current state; `now_ms` drives the charge meter
    pub fn snapshot(&self, now_ms: f64) -> Snapshot<'_> {
        Snapshot {
            seed: self.seed,
            width: self.config.width,
            height: self.config.height,
            terrain: self.terrain.heights(),
            tanks: self
                .tanks
                .iter()
                .map(|t| TankView {
                    id: t.id,
                    x: t.pos.x,
                    y: t.pos.y,
                    body_angle: t.body_angle,
                    turret_angle: t.turret_angle,
                    heading: normalize_degrees(t.turret_angle),
                    health: t.display_health(),
                    color: t.color.clone(),
                })
                .collect(),
            bullets: self
                .bullets
                .iter()
                .map(|b| BulletView {
                    id: b.id,
                    x: b.pos.x,
                    y: b.pos.y,
                })
                .collect(),
            active_tank_id: self.active_tank_id,
            active_tank_alive: self.active_tank().is_some(),
            charge_ratio: charge_ratio(self, now_ms),
            phase: self.phase,
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::{Clock, ManualClock};
    use crate::config::GameConfig;
    use crate::sim::state::GameState;
    use crate::sim::terrain::Terrain;
    use crate::sim::turn::charge_start;

    #[test]
    fn test_snapshot_reflects_state() {
        let config = GameConfig::default();
        let mut state = GameState::with_terrain(Terrain::flat(800, 500.0, config.height), config);
        state.tanks[1].health = -10;

        let clock = ManualClock::new(0.0);
        charge_start(&mut state, &clock);
        clock.advance(300.0);

        let snap = state.snapshot(clock.now_ms());
        assert_eq!(snap.terrain.len(), 800);
        assert_eq!(snap.tanks.len(), 2);
        assert_eq!(snap.tanks[1].health, 0);
        assert_eq!(snap.tanks[0].x, 100.0);
        assert_eq!(snap.tanks[0].y, 485.0);
        assert!((snap.charge_ratio - 0.2).abs() < 1e-6);
        assert!(snap.active_tank_alive);
        assert!(snap.bullets.is_empty());
        assert_eq!(snap.seed, 0);
    }

    #[test]
    fn test_snapshot_wraps_turret_heading() {
        let mut state = GameState::new(99, GameConfig::default());
        state.tanks[0].turret_angle = 370.0;

        let snap = state.snapshot(0.0);
        assert_eq!(snap.seed, 99);
        // Raw angle is kept, heading is wrapped
        assert_eq!(snap.tanks[0].turret_angle, 370.0);
        assert_eq!(snap.tanks[0].heading, 10.0);
        assert_eq!(snap.tanks[1].heading, 225.0);
    }

    #[test]
    fn test_snapshot_serializes_for_js() {
        let config = GameConfig::default();
        let state = GameState::with_terrain(Terrain::flat(4, 500.0, config.height), config);
        let json = serde_json::to_value(state.snapshot(0.0)).expect("serialize");
        assert_eq!(json["active_tank_id"], 1);
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["tanks"][1]["color"], "firebrick");
        assert_eq!(json["tanks"][0]["heading"], 315.0);
        assert_eq!(json["seed"], 0);
    }
}
