//! Simulation module
//!
//! All gameplay logic lives here. This module must stay presentation-free:
//! - Per-tick constants only (no wall-clock reads; time arrives via `Clock`)
//! - One owned `GameState`, mutated only through inputs and `tick`
//! - Stable iteration order (creation order for tanks and bullets)

pub mod collision;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod turn;

pub use collision::{Aabb, bullet_hits_ground, bullet_hits_tank, bullet_out_of_bounds};
pub use snapshot::{BulletView, Snapshot, TankView};
pub use state::{Bullet, ChargeState, GameEvent, GamePhase, GameState, Outcome, TANK_IDS, Tank, TankId};
pub use terrain::Terrain;
pub use tick::tick;
pub use turn::{
    InputEvent, aim_left, aim_right, charge_ratio, charge_release, charge_start, handle_input,
    launch_vector, shot_speed, switch_turn,
};
