//! Tank Duel - A two-player artillery game
//!
//! Core modules:
//! - `sim`: Simulation (terrain, ballistics, turns, game state)
//! - `clock`: Injected time source for shot charging
//! - `config`: Data-driven game tuning
//! - `error`: Config and startup errors
//! - `renderer`: Canvas 2D painting (browser only)

pub mod clock;
pub mod config;
pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod sim;

pub use clock::{Clock, ManualClock};
pub use config::{GameConfig, TerrainParams};
pub use error::{ConfigError, StartupError};

/// Game configuration constants (reference tuning, used as config defaults)
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per reference frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playing field dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Tank body dimensions
    pub const TANK_WIDTH: f32 = 50.0;
    pub const TANK_HEIGHT: f32 = 30.0;
    pub const BARREL_LENGTH: f32 = 40.0;
    /// Horizontal distance of each tank from its side of the field
    pub const TANK_START_INSET: f32 = 100.0;

    pub const BULLET_RADIUS: f32 = 5.0;
    /// Degrees per aim adjustment
    pub const ANGLE_STEP: f32 = 5.0;

    /// Shot speed range (pixels per tick)
    pub const MIN_BULLET_SPEED: f32 = 3.0;
    pub const MAX_BULLET_SPEED: f32 = 10.0;
    /// Hold time for a full-power shot
    pub const MAX_CHARGE_DURATION_MS: f64 = 1500.0;
    /// Added to vertical velocity every tick (screen y grows downward)
    pub const GRAVITY: f32 = 0.1;

    pub const INITIAL_TANK_HEALTH: i32 = 100;
    pub const BULLET_DAMAGE: i32 = 25;

    /// Half-width of the window used to measure terrain slope
    pub const SLOPE_SAMPLE_OFFSET: f32 = 5.0;
}

/// Normalize an angle in degrees to [0, 360) for display.
///
/// Physics always uses the raw turret angle; this is presentation only.
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit direction for an angle in degrees (screen coordinates, y down)
#[inline]
pub fn direction_from_degrees(degrees: f32) -> glam::Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    glam::Vec2::new(cos, sin)
}
