//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`. The presentation
//! layer reads it through `GameState::snapshot` and never holds references
//! into entities.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;
use crate::config::GameConfig;

/// Tank identifier (1 or 2)
pub type TankId = u8;

/// Ids of the two players, in turn order
pub const TANK_IDS: [TankId; 2] = [1, 2];

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Tanks are alive and ticks advance
    Playing,
    /// Match decided; ticks and inputs are ignored until reset
    GameOver,
}

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(TankId),
    /// Both tanks destroyed in the same tick
    Draw,
}

/// A player tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub id: TankId,
    /// Body center; x is fixed for the whole game
    pub pos: Vec2,
    /// Chassis rotation matching the ground slope (degrees, cosmetic)
    pub body_angle: f32,
    /// Firing direction in degrees from horizontal, never wrapped
    pub turret_angle: f32,
    /// May go negative; clamp only for display
    pub health: i32,
    /// CSS color for the presentation layer
    pub color: String,
}

impl Tank {
    /// Place a tank on the ground at `x`
    ///
    /// The body sits on the surface (center half a tank height above it) and
    /// is tilted to the local slope.
    pub fn spawn(id: TankId, x: f32, turret_angle: f32, color: &str, terrain: &Terrain, config: &GameConfig) -> Self {
        Self {
            id,
            pos: Vec2::new(x, terrain.height_at(x) - config.tank_height / 2.0),
            body_angle: terrain.slope_angle_at(x),
            turret_angle,
            health: config.initial_health,
            color: color.to_string(),
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Health as shown to players
    pub fn display_health(&self) -> i32 {
        self.health.max(0)
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per tick; y grows each tick under gravity
    pub vel: Vec2,
    /// Tank that fired this bullet; it can never hit its owner
    pub owner_id: TankId,
}

/// Shot charge for the active tank
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ChargeState {
    #[default]
    Idle,
    /// Fire is held down since `started_ms`
    Charging { started_ms: f64 },
}

impl ChargeState {
    pub fn is_charging(&self) -> bool {
        matches!(self, ChargeState::Charging { .. })
    }
}

/// Something that happened during an input or tick, for presentation and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BulletFired {
        bullet_id: u32,
        owner_id: TankId,
        speed: f32,
    },
    TankHit {
        tank_id: TankId,
        bullet_id: u32,
        owner_id: TankId,
        health: i32,
    },
    BulletLanded {
        bullet_id: u32,
        pos: Vec2,
    },
    BulletLeftField {
        bullet_id: u32,
    },
    TankDestroyed {
        tank_id: TankId,
    },
    TurnChanged {
        active_tank_id: TankId,
    },
    GameOver {
        outcome: Outcome,
    },
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Tuning in effect for this session
    pub config: GameConfig,
    /// Seed the terrain RNG was created from
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    rng: Pcg32,
    /// Ground for the current game
    pub terrain: Terrain,
    /// Surviving tanks, in creation order
    pub tanks: Vec<Tank>,
    /// Bullets in flight, in firing order
    pub bullets: Vec<Bullet>,
    /// Tank allowed to aim and fire
    pub active_tank_id: TankId,
    pub charge: ChargeState,
    pub phase: GamePhase,
    /// Set once when entering GameOver
    pub outcome: Option<Outcome>,
    /// Ticks since the current game started
    pub time_ticks: u64,
    /// Events not yet drained by the presentation
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_bullet_id: u32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl GameState {
    /// Start a new session; terrain is drawn from `seed`
    pub fn new(seed: u64, config: GameConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = Terrain::generate(&config, &mut rng);
        let mut state = Self::with_terrain(terrain, config);
        state.seed = seed;
        state.rng = rng;
        state
    }

    /// Start a session on prepared ground (scripted scenarios, tests)
    pub fn with_terrain(terrain: Terrain, config: GameConfig) -> Self {
        let mut state = Self {
            config,
            seed: 0,
            rng: default_rng(),
            terrain,
            tanks: Vec::new(),
            bullets: Vec::new(),
            active_tank_id: TANK_IDS[0],
            charge: ChargeState::Idle,
            phase: GamePhase::Playing,
            outcome: None,
            time_ticks: 0,
            events: Vec::new(),
            next_bullet_id: 1,
        };
        state.spawn_tanks();
        state
    }

    /// Place both tanks at their start columns on the current terrain
    fn spawn_tanks(&mut self) {
        let xs = self.config.tank_start_xs();
        self.tanks = TANK_IDS
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                Tank::spawn(
                    id,
                    xs[i],
                    self.config.start_turret_angles[i],
                    &self.config.tank_colors[i],
                    &self.terrain,
                    &self.config,
                )
            })
            .collect();
    }

    /// Start a new game: fresh terrain, full-health tanks, tank 1 to move
    pub fn reset(&mut self) {
        self.terrain = Terrain::generate(&self.config, &mut self.rng);
        self.bullets.clear();
        self.spawn_tanks();
        self.active_tank_id = TANK_IDS[0];
        self.charge = ChargeState::Idle;
        self.phase = GamePhase::Playing;
        self.outcome = None;
        self.time_ticks = 0;
        self.events.clear();
        log::info!("New game started (session seed {})", self.seed);
    }

    /// Allocate a bullet ID
    pub fn next_bullet_id(&mut self) -> u32 {
        let id = self.next_bullet_id;
        self.next_bullet_id += 1;
        id
    }

    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        self.tanks.iter().find(|t| t.id == id)
    }

    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.iter_mut().find(|t| t.id == id)
    }

    /// The tank whose turn it is, if it is still alive
    pub fn active_tank(&self) -> Option<&Tank> {
        self.tank(self.active_tank_id)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
