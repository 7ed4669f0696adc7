//! Game tuning
//!
//! Every gameplay constant lives in `GameConfig`. Defaults come from
//! `crate::consts`; a page can override any subset with an inline JSON block.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Widest field accepted (one heightmap column per pixel)
pub const MAX_FIELD_WIDTH: f32 = 10_000.0;

/// Randomization ranges for the terrain generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Base height as a fraction of field height `[min, max)`
    pub base_fraction: (f32, f32),
    /// Main hill amplitude in pixels
    pub main_amplitude: (f32, f32),
    /// Main hill wavelength in pixels
    pub main_wavelength: (f32, f32),
    /// Roughness amplitude in pixels
    pub detail_amplitude: (f32, f32),
    /// Roughness wavelength in pixels
    pub detail_wavelength: (f32, f32),
    /// Per-column jitter is drawn from `[-jitter/2, jitter/2)`
    pub jitter: f32,
    /// Tilt slope in pixels per column
    pub tilt: (f32, f32),
    /// Lowest allowed surface height as a fraction of field height
    pub min_height_fraction: f32,
    /// Gap kept under the surface at the bottom, in tank heights
    pub floor_clearance_tanks: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base_fraction: (0.7, 0.8),
            main_amplitude: (60.0, 100.0),
            main_wavelength: (150.0, 250.0),
            detail_amplitude: (15.0, 30.0),
            detail_wavelength: (40.0, 70.0),
            jitter: 5.0,
            tilt: (-0.05, 0.05),
            min_height_fraction: 0.35,
            floor_clearance_tanks: 1.5,
        }
    }
}

/// Complete gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub tank_width: f32,
    pub tank_height: f32,
    pub barrel_length: f32,
    pub tank_start_inset: f32,
    pub bullet_radius: f32,
    pub angle_step: f32,
    pub min_bullet_speed: f32,
    pub max_bullet_speed: f32,
    pub max_charge_duration_ms: f64,
    pub gravity: f32,
    pub initial_health: i32,
    pub bullet_damage: i32,
    /// Starting turret angle for tank 1 and tank 2 (degrees)
    pub start_turret_angles: [f32; 2],
    /// CSS colors for tank 1 and tank 2
    pub tank_colors: [String; 2],
    pub terrain: TerrainParams,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
            tank_width: TANK_WIDTH,
            tank_height: TANK_HEIGHT,
            barrel_length: BARREL_LENGTH,
            tank_start_inset: TANK_START_INSET,
            bullet_radius: BULLET_RADIUS,
            angle_step: ANGLE_STEP,
            min_bullet_speed: MIN_BULLET_SPEED,
            max_bullet_speed: MAX_BULLET_SPEED,
            max_charge_duration_ms: MAX_CHARGE_DURATION_MS,
            gravity: GRAVITY,
            initial_health: INITIAL_TANK_HEALTH,
            bullet_damage: BULLET_DAMAGE,
            start_turret_angles: [-45.0, -135.0],
            tank_colors: ["royalblue".to_string(), "firebrick".to_string()],
            terrain: TerrainParams::default(),
        }
    }
}

impl GameConfig {
    /// Element id of the optional inline config block
    #[cfg(target_arch = "wasm32")]
    const CONFIG_ELEMENT_ID: &'static str = "game-config";

    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Lowest surface the terrain generator may produce
    pub fn min_terrain_height(&self) -> f32 {
        self.height * self.terrain.min_height_fraction
    }

    /// Highest surface the terrain generator may produce
    pub fn max_terrain_height(&self) -> f32 {
        self.height - self.tank_height * self.terrain.floor_clearance_tanks
    }

    /// Horizontal start positions for tank 1 and tank 2
    pub fn tank_start_xs(&self) -> [f32; 2] {
        [self.tank_start_inset, self.width - self.tank_start_inset]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width >= 1.0 && self.width <= MAX_FIELD_WIDTH) {
            return Err(ConfigError::invalid(
                "width",
                format!("must be between 1 and {MAX_FIELD_WIDTH}"),
            ));
        }
        if !(self.height > 0.0) {
            return Err(ConfigError::invalid("height", "must be positive"));
        }
        if !(self.tank_width > 0.0 && self.tank_height > 0.0) {
            return Err(ConfigError::invalid("tank_width", "tank size must be positive"));
        }
        if !(self.barrel_length > 0.0) {
            return Err(ConfigError::invalid("barrel_length", "must be positive"));
        }
        if !(self.angle_step > 0.0) {
            return Err(ConfigError::invalid("angle_step", "must be positive"));
        }
        if self.bullet_damage <= 0 {
            return Err(ConfigError::invalid("bullet_damage", "must be positive"));
        }
        if !(self.bullet_radius > 0.0) {
            return Err(ConfigError::invalid("bullet_radius", "must be positive"));
        }
        if !(self.min_bullet_speed >= 0.0 && self.min_bullet_speed <= self.max_bullet_speed) {
            return Err(ConfigError::invalid(
                "min_bullet_speed",
                format!(
                    "expected 0 <= min ({}) <= max ({})",
                    self.min_bullet_speed, self.max_bullet_speed
                ),
            ));
        }
        if !(self.max_charge_duration_ms > 0.0) {
            return Err(ConfigError::invalid("max_charge_duration_ms", "must be positive"));
        }
        if self.initial_health <= 0 {
            return Err(ConfigError::invalid("initial_health", "must be positive"));
        }
        if !(self.tank_start_inset >= 0.0 && self.tank_start_inset * 2.0 < self.width) {
            return Err(ConfigError::invalid(
                "tank_start_inset",
                "tanks must start inside the field on opposite sides",
            ));
        }
        if !(self.min_terrain_height() <= self.max_terrain_height()) {
            return Err(ConfigError::invalid(
                "terrain",
                format!(
                    "empty height range [{}, {}]",
                    self.min_terrain_height(),
                    self.max_terrain_height()
                ),
            ));
        }
        let ranges = [
            ("terrain.base_fraction", self.terrain.base_fraction),
            ("terrain.main_amplitude", self.terrain.main_amplitude),
            ("terrain.main_wavelength", self.terrain.main_wavelength),
            ("terrain.detail_amplitude", self.terrain.detail_amplitude),
            ("terrain.detail_wavelength", self.terrain.detail_wavelength),
            ("terrain.tilt", self.terrain.tilt),
        ];
        for (field, (lo, hi)) in ranges {
            if !(lo <= hi) {
                return Err(ConfigError::invalid(field, format!("range [{lo}, {hi}) is reversed")));
            }
        }
        if !(self.terrain.main_wavelength.0 > 0.0 && self.terrain.detail_wavelength.0 > 0.0) {
            return Err(ConfigError::invalid("terrain", "wavelengths must be positive"));
        }
        Ok(())
    }

    /// Load config from the page's inline JSON block (WASM only)
    ///
    /// A missing block means defaults. A malformed one is reported and ignored.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = text {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded game config from #{}", Self::CONFIG_ELEMENT_ID);
                    return config;
                }
                Err(e) => log::warn!("Ignoring game config: {e}"),
            }
        }

        log::info!("Using default game config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_terrain_height(), 210.0);
        assert_eq!(config.max_terrain_height(), 555.0);
        assert_eq!(config.tank_start_xs(), [100.0, 700.0]);
    }

    #[test]
    fn test_partial_json_override() {
        let config = GameConfig::from_json(r#"{ "gravity": 0.2, "terrain": { "jitter": 0.0 } }"#)
            .expect("valid override");
        assert_eq!(config.gravity, 0.2);
        assert_eq!(config.terrain.jitter, 0.0);
        // Untouched fields keep their defaults
        assert_eq!(config.width, GAME_WIDTH);
        assert_eq!(config.terrain.main_amplitude, (60.0, 100.0));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = GameConfig::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let err = GameConfig::from_json(r#"{ "min_bullet_speed": 12.0 }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "min_bullet_speed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    fn rejected_field(json: &str) -> &'static str {
        match GameConfig::from_json(json) {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected a validation error for {json}, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_positive_gameplay_values() {
        assert_eq!(rejected_field(r#"{ "bullet_damage": 0 }"#), "bullet_damage");
        assert_eq!(rejected_field(r#"{ "bullet_damage": -25 }"#), "bullet_damage");
        assert_eq!(rejected_field(r#"{ "angle_step": -5.0 }"#), "angle_step");
        assert_eq!(rejected_field(r#"{ "angle_step": 0.0 }"#), "angle_step");
        assert_eq!(rejected_field(r#"{ "barrel_length": -40.0 }"#), "barrel_length");
    }

    #[test]
    fn test_rejects_oversized_field() {
        assert_eq!(rejected_field(r#"{ "width": 1e30 }"#), "width");
        let widest = format!(r#"{{ "width": {MAX_FIELD_WIDTH} }}"#);
        assert!(GameConfig::from_json(&widest).is_ok());
    }

    #[test]
    fn test_rejects_reversed_tilt() {
        assert_eq!(
            rejected_field(r#"{ "terrain": { "tilt": [0.05, -0.05] } }"#),
            "terrain.tilt"
        );
    }

    #[test]
    fn test_rejects_empty_terrain_range() {
        let err = GameConfig::from_json(r#"{ "height": 40.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "terrain", .. }));
    }
}
