//! Sky, terrain, tanks and bullets on a 2D canvas

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::config::GameConfig;
use crate::sim::{Snapshot, TankView};

const SKY_COLOR: &str = "#87CEEB";
const TERRAIN_COLOR: &str = "#654321";
const BULLET_COLOR: &str = "#222222";
const BARREL_COLOR: &str = "#333333";
const HEALTH_COLOR: &str = "#ffffff";
/// Visual thickness of a barrel
const BARREL_VISUAL_HEIGHT: f64 = 8.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    tank_width: f64,
    tank_height: f64,
    barrel_length: f64,
    bullet_radius: f64,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, config: &GameConfig) -> Self {
        Self {
            ctx,
            tank_width: config.tank_width as f64,
            tank_height: config.tank_height as f64,
            barrel_length: config.barrel_length as f64,
            bullet_radius: config.bullet_radius as f64,
        }
    }

    /// Draw one full frame
    pub fn render(&self, snap: &Snapshot<'_>) -> Result<(), JsValue> {
        self.draw_background(snap);
        for tank in &snap.tanks {
            self.draw_tank(tank)?;
        }
        self.ctx.set_fill_style_str(BULLET_COLOR);
        for bullet in &snap.bullets {
            self.ctx.begin_path();
            self.ctx.arc(
                bullet.x as f64,
                bullet.y as f64,
                self.bullet_radius,
                0.0,
                std::f64::consts::TAU,
            )?;
            self.ctx.fill();
        }
        Ok(())
    }

    fn draw_background(&self, snap: &Snapshot<'_>) {
        let (w, h) = (snap.width as f64, snap.height as f64);
        self.ctx.set_fill_style_str(SKY_COLOR);
        self.ctx.fill_rect(0.0, 0.0, w, h);

        self.ctx.set_fill_style_str(TERRAIN_COLOR);
        self.ctx.begin_path();
        self.ctx.move_to(0.0, h);
        for (x, &y) in snap.terrain.iter().enumerate() {
            self.ctx.line_to(x as f64, y as f64);
        }
        self.ctx.line_to(w, h);
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn draw_tank(&self, tank: &TankView) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(tank.x as f64, tank.y as f64)?;

        // Body follows the ground
        ctx.rotate((tank.body_angle as f64).to_radians())?;
        ctx.set_fill_style_str(&tank.color);
        ctx.fill_rect(
            -self.tank_width / 2.0,
            -self.tank_height / 2.0,
            self.tank_width,
            self.tank_height,
        );

        // Barrel angle is absolute, so undo the body tilt
        ctx.rotate(((tank.heading - tank.body_angle) as f64).to_radians())?;
        ctx.set_fill_style_str(BARREL_COLOR);
        ctx.fill_rect(
            0.0,
            -BARREL_VISUAL_HEIGHT / 2.0,
            self.barrel_length,
            BARREL_VISUAL_HEIGHT,
        );
        ctx.restore();

        ctx.set_fill_style_str(HEALTH_COLOR);
        ctx.set_font("14px sans-serif");
        ctx.set_text_align("center");
        ctx.fill_text(
            &tank.health.to_string(),
            tank.x as f64,
            tank.y as f64 - self.tank_height / 2.0 - 6.0,
        )?;
        Ok(())
    }
}
