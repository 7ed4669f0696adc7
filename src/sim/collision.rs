//! Collision tests for bullets
//!
//! Bullets are treated as squares of side `2 * radius` against axis-aligned
//! tank boxes. Tank body rotation is cosmetic and ignored here.

use glam::Vec2;

/// Axis-aligned box given by its min and max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap test (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// Check whether a bullet's bounding square overlaps a tank body
pub fn bullet_hits_tank(bullet_pos: Vec2, bullet_radius: f32, tank_center: Vec2, tank_size: Vec2) -> bool {
    let bullet = Aabb::from_center(bullet_pos, Vec2::splat(bullet_radius * 2.0));
    let tank = Aabb::from_center(tank_center, tank_size);
    bullet.overlaps(&tank)
}

/// Check whether a bullet has struck the ground surface
///
/// `surface` is the terrain height under the bullet; screen y grows down.
#[inline]
pub fn bullet_hits_ground(bullet_pos: Vec2, surface: f32) -> bool {
    bullet_pos.y > surface
}

/// Check whether a bullet center has left the field grown by one radius
pub fn bullet_out_of_bounds(bullet_pos: Vec2, bullet_radius: f32, field: Vec2) -> bool {
    let inside = bullet_pos.x > -bullet_radius
        && bullet_pos.x < field.x + bullet_radius
        && bullet_pos.y > -bullet_radius
        && bullet_pos.y < field.y + bullet_radius;
    !inside
}
