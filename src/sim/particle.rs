//! Disk particles and per-tick integration

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A moving disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Constant per particle (gravity lives on the y component)
    pub acc: Vec2,
    pub radius: f32,
    /// Display only, ignored by physics
    pub color: u32,
}

impl Particle {
    pub fn new(pos: Vec2, radius: f32, color: u32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            radius,
            color,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.acc = Vec2::new(0.0, gravity);
        self
    }

    /// Advance one tick (semi-implicit Euler) then bounce off the arena walls
    pub fn step(&mut self, width: f32, height: f32) {
        self.vel += self.acc;
        self.pos += self.vel;
        self.reflect_off_walls(width, height);
    }

    /// Clamp inside `[r, extent - r]` per axis, negating the velocity component
    /// of any axis that was crossed. Walls are perfectly elastic.
    pub fn reflect_off_walls(&mut self, width: f32, height: f32) {
        let r = self.radius;

        if self.pos.x - r < 0.0 {
            self.pos.x = r;
            self.vel.x = -self.vel.x;
        } else if self.pos.x + r > width {
            self.pos.x = width - r;
            self.vel.x = -self.vel.x;
        }

        if self.pos.y - r < 0.0 {
            self.pos.y = r;
            self.vel.y = -self.vel.y;
        } else if self.pos.y + r > height {
            self.pos.y = height - r;
            self.vel.y = -self.vel.y;
        }
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.vel.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HEIGHT, WIDTH};
    use proptest::prelude::*;

    #[test]
    fn test_step_applies_acceleration_before_position() {
        let mut p = Particle::new(Vec2::new(100.0, 100.0), 2.0, 0).with_gravity(1.0);
        p.step(WIDTH, HEIGHT);
        assert_eq!(p.vel, Vec2::new(0.0, 1.0));
        assert_eq!(p.pos, Vec2::new(100.0, 101.0));
        p.step(WIDTH, HEIGHT);
        assert_eq!(p.pos, Vec2::new(100.0, 103.0));
    }

    #[test]
    fn test_left_wall_reflection() {
        let mut p = Particle::new(Vec2::new(5.0, 300.0), 4.0, 0).with_velocity(Vec2::new(-3.0, 0.0));
        p.step(WIDTH, HEIGHT);
        assert_eq!(p.pos.x, 4.0);
        assert_eq!(p.vel.x, 3.0);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn test_floor_reflection_keeps_speed() {
        let mut p = Particle::new(Vec2::new(400.0, HEIGHT - 3.0), 2.0, 0)
            .with_velocity(Vec2::new(1.0, 4.0));
        p.step(WIDTH, HEIGHT);
        assert_eq!(p.pos.y, HEIGHT - 2.0);
        assert_eq!(p.vel, Vec2::new(1.0, -4.0));
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let mut p = Particle::new(Vec2::new(WIDTH - 1.0, 1.0), 2.0, 0)
            .with_velocity(Vec2::new(5.0, -5.0));
        p.step(WIDTH, HEIGHT);
        assert_eq!(p.pos, Vec2::new(WIDTH - 2.0, 2.0));
        assert_eq!(p.vel, Vec2::new(-5.0, 5.0));
    }

    proptest! {
        #[test]
        fn prop_step_stays_in_bounds(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            vx in -100.0f32..100.0,
            vy in -100.0f32..100.0,
            radius in 1.0f32..30.0,
            gravity in 0.0f32..2.0,
        ) {
            let mut p = Particle::new(Vec2::new(x, y), radius, 0)
                .with_velocity(Vec2::new(vx, vy))
                .with_gravity(gravity);
            for _ in 0..10 {
                p.step(WIDTH, HEIGHT);
                prop_assert!(p.pos.x >= radius && p.pos.x <= WIDTH - radius);
                prop_assert!(p.pos.y >= radius && p.pos.y <= HEIGHT - radius);
            }
        }
    }
}
