//! The flapping entity
//!
//! Velocity and position only change through [`Entity::apply_gravity`],
//! [`Entity::flap`] and [`Entity::update_position`], or on [`Entity::reset`].
//! Bounds are not clamped here; the tick decides what leaving the play area
//! means.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Player-controlled body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Center of the body
    pos: Vec2,
    /// Vertical velocity (positive = falling)
    velocity: f32,
    half_extent: f32,
    start: Vec2,
}

impl Entity {
    pub fn new(tuning: &Tuning) -> Self {
        let start = Vec2::new(tuning.start_x, tuning.start_y);
        Self {
            pos: start,
            velocity: 0.0,
            half_extent: tuning.entity_half_extent(),
            start,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn apply_gravity(&mut self, gravity: f32) {
        self.velocity += gravity;
    }

    /// Overwrite velocity with the impulse (not additive)
    pub fn flap(&mut self, impulse: f32) {
        self.velocity = impulse;
    }

    /// Integrate once per tick, after gravity and any flap
    pub fn update_position(&mut self) {
        self.pos.y += self.velocity;
    }

    /// Back to the start position, at rest
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.velocity = 0.0;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.half_extent))
    }

    /// Place the entity somewhere else (tests and scenario setup only)
    #[cfg(test)]
    pub(crate) fn place(&mut self, pos: Vec2, velocity: f32) {
        self.pos = pos;
        self.velocity = velocity;
    }
}
