//! Gap obstacles and the difficulty curve
//!
//! The gap shrinks linearly with score until it reaches the configured
//! minimum. Where the gap sits vertically is drawn from the run's seeded RNG,
//! so a seed replays the same obstacle stream.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Display-only label for how far along the gap curve a pair is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    /// Bucket a gap height by how much of the shrinkable range is used up.
    /// Thresholds are inclusive on the harder side.
    pub fn classify(gap_height: f32, tuning: &Tuning) -> Self {
        let range = tuning.initial_gap - tuning.minimum_gap;
        if range <= 0.0 {
            return Difficulty::Extreme;
        }
        let fraction = (tuning.initial_gap - gap_height) / range;
        if fraction < 0.3 {
            Difficulty::Easy
        } else if fraction < 0.6 {
            Difficulty::Medium
        } else if fraction < 0.9 {
            Difficulty::Hard
        } else {
            Difficulty::Extreme
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }
}

/// Gap height for a given score
pub fn gap_height(tuning: &Tuning, score: u32) -> f32 {
    if score == 0 {
        return tuning.initial_gap;
    }
    let shrunk = tuning.initial_gap - score as f32 * tuning.gap_decrease_per_point;
    shrunk.max(tuning.minimum_gap)
}

/// A top and bottom segment with a gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Top segment spans `0..top_height`
    pub top_height: f32,
    pub gap_height: f32,
    /// Bottom segment spans `bottom_start_y..play_area_height`
    pub bottom_start_y: f32,
    /// Set once the entity has cleared this pair
    pub passed: bool,
    pub difficulty: Difficulty,
}

impl ObstaclePair {
    /// Right edge
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    pub fn top_segment(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, 0.0),
            Vec2::new(self.trailing_edge(), self.top_height),
        )
    }

    pub fn bottom_segment(&self, play_area_height: f32) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, self.bottom_start_y),
            Vec2::new(self.trailing_edge(), play_area_height),
        )
    }

    pub fn is_off_screen(&self) -> bool {
        self.trailing_edge() < 0.0
    }
}

/// Build a new obstacle pair at the right edge of the play area
pub fn generate<R: Rng>(
    rng: &mut R,
    tuning: &Tuning,
    id: u32,
    play_area_height: f32,
    current_score: u32,
) -> ObstaclePair {
    let gap = gap_height(tuning, current_score);

    let min_top = tuning.min_top_height;
    let max_top = play_area_height - gap - tuning.bottom_margin;
    // rand panics on a non-finite range
    let top_height = if min_top.is_finite() && max_top.is_finite() && max_top > min_top {
        rng.random_range(min_top..=max_top)
    } else {
        log::debug!(
            "Obstacle {} has no vertical slack (max top {:.1} <= min top {:.1})",
            id,
            max_top,
            min_top
        );
        min_top
    };

    ObstaclePair {
        id,
        x: tuning.play_area_width,
        width: tuning.obstacle_width,
        top_height,
        gap_height: gap,
        bottom_start_y: top_height + gap,
        passed: false,
        difficulty: Difficulty::classify(gap, tuning),
    }
}
