//! Per-run simulation state
//!
//! Everything a single run mutates lives in [`RunState`]. It is created when
//! a countdown starts and dropped on return to idle.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::Entity;
use super::obstacle::{self, Difficulty, ObstaclePair};
use crate::tuning::Tuning;

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub score: u32,
    pub entity: Entity,
    /// Live obstacle pairs, oldest (leftmost) first
    pub obstacles: Vec<ObstaclePair>,
    /// Flap requested since the last tick
    pub flap_queued: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl RunState {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            score: 0,
            entity: Entity::new(tuning),
            obstacles: Vec::new(),
            flap_queued: false,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Clear obstacles and put the entity and score back to their start values
    pub fn reset(&mut self) {
        self.score = 0;
        self.entity.reset();
        self.obstacles.clear();
        self.flap_queued = false;
        self.time_ticks = 0;
    }

    /// Spawn one obstacle pair sized for the current score
    pub fn spawn_obstacle(&mut self, tuning: &Tuning) -> &ObstaclePair {
        let id = self.next_id;
        self.next_id += 1;
        let pair = obstacle::generate(
            &mut self.rng,
            tuning,
            id,
            tuning.play_area_height,
            self.score,
        );
        log::debug!(
            "Spawned obstacle {} (gap {:.0}, top {:.0}, {})",
            pair.id,
            pair.gap_height,
            pair.top_height,
            pair.difficulty.as_str()
        );
        self.obstacles.push(pair);
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Difficulty of the gap the next spawn would get
    pub fn difficulty(&self, tuning: &Tuning) -> Difficulty {
        Difficulty::classify(obstacle::gap_height(tuning, self.score), tuning)
    }

    /// Number of obstacles spawned this run
    pub fn spawned(&self) -> u32 {
        self.next_id - 1
    }
}
