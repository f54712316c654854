//! Idle/demo mode: a simple bot that decides when to flap
//!
//! Aims to stay just above the bottom of the next gap. A flap carries the
//! entity up by a fixed arc, so hugging the lower edge leaves the most room.

use super::state::RunState;
use crate::tuning::Tuning;

/// Clearance kept between the entity and the bottom segment
const BOTTOM_CLEARANCE: f32 = 6.0;

/// Vertical position the bot tries to stay above
pub fn target_y(run: &RunState, tuning: &Tuning) -> f32 {
    let half = tuning.entity_half_extent();
    let left = run.entity.pos().x - half;

    run.obstacles
        .iter()
        .find(|p| p.trailing_edge() >= left)
        .map(|p| {
            let center = p.top_height + p.gap_height / 2.0;
            let floor = p.bottom_start_y - half - BOTTOM_CLEARANCE;
            (center + p.gap_height / 4.0).min(floor)
        })
        .unwrap_or(tuning.play_area_height / 2.0)
}

/// Whether to flap before the next tick
pub fn decide(run: &RunState, tuning: &Tuning) -> bool {
    let next_v = run.entity.velocity() + tuning.gravity;
    let next_y = run.entity.pos().y + next_v;
    next_v > 0.0 && next_y > target_y(run, tuning)
}
