//! Fixed timestep simulation tick
//!
//! Advances one run by exactly one step. The caller only invokes this while
//! the session is running; a crash is reported back, not handled here.

use super::state::RunState;
use crate::tuning::Tuning;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    /// The entity's box left the vertical play area
    OutOfBounds,
    /// The entity's box overlapped a segment of this pair
    Obstacle { id: u32 },
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// This many pairs were cleared during the tick
    Scored(u32),
    Crashed(CrashCause),
}

/// Advance the run by one fixed timestep
pub fn tick(run: &mut RunState, tuning: &Tuning) -> TickOutcome {
    run.time_ticks += 1;

    // Physics: gravity, then the queued flap, then integrate
    run.entity.apply_gravity(tuning.gravity);
    if std::mem::take(&mut run.flap_queued) {
        run.entity.flap(tuning.flap_impulse);
    }
    run.entity.update_position();

    let body = run.entity.bounds();
    if !body.within_vertical(0.0, tuning.play_area_height) {
        return TickOutcome::Crashed(CrashCause::OutOfBounds);
    }

    for pair in &mut run.obstacles {
        pair.advance(tuning.scroll_speed);
    }

    for pair in &run.obstacles {
        if body.intersects(&pair.top_segment())
            || body.intersects(&pair.bottom_segment(tuning.play_area_height))
        {
            return TickOutcome::Crashed(CrashCause::Obstacle { id: pair.id });
        }
    }

    // One point per pair, tracked on the pair itself
    let entity_x = run.entity.pos().x;
    let mut cleared = 0;
    for pair in run.obstacles.iter_mut().filter(|p| !p.passed) {
        if pair.trailing_edge() < entity_x {
            pair.passed = true;
            cleared += 1;
        }
    }
    run.score += cleared;

    run.obstacles.retain(|p| !p.is_off_screen());

    if cleared > 0 {
        TickOutcome::Scored(cleared)
    } else {
        TickOutcome::Continue
    }
}
