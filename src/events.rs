//! Event scheduling
//!
//! The host calls [`Scheduler::advance`] once per frame with wall-clock time.
//! It turns that time into discrete events on a single FIFO queue: fixed-step
//! ticks while running, obstacle spawns on a tick-counted cadence, and
//! once-per-second countdown steps. Nothing mutates game state except the
//! code draining that queue, one event at a time.

use std::collections::VecDeque;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::session::Phase;
use crate::tuning::Tuning;

/// Something the session must react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player input; applied at the start of the next tick
    Flap,
    /// One fixed simulation step
    Tick,
    /// Spawn interval elapsed
    SpawnTimer,
    /// One countdown second elapsed
    CountdownTimer,
}

impl GameEvent {
    /// Produced by timers (as opposed to input)
    pub fn is_timer(&self) -> bool {
        !matches!(self, GameEvent::Flap)
    }
}

/// Serialized queue of pending events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    /// Drop everything still pending; returns how many were dropped
    pub fn clear(&mut self) -> usize {
        let dropped = self.events.len();
        self.events.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Turns elapsed time into timer events for the current phase
#[derive(Debug, Default)]
pub struct Scheduler {
    /// Phase the timers are currently armed for
    armed_for: Option<Phase>,
    tick_accumulator: f32,
    countdown_accumulator: f32,
    /// Ticks run since the run started
    run_ticks: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disarm all timers and forget accumulated time
    pub fn stop(&mut self) {
        if self.armed_for.is_some() {
            log::debug!("Timers stopped");
        }
        *self = Self::default();
    }

    /// Number of ticks between obstacle spawns
    pub fn spawn_every_ticks(tuning: &Tuning) -> u64 {
        ((tuning.spawn_interval_secs * tuning.tick_rate as f32).round() as u64).max(1)
    }

    /// Queue the events that `dt` seconds produce in `phase`
    pub fn advance(&mut self, dt: f32, phase: Phase, tuning: &Tuning, queue: &mut EventQueue) {
        if self.armed_for != Some(phase) {
            self.stop();
            if matches!(phase, Phase::Countdown | Phase::Running) {
                self.armed_for = Some(phase);
            }
        }

        // Clamp long frames (tab switches, breakpoints)
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };

        match phase {
            Phase::Countdown => {
                self.countdown_accumulator += dt;
                while self.countdown_accumulator >= 1.0 {
                    self.countdown_accumulator -= 1.0;
                    queue.push(GameEvent::CountdownTimer);
                }
            }
            Phase::Running => {
                let step = tuning.tick_dt();
                let spawn_every = Self::spawn_every_ticks(tuning);
                self.tick_accumulator += dt;

                let mut substeps = 0;
                while self.tick_accumulator >= step && substeps < MAX_SUBSTEPS {
                    if self.run_ticks % spawn_every == 0 {
                        queue.push(GameEvent::SpawnTimer);
                    }
                    queue.push(GameEvent::Tick);
                    self.run_ticks += 1;
                    self.tick_accumulator -= step;
                    substeps += 1;
                }
                // Drop time we could not catch up on
                if substeps == MAX_SUBSTEPS {
                    self.tick_accumulator = self.tick_accumulator.min(step);
                }
            }
            Phase::Idle | Phase::GameOver => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut EventQueue) -> Vec<GameEvent> {
        std::iter::from_fn(|| queue.pop()).collect()
    }

    #[test]
    fn test_countdown_once_per_second() {
        let tuning = Tuning::default();
        let mut scheduler = Scheduler::new();
        let mut queue = EventQueue::new();

        for _ in 0..9 {
            scheduler.advance(0.1, Phase::Countdown, &tuning, &mut queue);
        }
        assert!(queue.is_empty());
        scheduler.advance(0.1 + 1e-4, Phase::Countdown, &tuning, &mut queue);
        assert_eq!(drain(&mut queue), vec![GameEvent::CountdownTimer]);
    }

    #[test]
    fn test_running_emits_fixed_steps() {
        let tuning = Tuning::default();
        let mut scheduler = Scheduler::new();
        let mut queue = EventQueue::new();

        // Just over three steps at 60 Hz
        scheduler.advance(3.0 / 60.0 + 1e-4, Phase::Running, &tuning, &mut queue);
        let events = drain(&mut queue);
        let ticks = events.iter().filter(|e| **e == GameEvent::Tick).count();
        assert_eq!(ticks, 3);
        // First spawn comes before the first tick
        assert_eq!(events[0], GameEvent::SpawnTimer);
        assert_eq!(events[1], GameEvent::Tick);
    }

    #[test]
    fn test_spawn_cadence_in_ticks() {
        let tuning = Tuning::default();
        let every = Scheduler::spawn_every_ticks(&tuning);
        assert_eq!(every, 150);

        let mut scheduler = Scheduler::new();
        let mut queue = EventQueue::new();
        let mut spawns = Vec::new();
        let mut ticks = 0u64;
        for _ in 0..400 {
            scheduler.advance(1.0 / 60.0 + 1e-6, Phase::Running, &tuning, &mut queue);
            for event in drain(&mut queue) {
                match event {
                    GameEvent::SpawnTimer => spawns.push(ticks),
                    GameEvent::Tick => ticks += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(&spawns[..3], &[0, 150, 300]);
    }

    #[test]
    fn test_idle_and_game_over_emit_nothing() {
        let tuning = Tuning::default();
        let mut scheduler = Scheduler::new();
        let mut queue = EventQueue::new();
        scheduler.advance(0.1, Phase::Idle, &tuning, &mut queue);
        scheduler.advance(0.1, Phase::GameOver, &tuning, &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_phase_change_resets_timers() {
        let tuning = Tuning::default();
        let mut scheduler = Scheduler::new();
        let mut queue = EventQueue::new();

        scheduler.advance(0.5, Phase::Countdown, &tuning, &mut queue);
        for _ in 0..9 {
            scheduler.advance(0.1, Phase::Countdown, &tuning, &mut queue);
        }
        assert_eq!(queue.clear(), 1);

        // Leftover countdown time does not leak into a new countdown
        scheduler.advance(0.0, Phase::GameOver, &tuning, &mut queue);
        scheduler.advance(0.05, Phase::Countdown, &tuning, &mut queue);
        for _ in 0..9 {
            scheduler.advance(0.1, Phase::Countdown, &tuning, &mut queue);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let tuning = Tuning::default();
        let mut scheduler = Scheduler::new();
        let mut queue = EventQueue::new();
        scheduler.advance(10.0, Phase::Running, &tuning, &mut queue);
        let ticks = drain(&mut queue)
            .into_iter()
            .filter(|e| *e == GameEvent::Tick)
            .count();
        assert!(ticks as u32 <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_garbage_dt_is_ignored() {
        let tuning = Tuning::default();
        let mut scheduler = Scheduler::new();
        let mut queue = EventQueue::new();
        scheduler.advance(f32::NAN, Phase::Running, &tuning, &mut queue);
        scheduler.advance(-1.0, Phase::Running, &tuning, &mut queue);
        assert!(queue.is_empty());
    }
}
