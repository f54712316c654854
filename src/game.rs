//! Game context: the one owner of session, timers and leaderboard
//!
//! The presentation layer talks only to [`Game`]: it calls
//! [`Game::advance`] once per frame, forwards input, and renders
//! [`Game::snapshot`].

use glam::Vec2;
use serde::Serialize;

use crate::error::SessionError;
use crate::events::{EventQueue, GameEvent, Scheduler};
use crate::leaderboard::{Leaderboard, LeaderboardStore, ScoreEntry};
use crate::platform::{self, Storage};
use crate::session::{Phase, Session};
use crate::sim::{CrashCause, TickOutcome, autopilot};
use crate::tuning::Tuning;

/// What happened during one [`Game::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub ticks: u32,
    pub spawned: u32,
    pub scored: u32,
    pub crashed: Option<CrashCause>,
    /// Events discarded because the phase no longer accepted them
    pub dropped: u32,
}

/// Geometry of one obstacle pair, for drawing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub x: f32,
    pub width: f32,
    pub top_height: f32,
    pub bottom_start_y: f32,
    pub difficulty: &'static str,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub phase: &'static str,
    pub countdown: Option<u8>,
    /// Entity center, when one is on screen
    pub entity: Option<Vec2>,
    pub entity_size: f32,
    pub obstacles: Vec<ObstacleView>,
    pub score: u32,
    pub difficulty: &'static str,
    pub final_score: Option<u32>,
    pub can_submit: bool,
    pub leaderboard: Vec<ScoreEntry>,
}

/// Single owner of all mutable game state
pub struct Game<S: Storage> {
    session: Session,
    scheduler: Scheduler,
    queue: EventQueue,
    store: LeaderboardStore<S>,
    autopilot: bool,
    /// Base seed for deterministic runs; None seeds from the clock
    seed: Option<u64>,
    runs_started: u64,
}

impl<S: Storage> Game<S> {
    pub fn new(tuning: Tuning, storage: S) -> Self {
        Self {
            session: Session::new(tuning),
            scheduler: Scheduler::new(),
            queue: EventQueue::new(),
            store: LeaderboardStore::open(storage),
            autopilot: false,
            seed: None,
            runs_started: 0,
        }
    }

    /// Make every run reproducible: run `n` uses `seed + n`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Let the bot fly
    pub fn with_autopilot(mut self, enabled: bool) -> Self {
        self.autopilot = enabled;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        self.store.leaderboard()
    }

    pub fn store(&self) -> &LeaderboardStore<S> {
        &self.store
    }

    fn next_seed(&mut self) -> u64 {
        let n = self.runs_started;
        self.runs_started += 1;
        match self.seed {
            Some(base) => base.wrapping_add(n),
            None => platform::run_seed(),
        }
    }

    /// Start pressed
    pub fn start_countdown(&mut self) -> Result<(), SessionError> {
        if self.phase() != Phase::Idle {
            return Err(SessionError::InvalidPhase {
                operation: "start_countdown",
                phase: self.phase(),
            });
        }
        let seed = self.next_seed();
        self.session.start_countdown(seed)
    }

    /// Flap gesture. Queued; takes effect at the next tick.
    pub fn flap(&mut self) {
        self.queue.push(GameEvent::Flap);
    }

    /// Submit the finished run's score under `name`
    pub fn submit(&mut self, name: &str) -> Result<&Leaderboard, SessionError> {
        let score = self.session.submittable_score()?;
        self.store.submit(name, score)?;
        self.session.mark_submitted();
        Ok(self.store.leaderboard())
    }

    /// Close pressed on the leaderboard
    pub fn dismiss_leaderboard(&mut self) -> Result<(), SessionError> {
        self.session.dismiss_leaderboard()?;
        self.stop_timers();
        Ok(())
    }

    fn stop_timers(&mut self) {
        let dropped = self.queue.clear();
        if dropped > 0 {
            log::debug!("Discarded {} pending events", dropped);
        }
        self.scheduler.stop();
    }

    /// Advance by `dt` seconds of wall time and process every resulting event
    pub fn advance(&mut self, dt: f32) -> FrameReport {
        let phase = self.phase();
        self.scheduler
            .advance(dt, phase, self.session.tuning(), &mut self.queue);

        let mut report = FrameReport::default();
        while let Some(event) = self.queue.pop() {
            self.dispatch(event, &mut report);

            if self.phase() != phase && matches!(self.phase(), Phase::GameOver | Phase::Idle) {
                report.dropped += self.queue.clear() as u32;
                self.scheduler.stop();
                break;
            }
        }
        report
    }

    fn dispatch(&mut self, event: GameEvent, report: &mut FrameReport) {
        let result = match event {
            GameEvent::Flap => self.session.flap(),
            GameEvent::CountdownTimer => self.session.countdown_tick().map(|_| ()),
            GameEvent::SpawnTimer => self.session.spawn().map(|()| report.spawned += 1),
            GameEvent::Tick => {
                if self.autopilot {
                    self.autopilot_input();
                }
                self.session.tick().map(|outcome| {
                    report.ticks += 1;
                    match outcome {
                        TickOutcome::Continue => {}
                        TickOutcome::Scored(n) => report.scored += n,
                        TickOutcome::Crashed(cause) => report.crashed = Some(cause),
                    }
                })
            }
        };

        if let Err(e) = result {
            log::debug!("Ignored {:?}: {}", event, e);
            report.dropped += 1;
        }
    }

    fn autopilot_input(&mut self) {
        // The frozen run in GameOver must not take input
        if self.phase() != Phase::Running {
            return;
        }
        let wants_flap = self
            .session
            .run()
            .is_some_and(|run| autopilot::decide(run, self.session.tuning()));
        if wants_flap {
            if let Err(e) = self.session.flap() {
                log::debug!("Autopilot flap ignored: {}", e);
            }
        }
    }

    /// Current state for rendering
    pub fn snapshot(&self) -> Frame {
        let tuning = self.session.tuning();
        let run = self.session.run();

        Frame {
            phase: self.phase().as_str(),
            countdown: self.session.countdown_remaining(),
            entity: run.map(|r| r.entity.pos()),
            entity_size: tuning.entity_size,
            obstacles: run
                .map(|r| {
                    r.obstacles
                        .iter()
                        .map(|p| ObstacleView {
                            x: p.x,
                            width: p.width,
                            top_height: p.top_height,
                            bottom_start_y: p.bottom_start_y,
                            difficulty: p.difficulty.as_str(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            score: run.map(|r| r.score).unwrap_or(0),
            difficulty: run
                .map(|r| r.difficulty(tuning).as_str())
                .unwrap_or("Easy"),
            final_score: self.session.final_score(),
            can_submit: self.session.submittable_score().is_ok(),
            leaderboard: self.store.leaderboard().entries().to_vec(),
        }
    }
}
