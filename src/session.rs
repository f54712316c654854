//! Session state machine
//!
//! `Idle -> Countdown -> Running -> GameOver -> Idle`. Each operation is only
//! valid in one phase; anywhere else it returns [`SessionError::InvalidPhase`]
//! and leaves the state untouched.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::sim::{RunState, TickOutcome, tick};
use crate::tuning::Tuning;

/// Which state the session is in, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Start control enabled, nothing on screen
    Idle,
    /// Entity positioned, not simulated
    Countdown,
    /// Simulation active
    Running,
    /// Final score fixed, leaderboard submission enabled
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Countdown => "Countdown",
            Phase::Running => "Running",
            Phase::GameOver => "GameOver",
        }
    }
}

/// The session and the data each phase carries
#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    Countdown {
        remaining: u8,
        run: RunState,
    },
    Running(RunState),
    GameOver {
        final_score: u32,
        /// Frozen last frame of the run, kept for display
        run: RunState,
        submitted: bool,
    },
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::Countdown { .. } => Phase::Countdown,
            SessionState::Running(_) => Phase::Running,
            SessionState::GameOver { .. } => Phase::GameOver,
        }
    }
}

/// Single owner of the session state
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    tuning: Tuning,
}

impl Session {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            state: SessionState::Idle,
            tuning,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// The run being shown, in any phase but Idle
    pub fn run(&self) -> Option<&RunState> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Countdown { run, .. }
            | SessionState::Running(run)
            | SessionState::GameOver { run, .. } => Some(run),
        }
    }

    pub fn countdown_remaining(&self) -> Option<u8> {
        match self.state {
            SessionState::Countdown { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    pub fn final_score(&self) -> Option<u32> {
        match self.state {
            SessionState::GameOver { final_score, .. } => Some(final_score),
            _ => None,
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidPhase {
            operation,
            phase: self.phase(),
        }
    }

    /// Idle -> Countdown
    pub fn start_countdown(&mut self, seed: u64) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(self.invalid("start_countdown"));
        }
        let remaining = self.tuning.countdown_from;
        self.state = SessionState::Countdown {
            remaining,
            run: RunState::new(seed, &self.tuning),
        };
        log::info!("Countdown started (seed {})", seed);
        Ok(())
    }

    /// One countdown second elapsed; at 1 the run starts fresh
    pub fn countdown_tick(&mut self) -> Result<Phase, SessionError> {
        let SessionState::Countdown { remaining, run } = &mut self.state else {
            return Err(self.invalid("countdown_tick"));
        };

        if *remaining > 1 {
            *remaining -= 1;
            log::debug!("Countdown {}", remaining);
            return Ok(Phase::Countdown);
        }

        let mut run = std::mem::replace(run, RunState::new(0, &self.tuning));
        run.reset();
        self.state = SessionState::Running(run);
        log::info!("Run started");
        Ok(Phase::Running)
    }

    /// Queue a flap for the next tick
    pub fn flap(&mut self) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::Running(run) => {
                run.flap_queued = true;
                Ok(())
            }
            _ => Err(self.invalid("flap")),
        }
    }

    /// Spawn one obstacle pair
    pub fn spawn(&mut self) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::Running(run) => {
                run.spawn_obstacle(&self.tuning);
                Ok(())
            }
            _ => Err(self.invalid("spawn")),
        }
    }

    /// Advance the run one tick; a crash moves the session to GameOver
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        let SessionState::Running(run) = &mut self.state else {
            return Err(self.invalid("tick"));
        };

        let outcome = tick(run, &self.tuning);
        if let TickOutcome::Crashed(cause) = outcome {
            let run = std::mem::replace(run, RunState::new(0, &self.tuning));
            log::info!(
                "Game over: {:?} after {} ticks, score {}",
                cause,
                run.time_ticks,
                run.score
            );
            self.state = SessionState::GameOver {
                final_score: run.score,
                run,
                submitted: false,
            };
        }
        Ok(outcome)
    }

    /// Final score, if a submission is allowed right now
    pub fn submittable_score(&self) -> Result<u32, SessionError> {
        match self.state {
            SessionState::GameOver {
                final_score,
                submitted: false,
                ..
            } => Ok(final_score),
            SessionState::GameOver {
                submitted: true, ..
            } => Err(SessionError::AlreadySubmitted),
            _ => Err(self.invalid("submit")),
        }
    }

    pub fn mark_submitted(&mut self) {
        if let SessionState::GameOver { submitted, .. } = &mut self.state {
            *submitted = true;
        }
    }

    /// GameOver -> Idle; clears the run
    pub fn dismiss_leaderboard(&mut self) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::GameOver { .. }) {
            return Err(self.invalid("dismiss_leaderboard"));
        }
        self.state = SessionState::Idle;
        log::info!("Back to idle");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn running(seed: u64) -> Session {
        let mut session = Session::new(Tuning::default());
        session.start_countdown(seed).unwrap();
        while session.phase() == Phase::Countdown {
            session.countdown_tick().unwrap();
        }
        session
    }

    fn crash(session: &mut Session) {
        for _ in 0..10_000 {
            if session.phase() != Phase::Running {
                return;
            }
            session.tick().unwrap();
        }
        panic!("entity never crashed");
    }

    #[test]
    fn test_full_cycle() {
        let mut session = Session::new(Tuning::default());
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.run().is_none());

        session.start_countdown(1).unwrap();
        assert_eq!(session.countdown_remaining(), Some(3));
        assert_eq!(session.countdown_tick().unwrap(), Phase::Countdown);
        assert_eq!(session.countdown_remaining(), Some(2));
        assert_eq!(session.countdown_tick().unwrap(), Phase::Countdown);
        assert_eq!(session.countdown_remaining(), Some(1));
        assert_eq!(session.countdown_tick().unwrap(), Phase::Running);

        // Nothing to flap against, so gravity wins eventually
        crash(&mut session);
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.final_score(), Some(0));

        session.dismiss_leaderboard().unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.run().is_none());
    }

    #[test]
    fn test_countdown_positions_entity_without_simulating() {
        let tuning = Tuning::default();
        let mut session = Session::new(tuning.clone());
        session.start_countdown(1).unwrap();

        let run = session.run().unwrap();
        assert_eq!(run.entity.pos(), Vec2::new(tuning.start_x, tuning.start_y));
        assert!(session.tick().is_err());
        assert!(session.flap().is_err());
        assert!(session.spawn().is_err());
    }

    #[test]
    fn test_running_starts_clean() {
        let session = running(4);
        let run = session.run().unwrap();
        assert_eq!(run.score, 0);
        assert!(run.obstacles.is_empty());
        assert_eq!(run.entity.velocity(), 0.0);
    }

    #[test]
    fn test_wrong_phase_operations_rejected() {
        let mut session = Session::new(Tuning::default());
        assert!(matches!(
            session.flap(),
            Err(SessionError::InvalidPhase {
                phase: Phase::Idle,
                ..
            })
        ));
        assert!(session.countdown_tick().is_err());
        assert!(session.dismiss_leaderboard().is_err());
        assert!(session.submittable_score().is_err());

        let mut session = running(2);
        assert!(session.start_countdown(3).is_err());
        assert!(session.submittable_score().is_err());
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_game_over_ignores_ticks() {
        let mut session = running(5);
        crash(&mut session);
        let frozen = session.run().unwrap().entity.clone();

        assert!(session.tick().is_err());
        assert!(session.flap().is_err());
        assert_eq!(session.run().unwrap().entity, frozen);
    }

    #[test]
    fn test_submission_allowed_once() {
        let mut session = running(6);
        crash(&mut session);

        assert_eq!(session.submittable_score().unwrap(), 0);
        session.mark_submitted();
        assert!(matches!(
            session.submittable_score(),
            Err(SessionError::AlreadySubmitted)
        ));
    }

    #[test]
    fn test_flap_only_queues() {
        let mut session = running(7);
        let y0 = session.run().unwrap().entity.pos().y;
        session.flap().unwrap();
        session.flap().unwrap();
        assert_eq!(session.run().unwrap().entity.pos().y, y0);

        session.tick().unwrap();
        let run = session.run().unwrap();
        assert_eq!(run.entity.velocity(), session.tuning().flap_impulse);
        assert!(!run.flap_queued);
    }
}
