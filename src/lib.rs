//! Skyflap - flap through the gaps, don't touch anything
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scoring)
//! - `session`: Idle/Countdown/Running/GameOver state machine
//! - `events`: Timers and input serialized onto one event queue
//! - `game`: Single owner of all state; the presentation boundary
//! - `leaderboard`: Top-10 scores with load/save
//! - `platform`: Browser/native storage and logging
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod events;
pub mod game;
pub mod leaderboard;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{LeaderboardError, SessionError, StorageError, TuningError};
pub use game::{Frame, FrameReport, Game};
pub use leaderboard::{Leaderboard, LeaderboardStore, ScoreEntry};
pub use session::{Phase, Session, SessionState};
pub use tuning::Tuning;

/// Frame-loop constants
pub mod consts {
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame (seconds) fed to the scheduler
    pub const MAX_FRAME_DT: f32 = 0.1;
}
