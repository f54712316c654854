//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles oldest first)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use entity::Entity;
pub use obstacle::{Difficulty, ObstaclePair, gap_height, generate};
pub use state::RunState;
pub use tick::{CrashCause, TickOutcome, tick};
