//! Data-driven game balance
//!
//! Every gameplay number lives in [`Tuning`]. Units are world units and
//! simulation ticks; y grows downward from the top of the play area.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Gameplay constants, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub play_area_width: f32,
    pub play_area_height: f32,

    // === Entity ===
    /// Center of the entity at the start of a run
    pub start_x: f32,
    pub start_y: f32,
    /// Full width/height of the entity's bounding box
    pub entity_size: f32,
    /// Added to velocity every tick (units/tick²)
    pub gravity: f32,
    /// Velocity set by a flap (negative = upward)
    pub flap_impulse: f32,

    // === Obstacles ===
    /// Leftward movement per tick
    pub scroll_speed: f32,
    pub obstacle_width: f32,
    pub initial_gap: f32,
    pub minimum_gap: f32,
    pub gap_decrease_per_point: f32,
    /// Smallest allowed top segment height
    pub min_top_height: f32,
    /// Space kept free below the gap
    pub bottom_margin: f32,
    /// Simulated seconds between spawns
    pub spawn_interval_secs: f32,

    // === Session ===
    pub countdown_from: u8,
    /// Simulation ticks per second
    pub tick_rate: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            play_area_width: 400.0,
            play_area_height: 700.0,

            start_x: 100.0,
            start_y: 350.0,
            entity_size: 34.0,
            gravity: 0.5,
            flap_impulse: -8.0,

            scroll_speed: 3.0,
            obstacle_width: 70.0,
            initial_gap: 350.0,
            minimum_gap: 70.0,
            gap_decrease_per_point: 5.0,
            min_top_height: 100.0,
            bottom_margin: 150.0,
            spawn_interval_secs: 2.5,

            countdown_from: 3,
            tick_rate: 60,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would make the game unplayable
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        let floats = [
            ("play_area_width", self.play_area_width),
            ("play_area_height", self.play_area_height),
            ("start_x", self.start_x),
            ("start_y", self.start_y),
            ("entity_size", self.entity_size),
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("scroll_speed", self.scroll_speed),
            ("obstacle_width", self.obstacle_width),
            ("initial_gap", self.initial_gap),
            ("minimum_gap", self.minimum_gap),
            ("gap_decrease_per_point", self.gap_decrease_per_point),
            ("min_top_height", self.min_top_height),
            ("bottom_margin", self.bottom_margin),
            ("spawn_interval_secs", self.spawn_interval_secs),
        ];
        if let Some(&(field, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(field, "must be finite");
        }

        if self.play_area_height <= 0.0 {
            return invalid("play_area_height", "must be positive");
        }
        if self.play_area_width <= 0.0 {
            return invalid("play_area_width", "must be positive");
        }
        if self.entity_size <= 0.0 {
            return invalid("entity_size", "must be positive");
        }
        if self.entity_size >= self.play_area_height {
            return invalid("entity_size", "must be smaller than play_area_height");
        }
        if self.minimum_gap <= 0.0 {
            return invalid("minimum_gap", "must be positive");
        }
        if self.initial_gap < self.minimum_gap {
            return invalid("initial_gap", "must be at least minimum_gap");
        }
        if self.gap_decrease_per_point < 0.0 {
            return invalid("gap_decrease_per_point", "must not be negative");
        }
        if self.min_top_height < 0.0 {
            return invalid("min_top_height", "must not be negative");
        }
        if self.bottom_margin < 0.0 {
            return invalid("bottom_margin", "must not be negative");
        }
        if self.scroll_speed <= 0.0 {
            return invalid("scroll_speed", "must be positive");
        }
        if self.spawn_interval_secs <= 0.0 {
            return invalid("spawn_interval_secs", "must be positive");
        }
        if self.tick_rate == 0 {
            return invalid("tick_rate", "must be positive");
        }
        if self.countdown_from == 0 {
            return invalid("countdown_from", "must be at least 1");
        }
        Ok(())
    }

    /// Seconds per simulation tick
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Half of the entity's box size
    #[inline]
    pub fn entity_half_extent(&self) -> f32 {
        self.entity_size / 2.0
    }
}
