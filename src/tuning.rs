//! Data-driven game balance
//!
//! Every gameplay number lives in `Tuning`. Defaults match `consts`; a JSON file
//! may override any subset of fields.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Error type for tuning loading operations.
#[derive(Debug)]
pub enum TuningError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::IoError(e) => write!(f, "IO error: {e}"),
            TuningError::ParseError(e) => write!(f, "JSON parse error: {e}"),
            TuningError::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::IoError(e) => Some(e),
            TuningError::ParseError(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        TuningError::IoError(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::ParseError(err)
    }
}

/// Relative odds of each block kind when a level is generated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockMix {
    pub normal: f32,
    pub booster: f32,
    pub reinforced: f32,
}

impl Default for BlockMix {
    fn default() -> Self {
        Self {
            normal: 0.7,
            booster: 0.2,
            reinforced: 0.1,
        }
    }
}

impl BlockMix {
    pub fn total(&self) -> f32 {
        self.normal + self.booster + self.reinforced
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_size: Vec2,
    pub wall_thickness: f32,
    pub lives: u8,

    // === Ball ===
    pub ball_radius: f32,
    /// Serve speed, restored on every paddle hit
    pub ball_speed: f32,
    /// Added per booster block hit
    pub ball_speed_increment: f32,
    pub serve_spread_degrees: f32,

    // === Blocks ===
    pub block_size: Vec2,
    pub block_columns: usize,
    pub block_rows: usize,
    pub block_mix: BlockMix,

    // === Paddle ===
    pub paddle_size: Vec2,
    pub paddle_start: Vec2,
    pub paddle_speed: f32,
    /// How far the paddle's motion bends a bounce (small)
    pub paddle_english: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_size: ARENA_SIZE,
            wall_thickness: WALL_THICKNESS,
            lives: STARTING_LIVES,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            ball_speed_increment: BALL_SPEED_INCREMENT,
            serve_spread_degrees: SERVE_SPREAD_DEGREES,

            block_size: BLOCK_SIZE,
            block_columns: BLOCK_COLUMNS,
            block_rows: BLOCK_ROWS,
            block_mix: BlockMix::default(),

            paddle_size: PADDLE_SIZE,
            paddle_start: PADDLE_START,
            paddle_speed: PADDLE_SPEED,
            paddle_english: PADDLE_ENGLISH,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: &str| Err(TuningError::Invalid(msg.to_string()));

        if !(self.ball_radius > 0.0) {
            return invalid("ball_radius must be positive");
        }
        if !(self.ball_speed > 0.0) || self.ball_speed_increment < 0.0 {
            return invalid("ball speeds must be positive");
        }
        if self.block_columns == 0 || self.block_rows == 0 {
            return invalid("block grid must not be empty");
        }
        if self.block_size.cmple(Vec2::ZERO).any() || self.paddle_size.cmple(Vec2::ZERO).any() {
            return invalid("block and paddle sizes must be positive");
        }
        let mix = self.block_mix;
        if mix.normal < 0.0 || mix.booster < 0.0 || mix.reinforced < 0.0 || !(mix.total() > 0.0) {
            return invalid("block_mix weights must be non-negative with a positive sum");
        }
        if !(self.wall_thickness > 0.0) {
            return invalid("wall_thickness must be positive");
        }
        if self.arena_size.x <= 2.0 * self.wall_thickness
            || self.arena_size.y <= self.wall_thickness
        {
            return invalid("arena too small for its walls");
        }
        if self.paddle_speed < 0.0 {
            return invalid("paddle_speed must not be negative");
        }
        if self.lives == 0 {
            return invalid("lives must be at least 1");
        }
        Ok(())
    }
}
