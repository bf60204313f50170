//! Brickfall - continuous-collision core of a breakout-style arcade game
//!
//! Core modules:
//! - `sim`: Simulation (shapes, swept intersection tests, step solver, motion loop, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Logical arena dimensions
    pub const ARENA_SIZE: Vec2 = Vec2::new(800.0, 800.0);
    pub const WALL_THICKNESS: f32 = 10.0;

    /// Block grid
    pub const BLOCK_SIZE: Vec2 = Vec2::new(65.0, 30.0);
    pub const BLOCK_COLUMNS: usize = 12;
    pub const BLOCK_ROWS: usize = 5;
    /// Gap between the arena's top-left corner and the first block
    pub const BLOCK_GRID_OFFSET: f32 = 10.0;
    /// Hits a reinforced block takes before breaking
    pub const REINFORCED_HITS: u8 = 3;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPEED: f32 = 500.0;
    /// Speed added by every booster block hit
    pub const BALL_SPEED_INCREMENT: f32 = 100.0;
    /// Half-angle of the random serve cone (degrees from straight up)
    pub const SERVE_SPREAD_DEGREES: f32 = 30.0;

    /// Paddle defaults
    pub const PADDLE_SIZE: Vec2 = Vec2::new(60.0, 10.0);
    pub const PADDLE_START: Vec2 = Vec2::new(400.0, 700.0);
    pub const PADDLE_SPEED: f32 = 500.0;
    /// Bias the paddle's motion adds to a reflected ball direction
    pub const PADDLE_ENGLISH: f32 = 0.05;

    pub const STARTING_LIVES: u8 = 3;

    /// Upper bound on bounces resolved in a single tick
    pub const MAX_BOUNCES_PER_TICK: u32 = 16;
}
