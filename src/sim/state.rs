//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::context::{BlockId, Collider, WallSide};
use super::shapes::{Aabb, normalize_or};
use super::step::Obstacle;
use crate::consts::REINFORCED_HITS;
use crate::tuning::Tuning;

/// RGBA colour, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const BLUE: Color = Color::rgb(4, 118, 208);
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing spawned yet
    NotStarted,
    /// Paddle on screen, waiting for serve input
    AwaitingServe,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
    /// Every block destroyed
    Won,
}

/// Things gameplay reacts to (sound, particles, HUD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball spawned above the paddle
    Served,
    /// Ball bounced off something
    Bounce(Obstacle),
    /// Block lost its last hit
    BlockDestroyed { id: BlockId, score: u32 },
    /// Ball fell past the bottom of the arena
    BallLost { lives_left: u8 },
    Won,
    GameOver,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Unit travel direction
    dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub color: Color,
    base_speed: f32,
}

impl Ball {
    pub const DEFAULT_COLOR: Color = Color::WHITE;

    pub fn new(pos: Vec2, radius: f32, base_speed: f32) -> Self {
        Self {
            pos,
            dir: Vec2::ZERO,
            speed: base_speed,
            radius,
            color: Self::DEFAULT_COLOR,
            base_speed,
        }
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.dir
    }

    /// Set the travel direction; a zero-length input keeps the current direction
    pub fn set_direction(&mut self, dir: Vec2) {
        self.dir = normalize_or(dir, self.dir);
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Back to serve speed and colour (paddle contact)
    pub fn reset_speed_and_color(&mut self) {
        self.speed = self.base_speed;
        self.color = Self::DEFAULT_COLOR;
    }
}

impl Collider for Ball {
    fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, Vec2::splat(self.radius * 2.0))
    }
}

/// Horizontal paddle input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveDirection {
    #[default]
    None,
    Left,
    Right,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub motion: MoveDirection,
}

impl Paddle {
    pub fn new(pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            pos,
            size,
            speed,
            motion: MoveDirection::None,
        }
    }

    /// Unit direction the paddle is currently moving in (zero when still)
    pub fn motion_direction(&self) -> Vec2 {
        match self.motion {
            MoveDirection::None => Vec2::ZERO,
            MoveDirection::Left => Vec2::NEG_X,
            MoveDirection::Right => Vec2::X,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.motion_direction() * self.speed
    }

    /// Move by this tick's input, keeping the paddle between `min_x` and `max_x`.
    ///
    /// Returns true if the paddle was stopped by a bound.
    pub fn advance(&mut self, dt: f32, min_x: f32, max_x: f32) -> bool {
        let half = self.size.x * 0.5;
        let mut x = self.pos.x + self.velocity().x * dt;
        let mut clamped = false;
        if x - half < min_x {
            x = min_x + half;
            clamped = true;
        }
        if x + half > max_x {
            x = max_x - half;
            clamped = true;
        }
        self.pos.x = x;
        clamped
    }
}

impl Collider for Paddle {
    fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }
}

/// One of the three fixed arena walls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub side: WallSide,
    pub bounds: Aabb,
}

impl Wall {
    /// Wall hugging the given edge of an arena whose top-left corner is the origin
    pub fn for_arena(side: WallSide, arena: Vec2, thickness: f32) -> Self {
        let half = thickness * 0.5;
        let (center, size) = match side {
            WallSide::Left => (Vec2::new(half, arena.y * 0.5), Vec2::new(thickness, arena.y)),
            WallSide::Top => (Vec2::new(arena.x * 0.5, half), Vec2::new(arena.x, thickness)),
            WallSide::Right => (
                Vec2::new(arena.x - half, arena.y * 0.5),
                Vec2::new(thickness, arena.y),
            ),
        };
        Self {
            side,
            bounds: Aabb::from_center_size(center, size),
        }
    }
}

impl Collider for Wall {
    fn aabb(&self) -> Aabb {
        self.bounds
    }
}

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Normal,
    /// Speeds the ball up on every hit
    Booster,
    /// Takes several hits
    Reinforced,
}

impl BlockKind {
    pub fn score(self) -> u32 {
        match self {
            BlockKind::Normal => 1,
            BlockKind::Booster => 2,
            BlockKind::Reinforced => 3,
        }
    }

    pub fn color(self) -> Color {
        match self {
            BlockKind::Normal => Color::CYAN,
            BlockKind::Booster => Color::MAGENTA,
            BlockKind::Reinforced => Color::BLUE,
        }
    }

    pub fn starting_hits(self) -> u8 {
        match self {
            BlockKind::Reinforced => REINFORCED_HITS,
            _ => 1,
        }
    }
}

/// A destructible block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub pos: Vec2,
    pub size: Vec2,
    hits_left: u8,
    destroyed: bool,
}

impl Block {
    pub fn new(pos: Vec2, size: Vec2, kind: BlockKind) -> Self {
        Self {
            kind,
            pos,
            size,
            hits_left: kind.starting_hits(),
            destroyed: false,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn hits_left(&self) -> u8 {
        self.hits_left
    }

    /// Take one hit. Returns true if this hit destroyed the block.
    pub fn try_destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.hits_left = self.hits_left.saturating_sub(1);
        self.destroyed = self.hits_left == 0;
        self.destroyed
    }

    pub fn score(&self) -> u32 {
        self.kind.score()
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }
}

impl Collider for Block {
    fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    /// Score that clears the level
    pub max_score: u32,
    pub lives: u8,
    /// Left, top, right
    pub walls: [Wall; 3],
    pub paddle: Option<Paddle>,
    pub ball: Option<Ball>,
    /// Blocks in grid order; destroyed blocks stay in place so ids remain valid
    pub blocks: Vec<Block>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let (arena, thickness) = (tuning.arena_size, tuning.wall_thickness);
        let walls = WallSide::ALL.map(|side| Wall::for_arena(side, arena, thickness));

        Self {
            seed,
            phase: GamePhase::NotStarted,
            score: 0,
            max_score: 0,
            lives: tuning.lives,
            walls,
            paddle: None,
            ball: None,
            blocks: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    pub fn wall(&self, side: WallSide) -> &Wall {
        match side {
            WallSide::Left => &self.walls[0],
            WallSide::Top => &self.walls[1],
            WallSide::Right => &self.walls[2],
        }
    }

    pub fn live_block_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_destroyed()).count()
    }

    /// Put the paddle back at its start position
    pub fn spawn_paddle(&mut self) {
        self.paddle = Some(Paddle::new(
            self.tuning.paddle_start,
            self.tuning.paddle_size,
            self.tuning.paddle_speed,
        ));
    }

    /// Spawn a ball resting just above the paddle, aimed upward within the serve cone
    pub fn spawn_ball(&mut self) {
        let Some(paddle) = &self.paddle else {
            log::warn!("Cannot serve without a paddle");
            return;
        };

        let radius = self.tuning.ball_radius;
        let pos = Vec2::new(
            paddle.pos.x,
            paddle.pos.y - radius - paddle.size.y * 0.5 - 1.0,
        );

        let spread = self.tuning.serve_spread_degrees.abs();
        let angle = self.rng.random_range(-spread..=spread).to_radians();

        let mut ball = Ball::new(pos, radius, self.tuning.ball_speed);
        ball.set_direction(Vec2::new(angle.sin(), -angle.cos()));
        log::info!("Ball served at {:?} heading {:?}", ball.pos, ball.direction());
        self.ball = Some(ball);
    }
}
