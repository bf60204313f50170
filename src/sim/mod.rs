//! Simulation module
//!
//! All gameplay physics lives here. This module is pure:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (blocks by grid index)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod context;
pub mod motion;
pub mod shapes;
pub mod state;
pub mod step;
pub mod tick;

pub use collision::{
    HitInfo, SegmentClosestPoints, closest_points_segment_segment, intersect_moving_sphere_aabb,
    intersect_ray_aabb, intersect_segment_capsule, intersect_segment_sphere,
};
pub use context::{BlockId, Collider, CollisionContext, WallSide};
pub use motion::{MotionReport, advance_ball};
pub use shapes::{Aabb, Capsule, Segment, Sphere, normalize_or, reflect};
pub use state::{
    Ball, Block, BlockKind, Color, GameEvent, GamePhase, GameState, MoveDirection, Paddle, Wall,
};
pub use step::{HitResult, Obstacle, simulate_step};
pub use tick::{TickInput, generate_level, start_game, tick};
