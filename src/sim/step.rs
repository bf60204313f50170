//! Single-bounce step solver
//!
//! Sweeps the ball once along a displacement, picks the nearest obstacle it
//! touches, and works out where it ends up and which way it leaves.

use glam::Vec2;

use super::collision::{EPSILON, HitInfo, intersect_moving_sphere_aabb};
use super::context::{BlockId, Collider, CollisionContext, WallSide};
use super::shapes::{Sphere, normalize_or, reflect};
use super::state::{Ball, Block};

/// Distance the ball is pushed off a surface after contact
pub const PUSH_OUT: f32 = 0.001;

/// Contacts this much farther along the path than the nearest one are
/// treated as the same contact (corners, block seams)
pub const CONTACT_TOLERANCE: f32 = 0.01;

/// What the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obstacle {
    Wall(WallSide),
    Block(BlockId),
    Paddle,
}

/// Outcome of one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub position: Vec2,
    pub direction: Vec2,
    /// Fraction of the displacement used before the bounce (1.0 when unobstructed)
    pub traveled: f32,
    pub obstacle: Option<Obstacle>,
}

/// Resolve one step of `displacement` for `ball` starting at `position`.
///
/// Walls are scanned first, then live blocks in context order, then the paddle.
/// The hit whose contact point is nearest `position` wins; on equal distance the
/// earlier-scanned obstacle is kept. When several obstacles are touched at once
/// the ball bounces off the sum of their normals. `english` scales how much the
/// paddle's own motion bends a paddle bounce.
pub fn simulate_step(
    ball: &Ball,
    displacement: Vec2,
    position: Vec2,
    context: &CollisionContext<'_>,
    blocks: &[Block],
    english: f32,
) -> HitResult {
    let sphere = Sphere::new(position, ball.radius);
    let mut hits: Vec<(HitInfo, Obstacle)> = Vec::new();

    let mut consider = |hit: Option<HitInfo>, obstacle: Obstacle| {
        if let Some(hit) = hit {
            hits.push((hit, obstacle));
        }
    };

    for wall in context.walls() {
        consider(
            intersect_moving_sphere_aabb(&sphere, displacement, &wall.aabb()),
            Obstacle::Wall(wall.side),
        );
    }

    for (id, block) in context.live_blocks(blocks) {
        consider(
            intersect_moving_sphere_aabb(&sphere, displacement, &block.aabb()),
            Obstacle::Block(id),
        );
    }

    if let Some(paddle) = context.paddle() {
        consider(
            intersect_moving_sphere_aabb(&sphere, displacement, &paddle.aabb()),
            Obstacle::Paddle,
        );
    }

    let mut nearest: Option<(HitInfo, Obstacle, f32)> = None;
    for &(hit, obstacle) in &hits {
        let distance = hit.point.distance(position);
        if nearest.is_none_or(|(_, _, best)| distance < best) {
            nearest = Some((hit, obstacle, distance));
        }
    }

    let Some((hit, obstacle, nearest_distance)) = nearest else {
        let (position, direction) = push_clear(
            position + displacement,
            ball.direction(),
            ball.radius,
            context,
            blocks,
        );
        return HitResult {
            position,
            direction,
            traveled: 1.0,
            obstacle: None,
        };
    };

    let to_impact = hit.point - position;
    let incoming = if to_impact.length() > EPSILON {
        to_impact.normalize()
    } else {
        ball.direction()
    };

    let normal = hits
        .iter()
        .filter(|(other, _)| other.point.distance(position) - nearest_distance <= CONTACT_TOLERANCE)
        .fold(Vec2::ZERO, |sum, (other, _)| sum + other.normal);
    let normal = normalize_or(normal, hit.normal);

    let mut direction = reflect(incoming, normal);
    if let (Obstacle::Paddle, Some(paddle)) = (obstacle, context.paddle()) {
        direction = normalize_or(direction + paddle.motion_direction() * english, direction);
    }

    let (position, direction) = push_clear(
        hit.point + direction * PUSH_OUT,
        direction,
        ball.radius,
        context,
        blocks,
    );

    HitResult {
        position,
        direction,
        traveled: hit.t,
        obstacle: Some(obstacle),
    }
}

/// Move a resting position out of every obstacle box (grown by `radius`) that
/// strictly contains it.
///
/// Each box is left through its shallowest face, and the matching component of
/// `direction` is turned to point away from that face.
fn push_clear(
    mut position: Vec2,
    mut direction: Vec2,
    radius: f32,
    context: &CollisionContext<'_>,
    blocks: &[Block],
) -> (Vec2, Vec2) {
    let boxes = context
        .walls()
        .iter()
        .map(|wall| wall.aabb())
        .chain(context.live_blocks(blocks).map(|(_, block)| block.aabb()))
        .chain(context.paddle().map(|paddle| paddle.aabb()));

    for bounds in boxes {
        let grown = bounds.expanded(radius);
        if !(position.cmpgt(grown.min) & position.cmplt(grown.max)).all() {
            continue;
        }

        let from_min = position - grown.min;
        let to_max = grown.max - position;
        let depths = [from_min.x, to_max.x, from_min.y, to_max.y];
        let (face, depth) = depths
            .into_iter()
            .enumerate()
            .fold((0, f32::INFINITY), |best, (face, depth)| {
                if depth < best.1 { (face, depth) } else { best }
            });

        let shift = depth + PUSH_OUT;
        match face {
            0 => {
                position.x -= shift;
                direction.x = -direction.x.abs();
            }
            1 => {
                position.x += shift;
                direction.x = direction.x.abs();
            }
            2 => {
                position.y -= shift;
                direction.y = -direction.y.abs();
            }
            _ => {
                position.y += shift;
                direction.y = direction.y.abs();
            }
        }
        log::debug!("Pushed ball clear of {:?} to {:?}", bounds, position);
    }

    (position, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BlockKind, MoveDirection, Paddle, Wall};

    fn walls() -> [Wall; 3] {
        WallSide::ALL.map(|side| Wall::for_arena(side, Vec2::new(800.0, 800.0), 10.0))
    }

    fn ball_at(pos: Vec2, dir: Vec2) -> Ball {
        let mut ball = Ball::new(pos, 10.0, 500.0);
        ball.set_direction(dir);
        ball
    }

    #[test]
    fn test_unobstructed_step() {
        let walls = walls();
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], None, &[]);
        let ball = ball_at(Vec2::new(400.0, 400.0), Vec2::X);
        let result = simulate_step(&ball, Vec2::new(8.0, 0.0), ball.pos, &ctx, &[], 0.05);
        assert_eq!(result.obstacle, None);
        assert_eq!(result.traveled, 1.0);
        assert_eq!(result.position, Vec2::new(408.0, 400.0));
        assert_eq!(result.direction, Vec2::X);
    }

    #[test]
    fn test_block_face_bounce() {
        let walls = walls();
        let blocks = vec![Block::new(
            Vec2::new(150.0, 100.0),
            Vec2::new(65.0, 30.0),
            BlockKind::Normal,
        )];
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], None, &blocks);
        let ball = ball_at(Vec2::new(100.0, 100.0), Vec2::X);

        let displacement = Vec2::new(500.0 / 60.0, 0.0);
        let result = simulate_step(&ball, displacement, ball.pos, &ctx, &blocks, 0.05);
        assert_eq!(result.obstacle, Some(Obstacle::Block(BlockId(0))));
        assert!(result.direction.x < 0.0);
        assert!((result.direction - Vec2::NEG_X).length() < 1e-5);
        assert!(result.traveled > 0.0 && result.traveled < 1.0);
        // Resting position sits just outside the grown face
        assert!(result.position.x < 107.5);
    }

    #[test]
    fn test_wall_bounce() {
        let walls = walls();
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], None, &[]);
        let ball = ball_at(Vec2::new(25.0, 400.0), Vec2::new(-1.0, -1.0));
        let result = simulate_step(&ball, Vec2::new(-10.0, -10.0), ball.pos, &ctx, &[], 0.05);
        assert_eq!(result.obstacle, Some(Obstacle::Wall(WallSide::Left)));
        assert!(result.direction.x > 0.0 && result.direction.y < 0.0);
    }

    #[test]
    fn test_nearer_block_wins_over_scan_order() {
        let walls = walls();
        // Index 1 is scanned first but is the farther one along the path
        let blocks = vec![
            Block::new(Vec2::new(150.0, 70.0), Vec2::new(65.0, 30.0), BlockKind::Normal),
            Block::new(Vec2::new(150.0, 30.0), Vec2::new(65.0, 30.0), BlockKind::Normal),
        ];
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], None, &blocks);
        let ball = ball_at(Vec2::new(150.0, 130.0), Vec2::NEG_Y);
        let result = simulate_step(&ball, Vec2::new(0.0, -100.0), ball.pos, &ctx, &blocks, 0.05);
        assert_eq!(result.obstacle, Some(Obstacle::Block(BlockId(0))));
    }

    #[test]
    fn test_front_block_wins_tie() {
        let walls = walls();
        let block = Block::new(Vec2::new(150.0, 70.0), Vec2::new(65.0, 30.0), BlockKind::Normal);
        let blocks = vec![block.clone(), block];
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], None, &blocks);
        let ball = ball_at(Vec2::new(150.0, 130.0), Vec2::NEG_Y);
        let result = simulate_step(&ball, Vec2::new(0.0, -100.0), ball.pos, &ctx, &blocks, 0.05);
        assert_eq!(result.obstacle, Some(Obstacle::Block(BlockId(1))));
    }

    #[test]
    fn test_destroyed_block_ignored() {
        let walls = walls();
        let mut blocks = vec![Block::new(
            Vec2::new(150.0, 100.0),
            Vec2::new(65.0, 30.0),
            BlockKind::Normal,
        )];
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], None, &blocks);
        blocks[0].try_destroy();
        let ball = ball_at(Vec2::new(100.0, 100.0), Vec2::X);
        let result = simulate_step(&ball, Vec2::new(20.0, 0.0), ball.pos, &ctx, &blocks, 0.05);
        assert_eq!(result.obstacle, None);
    }

    #[test]
    fn test_paddle_english_bends_bounce() {
        let walls = walls();
        let mut paddle = Paddle::new(Vec2::new(400.0, 700.0), Vec2::new(60.0, 10.0), 500.0);
        paddle.motion = MoveDirection::Right;
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], Some(&paddle), &[]);
        let ball = ball_at(Vec2::new(400.0, 680.0), Vec2::Y);

        let result = simulate_step(&ball, Vec2::new(0.0, 15.0), ball.pos, &ctx, &[], 0.05);
        assert_eq!(result.obstacle, Some(Obstacle::Paddle));
        assert!(result.direction.y < 0.0);
        assert!(result.direction.x > 0.0);
        // Small bias, never a dominant one
        assert!(result.direction.x < 0.1);
        assert!((result.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_corner_contact_bounces_off_both_walls() {
        let walls = walls();
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], None, &[]);
        let ball = ball_at(Vec2::new(100.0, 100.0), Vec2::new(-1.0, -1.0));

        let result = simulate_step(&ball, Vec2::new(-100.0, -100.0), ball.pos, &ctx, &[], 0.05);
        assert_eq!(result.obstacle, Some(Obstacle::Wall(WallSide::Left)));
        assert!((result.direction - Vec2::ONE.normalize()).length() < 1e-5);
        assert!(result.position.x > 20.0 && result.position.y > 20.0);
    }

    #[test]
    fn test_seam_contact_bounces_straight_back() {
        let walls = walls();
        let blocks = vec![
            Block::new(Vec2::new(300.0, 100.0), Vec2::new(65.0, 30.0), BlockKind::Normal),
            Block::new(Vec2::new(365.0, 100.0), Vec2::new(65.0, 30.0), BlockKind::Normal),
        ];
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], None, &blocks);
        let ball = ball_at(Vec2::new(332.5, 200.0), Vec2::NEG_Y);

        let result = simulate_step(&ball, Vec2::new(0.0, -100.0), ball.pos, &ctx, &blocks, 0.05);
        assert_eq!(result.obstacle, Some(Obstacle::Block(BlockId(1))));
        assert!((result.direction - Vec2::Y).length() < 1e-5);
        assert!(result.position.y > 125.0);
    }

    #[test]
    fn test_ball_inside_a_wall_is_pushed_out() {
        let walls = walls();
        let ctx = CollisionContext::new([&walls[0], &walls[1], &walls[2]], None, &[]);
        // Centre already inside the top wall's grown box, still heading up
        let ball = ball_at(Vec2::new(100.0, 18.0), Vec2::NEG_Y);

        let result = simulate_step(&ball, Vec2::new(0.0, -4.0), ball.pos, &ctx, &[], 0.05);
        assert!(result.position.y > 20.0);
        assert!(result.direction.y > 0.0);
    }
}
