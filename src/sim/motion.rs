//! Continuous motion for one tick
//!
//! Spends the ball's travel for the tick in as many bounces as it takes,
//! applying gameplay consequences between steps.

use super::context::CollisionContext;
use super::state::{Ball, Block, BlockKind, GameEvent};
use super::step::{Obstacle, simulate_step};
use crate::consts::MAX_BOUNCES_PER_TICK;
use crate::tuning::Tuning;

/// What happened while the ball moved this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionReport {
    /// Score credited for destroyed blocks
    pub score: u32,
    pub bounces: u32,
    pub events: Vec<GameEvent>,
}

/// Move `ball` for `dt` seconds through `context`.
///
/// Only this loop mutates blocks; the step solver reads them.
pub fn advance_ball(
    ball: &mut Ball,
    blocks: &mut [Block],
    context: &CollisionContext<'_>,
    tuning: &Tuning,
    dt: f32,
) -> MotionReport {
    let mut report = MotionReport::default();
    let mut remaining = ball.speed * dt;

    while remaining > 0.0 {
        if report.bounces >= MAX_BOUNCES_PER_TICK {
            log::warn!(
                "Bounce limit reached with {:.3} units of travel left at {:?}",
                remaining,
                ball.pos
            );
            break;
        }

        let displacement = ball.direction() * remaining;
        let hit = simulate_step(
            ball,
            displacement,
            ball.pos,
            context,
            blocks,
            tuning.paddle_english,
        );

        ball.pos = hit.position;
        ball.set_direction(hit.direction);
        remaining = (remaining - hit.traveled * remaining).max(0.0);

        let Some(obstacle) = hit.obstacle else {
            break;
        };

        report.bounces += 1;
        log::debug!(
            "Ball hit {:?} at t={:.3}, leaving along {:?}",
            obstacle,
            hit.traveled,
            hit.direction
        );

        match obstacle {
            Obstacle::Paddle => ball.reset_speed_and_color(),
            Obstacle::Block(id) => {
                if let Some(block) = blocks.get_mut(id.0) {
                    if block.try_destroy() {
                        report.score += block.score();
                        report.events.push(GameEvent::BlockDestroyed {
                            id,
                            score: block.score(),
                        });
                    }
                    if block.kind == BlockKind::Booster {
                        ball.speed += tuning.ball_speed_increment;
                    }
                    ball.color = block.color();
                }
            }
            Obstacle::Wall(_) => {}
        }

        report.events.push(GameEvent::Bounce(obstacle));
    }

    report
}
