//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation one step at a time.

use glam::Vec2;
use rand::Rng;

use super::context::{CollisionContext, WallSide};
use super::motion::advance_ball;
use super::state::{Block, BlockKind, GameEvent, GamePhase, GameState, MoveDirection};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held paddle direction
    pub movement: MoveDirection,
    /// Start a game, or serve the ball (space)
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Throw away the current run and start over
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.restart {
        start_game(state);
    }

    if input.launch {
        match state.phase {
            GamePhase::NotStarted | GamePhase::GameOver | GamePhase::Won => start_game(state),
            GamePhase::AwaitingServe => {
                state.spawn_ball();
                if state.ball.is_some() {
                    state.phase = GamePhase::Running;
                    events.push(GameEvent::Served);
                }
            }
            GamePhase::Running | GamePhase::Paused => {}
        }
    }

    if input.pause {
        match state.phase {
            GamePhase::Running => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Running,
            _ => {}
        }
    }

    // Don't tick if paused or not started
    if matches!(state.phase, GamePhase::Paused | GamePhase::NotStarted) {
        return events;
    }

    state.time_ticks += 1;

    let min_x = state.wall(WallSide::Left).bounds.max.x;
    let max_x = state.wall(WallSide::Right).bounds.min.x;
    if let Some(paddle) = state.paddle.as_mut() {
        paddle.motion = input.movement;
        paddle.advance(dt, min_x, max_x);
    }

    if state.phase != GamePhase::GameOver {
        // Rebuilt every tick: block liveness changes as blocks break
        let context =
            CollisionContext::new(state.walls.each_ref(), state.paddle.as_ref(), &state.blocks);
        if let Some(ball) = state.ball.as_mut() {
            let report = advance_ball(ball, &mut state.blocks, &context, &state.tuning, dt);
            state.score += report.score;
            events.extend(report.events);
        }
    }

    check_end_conditions(state, &mut events);

    events
}

fn check_end_conditions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(ball) = &state.ball else {
        return;
    };

    if state.score >= state.max_score {
        log::info!("Level cleared with score {}", state.score);
        state.ball = None;
        state.phase = GamePhase::Won;
        events.push(GameEvent::Won);
    } else if state.phase == GamePhase::Running && ball.pos.y > state.tuning.arena_size.y {
        state.ball = None;
        state.lives = state.lives.saturating_sub(1);
        events.push(GameEvent::BallLost {
            lives_left: state.lives,
        });
        if state.lives == 0 {
            log::info!("Game over with score {}", state.score);
            state.phase = GamePhase::GameOver;
            events.push(GameEvent::GameOver);
        } else {
            log::info!("Ball lost, {} lives left", state.lives);
            state.phase = GamePhase::AwaitingServe;
        }
    }
}

/// Reset score and lives, lay out a fresh level and wait for the serve
pub fn start_game(state: &mut GameState) {
    state.phase = GamePhase::AwaitingServe;
    state.score = 0;
    state.lives = state.tuning.lives;
    state.ball = None;
    generate_level(state);
    state.spawn_paddle();
}

/// Generate the block grid.
///
/// Blocks are laid out row by row from the top-left, so later rows sit nearer
/// the paddle. Each kind is drawn from the tuning's block mix.
pub fn generate_level(state: &mut GameState) {
    let tuning = &state.tuning;
    let size = tuning.block_size;
    let mix = tuning.block_mix;
    let total = mix.total();
    let origin = Vec2::splat(crate::consts::BLOCK_GRID_OFFSET) + size * 0.5;

    let mut blocks = Vec::with_capacity(tuning.block_columns * tuning.block_rows);
    for row in 0..tuning.block_rows {
        for column in 0..tuning.block_columns {
            let roll = state.rng.random::<f32>() * total;
            let kind = if roll < mix.normal {
                BlockKind::Normal
            } else if roll < mix.normal + mix.booster {
                BlockKind::Booster
            } else {
                BlockKind::Reinforced
            };

            let pos = origin + Vec2::new(column as f32, row as f32) * size;
            blocks.push(Block::new(pos, size, kind));
        }
    }

    state.max_score = blocks.iter().map(Block::score).sum();
    state.blocks = blocks;
    log::info!(
        "Level generated: {} blocks, max score {}",
        state.blocks.len(),
        state.max_score
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::Ball;
    use crate::tuning::Tuning;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        tick(
            &mut state,
            &TickInput {
                launch: true,
                ..Default::default()
            },
            SIM_DT,
        );
        state
    }

    #[test]
    fn test_start_then_serve() {
        let mut state = GameState::new(7, Tuning::default());
        assert_eq!(state.phase, GamePhase::NotStarted);

        // Nothing moves before the game starts
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 0);

        let mut state = started(7);
        assert_eq!(state.phase, GamePhase::AwaitingServe);
        assert_eq!(state.blocks.len(), 60);
        assert!(state.paddle.is_some());
        assert!(state.ball.is_none());

        let events = tick(
            &mut state,
            &TickInput {
                launch: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.phase, GamePhase::Running);
        assert!(events.contains(&GameEvent::Served));
        let ball = state.ball.as_ref().unwrap();
        assert!(ball.direction().y < 0.0);
        // Within the 30 degree serve cone
        assert!(ball.direction().y <= -(30.0_f32.to_radians().cos()) + 1e-4);
    }

    #[test]
    fn test_level_layout_and_max_score() {
        let state = started(42);
        let expected: u32 = state.blocks.iter().map(|b| b.score()).sum();
        assert_eq!(state.max_score, expected);
        assert!(state.max_score >= 60 && state.max_score <= 180);
        assert_eq!(state.live_block_count(), 60);

        let first = state.blocks[0].pos;
        assert_eq!(first, Vec2::new(10.0 + 32.5, 10.0 + 15.0));
        // Row-major: index 12 starts the second row
        assert_eq!(state.blocks[12].pos.y, first.y + 30.0);
    }

    #[test]
    fn test_seeded_levels_repeat() {
        let a = started(99999);
        let b = started(99999);
        let kinds_a: Vec<_> = a.blocks.iter().map(|b| b.kind).collect();
        let kinds_b: Vec<_> = b.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(kinds_a, kinds_b);
    }

    #[test]
    fn test_pause_freezes_ball() {
        let mut state = started(1);
        tick(
            &mut state,
            &TickInput {
                launch: true,
                ..Default::default()
            },
            SIM_DT,
        );
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let before = state.ball.as_ref().unwrap().pos;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.ball.as_ref().unwrap().pos, before);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_ball_lost_below_arena() {
        let mut state = started(3);
        state.phase = GamePhase::Running;
        let mut ball = Ball::new(Vec2::new(200.0, 798.0), 10.0, 500.0);
        ball.set_direction(Vec2::Y);
        state.ball = Some(ball);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.ball.is_none());
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::AwaitingServe);
        assert!(events.contains(&GameEvent::BallLost { lives_left: 2 }));
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut state = started(3);
        state.phase = GamePhase::Running;
        state.lives = 1;
        let mut ball = Ball::new(Vec2::new(200.0, 798.0), 10.0, 500.0);
        ball.set_direction(Vec2::Y);
        state.ball = Some(ball);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_clearing_last_block_wins() {
        let mut state = started(5);
        state.phase = GamePhase::Running;
        state.blocks = vec![Block::new(
            Vec2::new(150.0, 100.0),
            Vec2::new(65.0, 30.0),
            BlockKind::Normal,
        )];
        state.max_score = 1;
        let mut ball = Ball::new(Vec2::new(100.0, 100.0), 10.0, 500.0);
        ball.set_direction(Vec2::X);
        state.ball = Some(ball);

        let events = tick(&mut state, &TickInput::default(), 1.0 / 60.0);
        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.live_block_count(), 0);
        assert!(events.contains(&GameEvent::Won));
    }

    #[test]
    fn test_paddle_stays_between_walls() {
        let mut state = started(11);
        let left = TickInput {
            movement: MoveDirection::Left,
            ..Default::default()
        };
        for _ in 0..240 {
            tick(&mut state, &left, SIM_DT);
        }
        let paddle = state.paddle.as_ref().unwrap();
        assert_eq!(paddle.pos.x, 10.0 + paddle.size.x * 0.5);
    }
}
