//! Brickfall headless runner
//!
//! Plays a seeded game with a paddle that chases the ball, logging what happens.
//!
//! Usage: `brickfall [tuning.json] [seed]`

use brickfall::consts::SIM_DT;
use brickfall::sim::{GameEvent, GamePhase, GameState, MoveDirection, TickInput, tick};
use brickfall::Tuning;

/// Ten minutes of play at the fixed tick rate
const MAX_TICKS: u64 = 10 * 60 * 120;

/// Dead zone before the paddle starts chasing
const CHASE_SLACK: f32 = 4.0;

fn chase_input(state: &GameState) -> TickInput {
    let launch = matches!(
        state.phase,
        GamePhase::NotStarted | GamePhase::AwaitingServe
    );

    let movement = match (&state.ball, &state.paddle) {
        (Some(ball), Some(paddle)) if ball.pos.x < paddle.pos.x - CHASE_SLACK => {
            MoveDirection::Left
        }
        (Some(ball), Some(paddle)) if ball.pos.x > paddle.pos.x + CHASE_SLACK => {
            MoveDirection::Right
        }
        _ => MoveDirection::None,
    };

    TickInput {
        movement,
        launch,
        ..Default::default()
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);

    log::info!("Brickfall starting with seed {seed}");
    let mut state = GameState::new(seed, tuning);

    let mut bounces = 0u64;
    let mut destroyed = 0u64;
    for _ in 0..MAX_TICKS {
        let input = chase_input(&state);
        for event in tick(&mut state, &input, SIM_DT) {
            match event {
                GameEvent::Bounce(_) => bounces += 1,
                GameEvent::BlockDestroyed { id, score } => {
                    destroyed += 1;
                    log::debug!("Block {} destroyed (+{score})", id.0);
                }
                _ => {}
            }
        }

        if matches!(state.phase, GamePhase::GameOver | GamePhase::Won) {
            break;
        }
    }

    log::info!(
        "Finished after {} ticks: phase {:?}, score {}/{}, {} lives left",
        state.time_ticks,
        state.phase,
        state.score,
        state.max_score,
        state.lives
    );
    log::info!(
        "{} blocks destroyed, {} still standing, {} bounces",
        destroyed,
        state.live_block_count(),
        bounces
    );
}
