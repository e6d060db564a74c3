use std::fmt;
use std::time::Duration;

use tictactoe_engine::log;
use tictactoe_engine::tictactoe::{
    BotScheduler, BotSeat, BotTurnOutcome, ConfigError, GameMode, GameResult, GameSession, Mark,
    MoveError, PlayerIdentity, Scores, SessionConfig, SessionEvent, select_move, share_session,
};
use tictactoe_engine::SessionRng;

use crate::config::SimulatorConfig;

#[derive(Debug)]
pub enum SimulationError {
    Config(ConfigError),
    Move(MoveError),
    /// Neither seat produced a move on an unfinished board.
    Stalled { game: u32 },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "Invalid session config: {}", e),
            SimulationError::Move(e) => write!(f, "Move rejected: {}", e),
            SimulationError::Stalled { game } => write!(f, "Game {} stalled without a move", game),
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<MoveError> for SimulationError {
    fn from(e: MoveError) -> Self {
        SimulationError::Move(e)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub games: u32,
    pub scores: Scores,
    pub draws: u32,
    pub discarded_bot_moves: u32,
}

/// Self-play: the session's own bot holds Second, while First is driven
/// from outside through `submit_move` with an independent random stream.
pub async fn run_simulation(config: &SimulatorConfig, seed: u64) -> Result<SimulationReport, SimulationError> {
    let session_config = SessionConfig {
        session_id: format!("sim-{}", seed),
        mode: GameMode::Bot,
        players: [
            PlayerIdentity::new(format!("{} driver", config.first_difficulty), Mark::First),
            PlayerIdentity::new(format!("{} bot", config.second_difficulty), Mark::Second),
        ],
        bot: Some(BotSeat {
            mark: Mark::Second,
            difficulty: config.second_difficulty,
        }),
        scores: Scores::default(),
    };
    let session = share_session(GameSession::start(session_config, SessionRng::new(seed))?);
    let scheduler = BotScheduler::new(Duration::from_millis(config.bot_thinking_delay_ms));
    let mut driver_rng = SessionRng::new(seed.wrapping_add(1));
    let mut report = SimulationReport::default();

    for game in 1..=config.matches {
        loop {
            let (bot_turn, board, turn, result) = {
                let guard = session.lock().await;
                (guard.is_bot_turn(), *guard.board(), guard.turn(), guard.result())
            };
            if result.is_terminal() {
                break;
            }

            if bot_turn {
                match scheduler.play_bot_turn(&session).await {
                    Some(BotTurnOutcome::Played { .. }) => {}
                    Some(BotTurnOutcome::Rejected(e)) => return Err(e.into()),
                    Some(BotTurnOutcome::Stale) | None => return Err(SimulationError::Stalled { game }),
                }
                continue;
            }

            let Some(position) = select_move(&board, turn, config.first_difficulty, &mut driver_rng) else {
                return Err(SimulationError::Stalled { game });
            };
            session
                .lock()
                .await
                .submit_move(turn, position.row, position.col)?;
        }

        let mut guard = session.lock().await;
        for event in guard.take_events() {
            match event {
                SessionEvent::GameOver { result, scores } => {
                    report.games += 1;
                    if result == GameResult::Draw {
                        report.draws += 1;
                    }
                    log!(
                        "Game {}: {:?}, score {}-{}\n{}",
                        game, result, scores.first, scores.second, guard.board()
                    );
                }
                SessionEvent::BotMoveDiscarded { .. } => report.discarded_bot_moves += 1,
                _ => {}
            }
        }
        report.scores = guard.scores();

        if game < config.matches {
            guard.reset_for_rematch();
        }
    }

    session.lock().await.end_match();
    Ok(report)
}
