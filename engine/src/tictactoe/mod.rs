mod board;
mod bot_controller;
mod bot_scheduler;
mod error;
mod game_state;
mod peer_message;
mod session;
mod settings;
mod types;
mod win_detector;

#[cfg(test)]
mod test_support;

pub use board::Board;
pub use bot_controller::{calculate_minimax_move, find_winning_move, select_move};
pub use bot_scheduler::{BotScheduler, SharedSession, share_session};
pub use error::{BoardError, ConfigError, MoveError};
pub use game_state::{GameState, apply_move, reset};
pub use peer_message::{PeerAction, PeerMessage, PeerMessageError};
pub use session::{
    BotSeat, BotTicket, BotTurnOutcome, GameSession, MAX_PENDING_EVENTS, PeerEffect, PeerError,
    SessionConfig, SessionEvent, SessionSnapshot,
};
pub use settings::{MAX_BOT_THINKING_DELAY_MS, MatchSettings};
pub use types::{
    BOARD_SIZE, Difficulty, GameMode, GameResult, Mark, PlayerIdentity, Position, Scores,
    WinningLine,
};
pub use win_detector::{LINES, check_win, check_win_with_line};
