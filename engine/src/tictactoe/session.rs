use std::fmt;

use ringbuffer::{AllocRingBuffer, RingBuffer};

use crate::config::validate_display_name;
use crate::log;
use crate::session_rng::{RandomSource, SessionRng};
use super::board::Board;
use super::bot_controller::select_move;
use super::error::{ConfigError, MoveError};
use super::game_state::GameState;
use super::peer_message::{PeerAction, PeerMessage, PeerMessageError};
use super::types::{Difficulty, GameMode, GameResult, Mark, PlayerIdentity, Position, Scores, WinningLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotSeat {
    pub mark: Mark,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub session_id: String,
    pub mode: GameMode,
    pub players: [PlayerIdentity; 2],
    pub bot: Option<BotSeat>,
    /// Scores to continue from; zero for a fresh match.
    pub scores: Scores,
}

impl SessionConfig {
    pub fn local_two_player(
        session_id: impl Into<String>,
        first_name: impl Into<String>,
        second_name: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            mode: GameMode::LocalTwoPlayer,
            players: [
                PlayerIdentity::new(first_name, Mark::First),
                PlayerIdentity::new(second_name, Mark::Second),
            ],
            bot: None,
            scores: Scores::default(),
        }
    }

    /// Human plays First, the bot answers as Second.
    pub fn against_bot(
        session_id: impl Into<String>,
        human_name: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            mode: GameMode::Bot,
            players: [
                PlayerIdentity::new(human_name, Mark::First),
                PlayerIdentity::new("Bot", Mark::Second),
            ],
            bot: Some(BotSeat {
                mark: Mark::Second,
                difficulty,
            }),
            scores: Scores::default(),
        }
    }

    pub fn with_scores(mut self, scores: Scores) -> Self {
        self.scores = scores;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for player in &self.players {
            if player.mark == Mark::Empty {
                return Err(ConfigError::EmptyMark);
            }
            validate_display_name("display_name", &player.display_name)
                .map_err(ConfigError::InvalidName)?;
        }
        if self.players[0].mark == self.players[1].mark {
            return Err(ConfigError::DuplicateMark(self.players[0].mark));
        }

        match (self.mode, self.bot) {
            (GameMode::Bot, None) => Err(ConfigError::MissingDifficulty),
            (GameMode::Bot, Some(seat)) if seat.mark == Mark::Empty => {
                Err(ConfigError::BotMarkNotPlayer(seat.mark))
            }
            (GameMode::LocalTwoPlayer | GameMode::Peer, Some(_)) => {
                Err(ConfigError::UnexpectedDifficulty)
            }
            _ => Ok(()),
        }
    }
}

/// Oldest events are dropped once this many are waiting to be drained.
pub const MAX_PENDING_EVENTS: usize = 256;

/// Issued by [`GameSession::begin_bot_turn`]; consumed by
/// [`GameSession::complete_bot_turn`]. Only the most recently issued ticket
/// can play a move.
#[derive(Debug, PartialEq, Eq)]
pub struct BotTicket {
    mark: Mark,
    round: u64,
    serial: u64,
}

impl BotTicket {
    pub fn mark(&self) -> Mark {
        self.mark
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotTurnOutcome {
    Played { position: Position, result: GameResult },
    /// The session was reset, ended or moved on while the bot was thinking.
    Stale,
    Rejected(MoveError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MovePlayed {
        mark: Mark,
        position: Position,
        result: GameResult,
    },
    GameOver {
        result: GameResult,
        scores: Scores,
    },
    Reset {
        round: u64,
    },
    BotThinking {
        mark: Mark,
    },
    BotMoveDiscarded {
        mark: Mark,
    },
    MatchEnded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEffect {
    Started { player_name: Option<String> },
    Moved(GameResult),
    Reset,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerError {
    NotPeerSession,
    Message(PeerMessageError),
    Move(MoveError),
}

impl fmt::Display for PeerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerError::NotPeerSession => write!(f, "Peer messages are only accepted in peer games"),
            PeerError::Message(e) => write!(f, "{}", e),
            PeerError::Move(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PeerError {}

impl From<PeerMessageError> for PeerError {
    fn from(e: PeerMessageError) -> Self {
        PeerError::Message(e)
    }
}

impl From<MoveError> for PeerError {
    fn from(e: MoveError) -> Self {
        PeerError::Move(e)
    }
}

/// Everything the presentation layer reads to draw the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub board: Board,
    pub turn: Mark,
    pub scores: Scores,
    pub result: GameResult,
    pub thinking: bool,
    pub last_move: Option<Position>,
    pub winning_line: Option<WinningLine>,
    pub turn_text: String,
    pub result_text: Option<String>,
    pub round: u64,
}

/// One match between two players, optionally one of them a bot.
///
/// Board and turn reset between games; scores live as long as the session.
/// All mutation goes through `&mut self`, so a session shared with a
/// deferred bot turn sits behind a mutex (see `BotScheduler`).
pub struct GameSession<R: RandomSource = SessionRng> {
    session_id: String,
    mode: GameMode,
    players: [PlayerIdentity; 2],
    bot: Option<BotSeat>,
    state: GameState,
    scores: Scores,
    thinking: bool,
    ticket_serial: u64,
    round: u64,
    ended: bool,
    rng: R,
    pending_events: AllocRingBuffer<SessionEvent>,
}

impl<R: RandomSource> GameSession<R> {
    pub fn start(config: SessionConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let SessionConfig {
            session_id,
            mode,
            mut players,
            bot,
            scores,
        } = config;
        players.sort_by_key(|p| p.mark == Mark::Second);

        log!(
            "[session:{}] Started {:?} match: {} vs {}",
            session_id,
            mode,
            players[0].display_name,
            players[1].display_name
        );

        Ok(Self {
            session_id,
            mode,
            players,
            bot,
            state: GameState::new(),
            scores,
            thinking: false,
            ticket_serial: 0,
            round: 0,
            ended: false,
            rng,
            pending_events: AllocRingBuffer::new(MAX_PENDING_EVENTS),
        })
    }

    /// Human (or peer) move for `player`.
    pub fn submit_move(&mut self, player: Mark, row: usize, col: usize) -> Result<GameResult, MoveError> {
        let checked = self.check_human_move(player);
        let result = checked.and_then(|_| self.commit_move(player, row, col));
        if let Err(ref e) = result {
            log!(
                "[session:{}] Rejected move {} at ({}, {}): {}",
                self.session_id, player, row, col, e
            );
        }
        result
    }

    fn check_human_move(&self, player: Mark) -> Result<(), MoveError> {
        if self.ended {
            return Err(MoveError::MatchEnded);
        }
        if self.thinking {
            return Err(MoveError::BotThinking);
        }
        if self.bot.is_some_and(|seat| seat.mark == player) {
            return Err(MoveError::NotHumanTurn);
        }
        Ok(())
    }

    fn commit_move(&mut self, mark: Mark, row: usize, col: usize) -> Result<GameResult, MoveError> {
        let result = self.state.place_mark(mark, row, col)?;

        self.push_event(SessionEvent::MovePlayed {
            mark,
            position: Position::new(row, col),
            result,
        });

        if let GameResult::Win(winner) = result {
            self.scores.record_win(winner);
        }
        if result.is_terminal() {
            log!("[session:{}] Game over: {:?}", self.session_id, result);
            self.push_event(SessionEvent::GameOver {
                result,
                scores: self.scores,
            });
        }

        Ok(result)
    }

    pub fn is_bot_turn(&self) -> bool {
        !self.ended
            && self.state.result() == GameResult::InProgress
            && self.bot.is_some_and(|seat| seat.mark == self.state.turn())
    }

    /// Selects and plays the bot's move in one step. `None` when it is not
    /// the bot's turn or a bot turn is already in flight.
    pub fn request_bot_move(&mut self) -> Option<BotTurnOutcome> {
        let ticket = self.begin_bot_turn()?;
        Some(self.complete_bot_turn(ticket))
    }

    /// Marks the bot as thinking and hands out a ticket for the deferred move.
    pub fn begin_bot_turn(&mut self) -> Option<BotTicket> {
        if self.thinking || !self.is_bot_turn() {
            return None;
        }

        self.thinking = true;
        self.ticket_serial += 1;
        let mark = self.state.turn();
        self.push_event(SessionEvent::BotThinking { mark });
        Some(BotTicket {
            mark,
            round: self.round,
            serial: self.ticket_serial,
        })
    }

    /// Plays the ticket's move if the game it was issued for is still
    /// waiting on the bot, and clears the thinking flag.
    ///
    /// A ticket other than the one in flight is discarded without touching
    /// the flag, so it cannot end a newer bot turn early.
    pub fn complete_bot_turn(&mut self, ticket: BotTicket) -> BotTurnOutcome {
        if !self.thinking || ticket.serial != self.ticket_serial {
            return self.discard_ticket(&ticket);
        }

        let outcome = self.play_ticket(&ticket);
        self.thinking = false;
        outcome
    }

    fn discard_ticket(&mut self, ticket: &BotTicket) -> BotTurnOutcome {
        log!(
            "[session:{}] Discarding stale bot move for {} (round {})",
            self.session_id, ticket.mark, ticket.round
        );
        self.push_event(SessionEvent::BotMoveDiscarded { mark: ticket.mark });
        BotTurnOutcome::Stale
    }

    fn play_ticket(&mut self, ticket: &BotTicket) -> BotTurnOutcome {
        let still_current = ticket.round == self.round
            && ticket.mark == self.state.turn()
            && self.is_bot_turn();
        let Some(seat) = self.bot.filter(|_| still_current) else {
            return self.discard_ticket(ticket);
        };

        let Some(position) = select_move(self.state.board(), seat.mark, seat.difficulty, &mut self.rng) else {
            return BotTurnOutcome::Stale;
        };

        match self.commit_move(seat.mark, position.row, position.col) {
            Ok(result) => BotTurnOutcome::Played { position, result },
            Err(e) => {
                log!(
                    "[session:{}] Bot {} failed to place mark at {}: {}",
                    self.session_id, seat.mark, position, e
                );
                BotTurnOutcome::Rejected(e)
            }
        }
    }

    /// "Play again": fresh board, First to move, scores kept.
    ///
    /// A bot turn in flight is not cancelled here: `thinking` stays set, and
    /// human moves are refused with `BotThinking`, until its ticket comes
    /// back and is discarded as stale.
    pub fn reset_for_rematch(&mut self) {
        self.state.reset();
        self.round += 1;
        self.push_event(SessionEvent::Reset { round: self.round });
    }

    pub fn end_match(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        log!(
            "[session:{}] Match ended at {}-{}",
            self.session_id, self.scores.first, self.scores.second
        );
        self.push_event(SessionEvent::MatchEnded);
    }

    /// Applies a message received from the remote player, who plays `from`.
    pub fn apply_peer_message(&mut self, from: Mark, message: &PeerMessage) -> Result<PeerEffect, PeerError> {
        if self.mode != GameMode::Peer {
            return Err(PeerError::NotPeerSession);
        }
        message.validate()?;

        match message.action {
            PeerAction::Start => Ok(PeerEffect::Started {
                player_name: message.player_name.clone(),
            }),
            PeerAction::Move => {
                let position = message.position()?;
                let result = self.submit_move(from, position.row, position.col)?;
                Ok(PeerEffect::Moved(result))
            }
            PeerAction::Reset => {
                self.reset_for_rematch();
                Ok(PeerEffect::Reset)
            }
            PeerAction::End => {
                self.end_match();
                Ok(PeerEffect::Ended)
            }
        }
    }

    /// Drains queued events, oldest first. At most [`MAX_PENDING_EVENTS`]
    /// are kept between drains.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        self.pending_events.drain().collect()
    }

    fn push_event(&mut self, event: SessionEvent) {
        let _ = self.pending_events.enqueue(event);
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn turn(&self) -> Mark {
        self.state.turn()
    }

    pub fn result(&self) -> GameResult {
        self.state.result()
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn last_move(&self) -> Option<Position> {
        self.state.last_move()
    }

    pub fn bot_seat(&self) -> Option<BotSeat> {
        self.bot
    }

    /// Ordered First, Second.
    pub fn players(&self) -> &[PlayerIdentity; 2] {
        &self.players
    }

    pub fn player(&self, mark: Mark) -> Option<&PlayerIdentity> {
        self.players.iter().find(|p| p.mark == mark)
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        match self.state.result() {
            GameResult::Win(_) => self.state.board().winning_line(),
            _ => None,
        }
    }

    fn name_of(&self, mark: Mark) -> &str {
        self.player(mark).map_or("", |p| p.display_name.as_str())
    }

    pub fn turn_text(&self) -> String {
        if self.thinking {
            return "Bot is thinking...".to_string();
        }
        format!("{}'s Turn", self.name_of(self.state.turn()))
    }

    pub fn result_text(&self) -> Option<String> {
        match self.state.result() {
            GameResult::InProgress => None,
            GameResult::Win(winner) => Some(format!("{} Wins!", self.name_of(winner))),
            GameResult::Draw => Some("Draw".to_string()),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: *self.state.board(),
            turn: self.state.turn(),
            scores: self.scores,
            result: self.state.result(),
            thinking: self.thinking,
            last_move: self.state.last_move(),
            winning_line: self.winning_line(),
            turn_text: self.turn_text(),
            result_text: self.result_text(),
            round: self.round,
        }
    }
}
