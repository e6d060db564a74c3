use std::fmt;

use super::types::{Mark, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    OutOfRange { row: usize, col: usize },
    CellOccupied { position: Position, occupant: Mark },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfRange { row, col } => {
                write!(f, "Position ({}, {}) is outside the 3x3 board", row, col)
            }
            BoardError::CellOccupied { position, occupant } => {
                write!(f, "Cell {} is already marked {}", position, occupant)
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// Why a move was refused. State is never changed when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    Board(BoardError),
    NotYourTurn { expected: Mark, actual: Mark },
    GameOver,
    /// `Mark::Empty` was given as the mark to place.
    EmptyMark,
    BotThinking,
    NotHumanTurn,
    MatchEnded,
}

impl MoveError {
    /// Occupied cells and out-of-turn moves; the cases callers treat as an
    /// ordinary rejected tap rather than a programming error.
    pub fn is_illegal_move(&self) -> bool {
        matches!(
            self,
            MoveError::Board(BoardError::CellOccupied { .. })
                | MoveError::NotYourTurn { .. }
                | MoveError::NotHumanTurn
        )
    }
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::Board(e) => write!(f, "{}", e),
            MoveError::NotYourTurn { expected, actual } => {
                write!(f, "Not your turn: expected {}, got {}", expected, actual)
            }
            MoveError::GameOver => write!(f, "Game is already over"),
            MoveError::EmptyMark => write!(f, "Cannot place an empty mark"),
            MoveError::BotThinking => write!(f, "Bot is still thinking"),
            MoveError::NotHumanTurn => write!(f, "That mark is played by the bot"),
            MoveError::MatchEnded => write!(f, "Match has ended"),
        }
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoveError::Board(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BoardError> for MoveError {
    fn from(e: BoardError) -> Self {
        MoveError::Board(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    DuplicateMark(Mark),
    EmptyMark,
    InvalidName(String),
    MissingDifficulty,
    UnexpectedDifficulty,
    BotMarkNotPlayer(Mark),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateMark(mark) => write!(f, "Both players use mark {}", mark),
            ConfigError::EmptyMark => write!(f, "Players must use the First or Second mark"),
            ConfigError::InvalidName(reason) => write!(f, "Invalid player name: {}", reason),
            ConfigError::MissingDifficulty => write!(f, "Bot games require a difficulty"),
            ConfigError::UnexpectedDifficulty => {
                write!(f, "Difficulty is only valid in bot games")
            }
            ConfigError::BotMarkNotPlayer(mark) => {
                write!(f, "Bot mark {} does not belong to a player", mark)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupied_cell_is_illegal_move() {
        let err = MoveError::from(BoardError::CellOccupied {
            position: Position::new(0, 0),
            occupant: Mark::First,
        });

        assert!(err.is_illegal_move());
        assert_eq!(err.to_string(), "Cell (0, 0) is already marked X");
    }

    #[test]
    fn test_out_of_range_is_not_illegal_move() {
        let err = MoveError::from(BoardError::OutOfRange { row: 3, col: 0 });

        assert!(!err.is_illegal_move());
        assert!(std::error::Error::source(&err).is_some());
    }
}
