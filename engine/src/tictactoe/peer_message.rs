use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::validate_display_name;
use super::types::{BOARD_SIZE, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerAction {
    Start,
    Move,
    Reset,
    End,
}

/// Message exchanged between two devices in a peer match.
///
/// Serialized as `{"action": "move", "row": 0, "col": 2}`; absent optional
/// fields are omitted. Coordinates are signed on the wire so negative values
/// from a misbehaving peer surface as [`PeerMessageError::OutOfRange`] instead
/// of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerMessage {
    pub action: PeerAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

impl PeerMessage {
    fn bare(action: PeerAction) -> Self {
        Self {
            action,
            row: None,
            col: None,
            player_name: None,
        }
    }

    pub fn start(player_name: impl Into<String>) -> Self {
        Self {
            player_name: Some(player_name.into()),
            ..Self::bare(PeerAction::Start)
        }
    }

    pub fn move_to(position: Position) -> Self {
        Self {
            row: Some(position.row as i64),
            col: Some(position.col as i64),
            ..Self::bare(PeerAction::Move)
        }
    }

    pub fn reset() -> Self {
        Self::bare(PeerAction::Reset)
    }

    pub fn end() -> Self {
        Self::bare(PeerAction::End)
    }

    pub fn validate(&self) -> Result<(), PeerMessageError> {
        match self.action {
            PeerAction::Move => self.position().map(|_| ()),
            PeerAction::Start => match self.player_name {
                Some(ref name) => validate_display_name("playerName", name)
                    .map_err(PeerMessageError::InvalidPlayerName),
                None => Ok(()),
            },
            PeerAction::Reset | PeerAction::End => Ok(()),
        }
    }

    /// Board cell carried by a `move` message.
    pub fn position(&self) -> Result<Position, PeerMessageError> {
        let (Some(row), Some(col)) = (self.row, self.col) else {
            return Err(PeerMessageError::MissingCoordinates);
        };
        let in_range = |v: i64| (0..BOARD_SIZE as i64).contains(&v);
        if !in_range(row) || !in_range(col) {
            return Err(PeerMessageError::OutOfRange { row, col });
        }
        Ok(Position::new(row as usize, col as usize))
    }

    pub fn to_json(&self) -> Result<String, PeerMessageError> {
        serde_json::to_string(self).map_err(|e| PeerMessageError::Malformed(e.to_string()))
    }

    /// Parses and validates one message.
    pub fn from_json(content: &str) -> Result<Self, PeerMessageError> {
        let message: PeerMessage =
            serde_json::from_str(content).map_err(|e| PeerMessageError::Malformed(e.to_string()))?;
        message.validate()?;
        Ok(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerMessageError {
    Malformed(String),
    MissingCoordinates,
    OutOfRange { row: i64, col: i64 },
    InvalidPlayerName(String),
}

impl fmt::Display for PeerMessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerMessageError::Malformed(e) => write!(f, "Malformed peer message: {}", e),
            PeerMessageError::MissingCoordinates => write!(f, "Move message needs row and col"),
            PeerMessageError::OutOfRange { row, col } => {
                write!(f, "Move ({}, {}) is outside the 3x3 board", row, col)
            }
            PeerMessageError::InvalidPlayerName(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PeerMessageError {}
