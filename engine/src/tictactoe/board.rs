use std::fmt;

use super::error::BoardError;
use super::types::{BOARD_SIZE, Mark, Position, WinningLine};
use super::win_detector::{check_win_with_line, has_line};

/// The 3x3 grid. Cells are written once per game; only [`Board::clear`]
/// returns them to [`Mark::Empty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Mark; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses rows written with `X`, `O` and `.` (or space) for empty cells.
    pub fn from_rows(rows: [&str; BOARD_SIZE]) -> Result<Self, String> {
        let mut board = Self::new();
        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != BOARD_SIZE {
                return Err(format!("Row {} must have {} cells: '{}'", row, BOARD_SIZE, line));
            }
            for (col, ch) in chars.into_iter().enumerate() {
                board.cells[row][col] = match ch {
                    'X' | 'x' => Mark::First,
                    'O' | 'o' => Mark::Second,
                    '.' | ' ' => Mark::Empty,
                    other => return Err(format!("Unknown cell '{}' at ({}, {})", other, row, col)),
                };
            }
        }
        Ok(board)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Mark, BoardError> {
        let pos = checked_position(row, col)?;
        Ok(self.mark_at(pos))
    }

    pub fn set(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), BoardError> {
        let position = checked_position(row, col)?;
        let occupant = self.mark_at(position);
        if occupant != Mark::Empty {
            return Err(BoardError::CellOccupied { position, occupant });
        }
        self.cells[row][col] = mark;
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&cell| cell != Mark::Empty))
    }

    /// Empty cells in row-major order. Each call scans the board afresh.
    pub fn empty_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_empty())
                .map(move |(col, _)| Position::new(row, col))
        })
    }

    pub fn move_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| !cell.is_empty())
            .count()
    }

    pub fn has_line(&self, mark: Mark) -> bool {
        has_line(self, mark)
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        check_win_with_line(self)
    }

    /// Copy of this board with `mark` on an empty `pos`. Used by lookahead so
    /// the searched board is never the caller's.
    pub fn with_mark(&self, pos: Position, mark: Mark) -> Board {
        debug_assert!(self.mark_at(pos).is_empty(), "lookahead onto occupied cell {}", pos);
        let mut next = *self;
        next.cells[pos.row][pos.col] = mark;
        next
    }

    pub fn clear(&mut self) {
        self.cells = [[Mark::Empty; BOARD_SIZE]; BOARD_SIZE];
    }

    pub fn rows(&self) -> &[[Mark; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    pub(crate) fn mark_at(&self, pos: Position) -> Mark {
        self.cells[pos.row][pos.col]
    }
}

fn checked_position(row: usize, col: usize) -> Result<Position, BoardError> {
    let pos = Position::new(row, col);
    if pos.is_on_board() {
        Ok(pos)
    } else {
        Err(BoardError::OutOfRange { row, col })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}
