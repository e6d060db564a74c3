use super::board::Board;
use super::error::MoveError;
use super::types::{GameResult, Mark, Position};

/// Places `turn` at `(row, col)` and classifies the board.
///
/// Only lines of `turn` are checked: a move cannot complete a line for the
/// other mark. A win takes precedence over a full board.
pub fn apply_move(board: &mut Board, turn: Mark, row: usize, col: usize) -> Result<GameResult, MoveError> {
    if turn.is_empty() {
        return Err(MoveError::EmptyMark);
    }
    board.set(row, col, turn)?;

    if board.has_line(turn) {
        return Ok(GameResult::Win(turn));
    }
    if board.is_full() {
        return Ok(GameResult::Draw);
    }
    Ok(GameResult::InProgress)
}

/// Clears the board and returns the mark that opens the next game.
pub fn reset(board: &mut Board) -> Mark {
    board.clear();
    Mark::First
}

/// Board plus the turn/result state machine.
///
/// `InProgress` moves to `InProgress`, `Win` or `Draw`; the terminal results
/// accept nothing until [`GameState::reset`].
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    turn: Mark,
    result: GameResult,
    last_move: Option<Position>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Mark::First,
            result: GameResult::InProgress,
            last_move: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    pub fn place_mark(&mut self, mark: Mark, row: usize, col: usize) -> Result<GameResult, MoveError> {
        if self.result.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if mark != self.turn {
            return Err(MoveError::NotYourTurn {
                expected: self.turn,
                actual: mark,
            });
        }

        let result = apply_move(&mut self.board, self.turn, row, col)?;
        self.last_move = Some(Position::new(row, col));
        self.result = result;

        if result == GameResult::InProgress {
            self.switch_turn();
        }

        Ok(result)
    }

    pub fn reset(&mut self) {
        self.turn = reset(&mut self.board);
        self.result = GameResult::InProgress;
        self.last_move = None;
    }

    fn switch_turn(&mut self) {
        if let Some(next) = self.turn.opponent() {
            self.turn = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::error::BoardError;

    fn play(state: &mut GameState, moves: &[(usize, usize)]) -> GameResult {
        let mut result = GameResult::InProgress;
        for &(row, col) in moves {
            result = state.place_mark(state.turn(), row, col).unwrap();
        }
        result
    }

    #[test]
    fn test_apply_move_rejects_empty_mark() {
        let mut board = Board::new();

        let result = apply_move(&mut board, Mark::Empty, 0, 0);

        assert_eq!(result, Err(MoveError::EmptyMark));
        assert_eq!(board.move_count(), 0);
    }

    #[test]
    fn test_new_game_starts_with_first() {
        let state = GameState::new();

        assert_eq!(state.turn(), Mark::First);
        assert_eq!(state.result(), GameResult::InProgress);
        assert_eq!(state.last_move(), None);
    }

    #[test]
    fn test_row_win_trace() {
        let mut state = GameState::new();

        let result = play(&mut state, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);

        assert_eq!(result, GameResult::Win(Mark::First));
        assert_eq!(state.turn(), Mark::First);
    }

    #[test]
    fn test_second_wins_on_anti_diagonal() {
        let mut state = GameState::new();

        let result = play(&mut state, &[(0, 0), (1, 1), (0, 1), (0, 2), (2, 2), (2, 0)]);

        assert_eq!(result, GameResult::Win(Mark::Second));
        assert_eq!(state.board().to_string(), "XXO\n.O.\nO.X");
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut state = GameState::new();

        let result = play(
            &mut state,
            &[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)],
        );

        assert_eq!(result, GameResult::Draw);
        assert!(state.board().is_full());
    }

    #[test]
    fn test_last_cell_classification() {
        let mut board = Board::from_rows(["XOX", "XOO", "O.X"]).unwrap();
        assert_eq!(apply_move(&mut board, Mark::First, 2, 1), Ok(GameResult::Draw));

        let mut board = Board::from_rows(["XOX", "OXO", "OX."]).unwrap();
        assert_eq!(apply_move(&mut board, Mark::First, 2, 2), Ok(GameResult::Win(Mark::First)));
    }

    #[test]
    fn test_occupied_cell_is_rejected_without_side_effects() {
        let mut state = GameState::new();
        state.place_mark(Mark::First, 0, 0).unwrap();
        let before = *state.board();

        let result = state.place_mark(Mark::Second, 0, 0);

        assert!(matches!(
            result,
            Err(MoveError::Board(BoardError::CellOccupied { .. }))
        ));
        assert_eq!(state.board(), &before);
        assert_eq!(state.turn(), Mark::Second);
    }

    #[test]
    fn test_out_of_turn_is_rejected() {
        let mut state = GameState::new();

        let result = state.place_mark(Mark::Second, 0, 0);

        assert_eq!(
            result,
            Err(MoveError::NotYourTurn {
                expected: Mark::First,
                actual: Mark::Second
            })
        );
        assert_eq!(state.board().move_count(), 0);
    }

    #[test]
    fn test_turn_alternates_until_terminal() {
        let mut state = GameState::new();
        let moves = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)];

        for (i, &(row, col)) in moves.iter().enumerate() {
            let mover = state.turn();
            let result = state.place_mark(mover, row, col).unwrap();
            if result.is_terminal() {
                assert_eq!(i, moves.len() - 1);
                assert_eq!(state.turn(), mover);
            } else {
                assert_eq!(Some(state.turn()), mover.opponent());
            }
        }
    }

    #[test]
    fn test_no_moves_after_terminal() {
        let mut state = GameState::new();
        play(&mut state, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);

        let result = state.place_mark(Mark::First, 2, 0);

        assert_eq!(result, Err(MoveError::GameOver));
        assert_eq!(state.board().get(2, 0), Ok(Mark::Empty));
    }

    #[test]
    fn test_cells_are_write_once() {
        let mut state = GameState::new();
        let moves = [(1, 1), (0, 0), (2, 2), (0, 2), (0, 1), (2, 1), (1, 0), (1, 2), (2, 0)];
        let mut history: Vec<Board> = vec![*state.board()];

        for &(row, col) in &moves {
            let _ = state.place_mark(state.turn(), row, col);
            let _ = state.place_mark(state.turn(), row, col);
            history.push(*state.board());
        }

        for window in history.windows(2) {
            for (prev_row, next_row) in window[0].rows().iter().zip(window[1].rows()) {
                for (prev, next) in prev_row.iter().zip(next_row) {
                    if !prev.is_empty() {
                        assert_eq!(prev, next);
                    }
                }
            }
        }
    }

    #[test]
    fn test_reset_clears_board_and_turn() {
        let mut state = GameState::new();
        play(&mut state, &[(0, 0), (1, 1)]);

        state.reset();

        assert_eq!(state.board(), &Board::new());
        assert_eq!(state.turn(), Mark::First);
        assert_eq!(state.result(), GameResult::InProgress);
        assert_eq!(state.last_move(), None);
    }
}
