use super::board::Board;
use super::types::{Mark, Position, WinningLine};

const fn cell(row: usize, col: usize) -> Position {
    Position { row, col }
}

/// The 8 winning lines: rows, then columns, then the two diagonals.
pub const LINES: [[Position; 3]; 8] = [
    [cell(0, 0), cell(0, 1), cell(0, 2)],
    [cell(1, 0), cell(1, 1), cell(1, 2)],
    [cell(2, 0), cell(2, 1), cell(2, 2)],
    [cell(0, 0), cell(1, 0), cell(2, 0)],
    [cell(0, 1), cell(1, 1), cell(2, 1)],
    [cell(0, 2), cell(1, 2), cell(2, 2)],
    [cell(0, 0), cell(1, 1), cell(2, 2)],
    [cell(0, 2), cell(1, 1), cell(2, 0)],
];

pub fn has_line(board: &Board, mark: Mark) -> bool {
    if mark == Mark::Empty {
        return false;
    }
    LINES
        .iter()
        .any(|line| line.iter().all(|&pos| board.mark_at(pos) == mark))
}

pub fn check_win(board: &Board) -> Option<Mark> {
    check_win_with_line(board).map(|line| line.mark)
}

pub fn check_win_with_line(board: &Board) -> Option<WinningLine> {
    LINES.iter().find_map(|&cells| {
        let mark = board.mark_at(cells[0]);
        if mark != Mark::Empty && cells[1..].iter().all(|&pos| board.mark_at(pos) == mark) {
            Some(WinningLine { mark, cells })
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(rows: [&str; 3]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        let board = Board::new();

        assert_eq!(check_win(&board), None);
        assert!(!has_line(&board, Mark::First));
        assert!(!has_line(&board, Mark::Empty));
    }

    #[test]
    fn test_each_line_is_detected() {
        for line in LINES {
            let mut board = Board::new();
            for pos in line {
                board.set(pos.row, pos.col, Mark::Second).unwrap();
            }

            assert!(has_line(&board, Mark::Second));
            assert!(!has_line(&board, Mark::First));
            assert_eq!(check_win_with_line(&board).map(|l| l.cells), Some(line));
        }
    }

    #[test]
    fn test_mixed_line_does_not_win() {
        let board = board_from(["XXO", "...", "..."]);

        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_anti_diagonal_line_endpoints() {
        let board = board_from(["X.O", "XO.", "O.X"]);

        let line = check_win_with_line(&board).unwrap();

        assert_eq!(line.mark, Mark::Second);
        assert_eq!(line.start(), Position::new(0, 2));
        assert_eq!(line.end(), Position::new(2, 0));
    }
}
