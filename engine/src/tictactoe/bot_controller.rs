use crate::log;
use crate::session_rng::RandomSource;
use super::board::Board;
use super::types::{Difficulty, Mark, Position};

/// Easy tries the block/win heuristics on rolls `1..=3`.
const EASY_HEURISTIC_MAX_ROLL: u32 = 3;
/// Medium falls back to Easy on rolls `1..=4`.
const MEDIUM_EASY_MAX_ROLL: u32 = 4;
/// Medium blocks on rolls `1..=7`.
const MEDIUM_BLOCK_MAX_ROLL: u32 = 7;
/// Hard plays Medium on a roll of exactly 1.
const HARD_MEDIUM_ROLL: u32 = 1;

const WIN_SCORE: i32 = 10;

/// Picks the bot's next cell. `None` only for a full board (or an empty
/// `turn`), which the caller should never ask for.
pub fn select_move(
    board: &Board,
    turn: Mark,
    difficulty: Difficulty,
    rng: &mut impl RandomSource,
) -> Option<Position> {
    if board.is_full() {
        log!("select_move called on a full board:\n{}", board);
        return None;
    }

    match difficulty {
        Difficulty::Easy => calculate_easy_move(board, turn, rng),
        Difficulty::Medium => calculate_medium_move(board, turn, rng),
        Difficulty::Hard => calculate_hard_move(board, turn, rng),
    }
}

/// First empty cell, in row-major order, that completes a line for `mark`.
pub fn find_winning_move(board: &Board, mark: Mark) -> Option<Position> {
    board
        .empty_cells()
        .find(|&pos| board.with_mark(pos, mark).has_line(mark))
}

fn calculate_random_move(board: &Board, rng: &mut impl RandomSource) -> Option<Position> {
    let available_moves: Vec<Position> = board.empty_cells().collect();
    if available_moves.is_empty() {
        return None;
    }
    let idx = rng.index(available_moves.len());
    Some(available_moves[idx])
}

fn calculate_easy_move(board: &Board, mark: Mark, rng: &mut impl RandomSource) -> Option<Position> {
    if rng.roll_d10() <= EASY_HEURISTIC_MAX_ROLL {
        if let Some(opponent) = mark.opponent()
            && let Some(block) = find_winning_move(board, opponent)
        {
            return Some(block);
        }
        if let Some(win) = find_winning_move(board, mark) {
            return Some(win);
        }
    }

    calculate_random_move(board, rng)
}

fn calculate_medium_move(board: &Board, mark: Mark, rng: &mut impl RandomSource) -> Option<Position> {
    if rng.roll_d10() <= MEDIUM_EASY_MAX_ROLL {
        return calculate_easy_move(board, mark, rng);
    }

    if let Some(win) = find_winning_move(board, mark) {
        return Some(win);
    }

    if rng.roll_d10() <= MEDIUM_BLOCK_MAX_ROLL
        && let Some(opponent) = mark.opponent()
        && let Some(block) = find_winning_move(board, opponent)
    {
        return Some(block);
    }

    if board.mark_at(Position::CENTER).is_empty() && rng.coin() {
        return Some(Position::CENTER);
    }

    calculate_random_move(board, rng)
}

fn calculate_hard_move(board: &Board, mark: Mark, rng: &mut impl RandomSource) -> Option<Position> {
    if rng.roll_d10() == HARD_MEDIUM_ROLL {
        return calculate_medium_move(board, mark, rng);
    }

    calculate_minimax_move(board, mark)
}

/// Optimal move for `bot_mark` by exhaustive search. Ties keep the first
/// cell in row-major order.
pub fn calculate_minimax_move(board: &Board, bot_mark: Mark) -> Option<Position> {
    let opponent_mark = bot_mark.opponent()?;

    let mut best_move = None;
    let mut best_score = i32::MIN;

    for pos in board.empty_cells() {
        let child = board.with_mark(pos, bot_mark);
        let score = minimax(&child, 0, false, bot_mark, opponent_mark);

        if score > best_score {
            best_score = score;
            best_move = Some(pos);
        }
    }

    best_move
}

fn minimax(board: &Board, depth: i32, is_maximizing: bool, bot_mark: Mark, opponent_mark: Mark) -> i32 {
    if board.has_line(bot_mark) {
        return WIN_SCORE - depth;
    }
    if board.has_line(opponent_mark) {
        return depth - WIN_SCORE;
    }
    if board.is_full() {
        return 0;
    }

    let mover = if is_maximizing { bot_mark } else { opponent_mark };
    let scores = board.empty_cells().map(|pos| {
        minimax(
            &board.with_mark(pos, mover),
            depth + 1,
            !is_maximizing,
            bot_mark,
            opponent_mark,
        )
    });

    let best = if is_maximizing { scores.max() } else { scores.min() };
    best.unwrap_or(0)
}
