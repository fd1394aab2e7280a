//! Threshold search that can be abandoned mid-tree.
//!
//! Same pruning as the sequential driver, plus a cancellation poll at every
//! node so a worker told to stop unwinds within a few make/unmake pairs
//! instead of finishing its whole subtree. A stopped search's score is
//! meaningless; callers must drop it.

use qubic_core::{Board, Move, Player};

use crate::cancel::CancelToken;

/// Returns `(score, line, stopped)`. When `stopped` is true the other two
/// fields are whatever was on hand and must not be used.
pub(crate) fn search(
    board: &mut Board,
    depth: u8,
    maximizing: bool,
    threshold: i64,
    cancel: &CancelToken,
) -> (i64, Vec<Move>, bool) {
    if cancel.is_cancelled() {
        return (0, Vec::new(), true);
    }

    if let Some(winner) = board.winner() {
        return (Board::win_score(winner), Vec::new(), false);
    }
    if depth == 0 {
        return (board.score(), Vec::new(), false);
    }
    let moves = board.valid_moves();
    if moves.is_empty() {
        return (board.score(), Vec::new(), false);
    }

    let player = if maximizing { Player::X } else { Player::O };
    let mut current = if maximizing { i64::MIN } else { i64::MAX };
    let mut best_line = Vec::new();

    for mv in moves {
        board.make_move(mv, player);
        let (score, line, stopped) = search(board, depth - 1, !maximizing, current, cancel);
        board.unmake_move(mv);

        if stopped {
            return (current, best_line, true);
        }

        if maximizing {
            if score > current {
                current = score;
                best_line = prepend(mv, line);
            }
            if current >= threshold {
                break;
            }
        } else {
            if score < current {
                current = score;
                best_line = prepend(mv, line);
            }
            if current <= threshold {
                break;
            }
        }
    }

    (current, best_line, false)
}

fn prepend(mv: Move, line: Vec<Move>) -> Vec<Move> {
    let mut out = Vec::with_capacity(line.len() + 1);
    out.push(mv);
    out.extend(line);
    out
}
