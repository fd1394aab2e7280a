//! Minimax with single-threshold pruning.
//!
//! Instead of the classical `(alpha, beta)` window each node carries one
//! bound: the best score its parent has already secured in the parent's
//! own direction. A maximising node that reaches the threshold can stop,
//! since its minimising parent will never pick it, and symmetrically for
//! minimising nodes. At a max node the threshold plays the role of beta,
//! at a min node the role of alpha, so the pruning is the textbook one
//! with half the bookkeeping.

use qubic_core::{Board, Move, Player};

/// Root entry point. The root has no parent to disappoint, so it gets the
/// bound an indifferent parent would hold: `MAX` above a maximising root,
/// `MIN` below a minimising one. Neither can ever fire.
pub fn search_root(board: &mut Board, depth: u8, maximizing: bool) -> (i64, Vec<Move>) {
    let threshold = if maximizing { i64::MAX } else { i64::MIN };
    search(board, depth, maximizing, threshold)
}

/// Threshold-pruned minimax. `threshold` is the parent's current best; the
/// node abandons its remaining children as soon as its own best makes the
/// parent reject it.
pub fn search(board: &mut Board, depth: u8, maximizing: bool, threshold: i64) -> (i64, Vec<Move>) {
    if let Some(winner) = board.winner() {
        return (Board::win_score(winner), Vec::new());
    }
    if depth == 0 {
        return (board.score(), Vec::new());
    }

    let moves = board.valid_moves();
    if moves.is_empty() {
        return (board.score(), Vec::new());
    }

    let player = if maximizing { Player::X } else { Player::O };
    let mut current = if maximizing { i64::MIN } else { i64::MAX };
    let mut best_line = Vec::new();

    for mv in moves {
        board.make_move(mv, player);
        // The child prunes against what we have already secured.
        let (score, line) = search(board, depth - 1, !maximizing, current);
        board.unmake_move(mv);

        if maximizing {
            if score > current {
                current = score;
                best_line = prepend(mv, line);
            }
            if current >= threshold {
                break; // the minimising parent will not come this way
            }
        } else {
            if score < current {
                current = score;
                best_line = prepend(mv, line);
            }
            if current <= threshold {
                break; // the maximising parent will not come this way
            }
        }
    }

    (current, best_line)
}

fn prepend(mv: Move, line: Vec<Move>) -> Vec<Move> {
    let mut out = Vec::with_capacity(line.len() + 1);
    out.push(mv);
    out.extend(line);
    out
}
