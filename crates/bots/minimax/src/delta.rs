//! Minimax over a single mutated board.
//!
//! Two optimisations over the naive search: leaves read the board's cached
//! score instead of recomputing it, and children are visited by
//! make/unmake on one owned board instead of cloning. Both rest on the
//! board keeping its cache exact through every mutation.

use qubic_core::{Board, Move, Player};

/// Depth-limited minimax with incremental evaluation. X maximises,
/// O minimises. Returns the root score and the principal variation.
pub fn search(board: &mut Board, depth: u8, maximizing: bool) -> (i64, Vec<Move>) {
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
    let mut best_score = if maximizing { i64::MIN } else { i64::MAX };
    let mut best_line = Vec::new();

    for mv in moves {
        board.make_move(mv, player);
        let (score, line) = search(board, depth - 1, !maximizing);
        board.unmake_move(mv);

        let improved = if maximizing { score > best_score } else { score < best_score };
        if improved {
            best_score = score;
            best_line = Vec::with_capacity(line.len() + 1);
            best_line.push(mv);
            best_line.extend(line);
        }
    }

    (best_score, best_line)
}
