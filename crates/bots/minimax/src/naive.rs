//! Unoptimised reference minimax.
//!
//! Re-evaluates the whole board at every leaf and runs a full win scan at
//! every node, cloning the board for each child. Strictly slower than the
//! delta search and kept as the semantic baseline the optimised drivers are
//! tested against.

use qubic_core::{evaluate, Board, Move, Player};

/// Depth-limited minimax over cloned boards. X maximises, O minimises.
/// Returns the root score and the principal variation; ties keep the
/// first-seen move in column-major order.
pub fn search(board: &Board, depth: u8, maximizing: bool) -> (i64, Vec<Move>) {
    if let Some(winner) = board.check_win() {
        return (Board::win_score(winner), Vec::new());
    }
    if depth == 0 {
        return (evaluate(board), Vec::new());
    }

    let moves = board.valid_moves();
    if moves.is_empty() {
        return (evaluate(board), Vec::new());
    }

    let player = if maximizing { Player::X } else { Player::O };
    let mut best_score = if maximizing { i64::MIN } else { i64::MAX };
    let mut best_line = Vec::new();

    for mv in moves {
        let mut child = board.clone();
        child.make_move(mv, player);

        let (score, line) = search(&child, depth - 1, !maximizing);

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
