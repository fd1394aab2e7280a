//! The parallel drivers race their workers, so the reported move may vary
//! between runs when candidates tie; the reported score must not.

use rayon::prelude::*;

use concurrent_bot::{parallel, ForkPolicy};
use qubic_core::{Board, Player};

fn contested_position() -> Board {
    let mut board = Board::cube(3, 10);
    board.make_move_str("B2", Player::X);
    board.make_move_str("A1", Player::O);
    board.make_move_str("C3", Player::X);
    board.make_move_str("B2", Player::O);
    board.make_move_str("A2", Player::X);
    board.make_move_str("C1", Player::O);
    board
}

#[test]
fn root_parallel_score_is_stable_over_a_hundred_runs() {
    let board = contested_position();
    let scores: Vec<i64> = (0..100)
        .into_par_iter()
        .map(|_| {
            let (_, score) = parallel::root_search(&board, 3, true).expect("moves exist");
            score
        })
        .collect();

    let first = scores[0];
    assert!(
        scores.iter().all(|&s| s == first),
        "parallel score must be deterministic, saw {:?}",
        scores
    );
}

#[test]
fn deep_parallel_score_is_stable_over_repeated_runs() {
    let board = contested_position();
    let scores: Vec<i64> = (0..50)
        .into_par_iter()
        .map(|_| {
            let (score, _) = parallel::deep_search_root(&board, 4, false, ForkPolicy::default());
            score
        })
        .collect();

    let first = scores[0];
    assert!(
        scores.iter().all(|&s| s == first),
        "deep-parallel score must be deterministic, saw {:?}",
        scores
    );
}
