use super::*;
use crate::board::Board;
use crate::types::{Coords, Move, Player};

fn cube3() -> Board {
    Board::cube(3, 10)
}

#[test]
fn empty_board_evaluates_to_zero() {
    assert_eq!(evaluate(&cube3()), 0);
}

#[test]
fn corner_piece_counts_its_seven_lines() {
    // On 3x3x3 exactly 7 winnable segments pass through a corner (three
    // axial, three face-diagonal, one space-diagonal), each worth base^1.
    let mut board = cube3();
    board.make_move_str("A1", Player::X);
    assert_eq!(evaluate(&board), 70);
    assert_eq!(board.score(), 70);

    let mut board = cube3();
    board.make_move_str("A1", Player::O);
    assert_eq!(evaluate(&board), -70);
}

#[test]
fn center_move_gains_across_all_thirteen_lines() {
    // O holds (1,1,0); X drops onto it, landing in the cube's center
    // (1,1,1), which lies on all 13 direction segments. Twelve are X-only
    // (+10 each); the shared vertical column flips O's -10 to dead.
    let mut board = cube3();
    board.make_move_str("B2", Player::O);
    assert_eq!(board.score(), -50); // the bottom-face center sits on 5 lines

    let before = board.score();
    board.make_move_str("B2", Player::X);
    assert_eq!(board.score() - before, 12 * 10 + 10);
    assert_eq!(board.score(), evaluate(&board));
}

#[test]
fn mixed_segments_are_dead() {
    let mut board = cube3();
    board.make_move_str("A1", Player::X); // corner (0,0,0)
    board.make_move_str("B2", Player::O); // (1,1,0)
    board.make_move_str("B2", Player::O); // center (1,1,1)

    // The space diagonal and the bottom-face diagonal through the corner
    // now hold both colours and count for nobody.
    assert_eq!(board.score(), evaluate(&board));
    assert!(board.score() < 0, "two central O pieces outweigh one X corner");

    // A piece on a mixed line never reads as a win.
    let delta = placement_delta(&board, Coords::new(1, 1, 1));
    assert!(!delta.win);
}

#[test]
fn two_in_a_column_score_base_squared() {
    let mut board = cube3();
    board.make_move_str("A1", Player::X);
    board.make_move_str("A1", Player::X);
    // The column segment holds two X pieces: worth 10^2 rather than 2*10.
    assert_eq!(board.score(), evaluate(&board));
    let column = board.line(Coords::new(0, 0, 0), [0, 0, 1]).unwrap();
    assert_eq!(column, vec![Some(Player::X), Some(Player::X), None]);
}

#[test]
fn delta_reports_the_winning_move() {
    let mut board = cube3();
    board.make_move_str("A1", Player::X);
    board.make_move_str("A1", Player::X);
    board.make_move_str("A1", Player::X);
    // make_move set the cached flag; the top piece's delta still shows the
    // completed column.
    let delta = placement_delta(&board, Coords::new(0, 0, 2));
    assert!(delta.win);
    assert_eq!(board.winner(), Some(Player::X));
}

#[test]
fn delta_equals_score_difference_everywhere() {
    // Exercise every first move on the 3x3x3 board.
    for x in 0..3u8 {
        for y in 0..3u8 {
            let mut board = cube3();
            let mv = Move::new(x, y);
            board.make_move(mv, Player::X);
            assert_eq!(
                board.score(),
                evaluate(&board),
                "delta mismatch after first move {mv}"
            );
            board.unmake_move(mv);
            assert_eq!(board.score(), 0);
        }
    }
}

#[test]
fn win_score_is_signed_by_player() {
    assert_eq!(Board::win_score(Player::X), WIN_SCORE);
    assert_eq!(Board::win_score(Player::O), -WIN_SCORE);
    assert!(WIN_SCORE > 0);
}
