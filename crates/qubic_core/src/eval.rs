//! Heuristic evaluation.
//!
//! Every `win_length`-cell segment that fits on the board contributes
//! `+base^n` when it holds `n > 0` X pieces and no O pieces, `-base^n` for
//! the mirror case, and nothing when both players are present (a mixed
//! segment can no longer be completed by either side). Exponential weights
//! make near-complete lines dominate any number of sparse threats.

use crate::board::Board;
use crate::lines::{segment_fits, segment_counts, DIRECTIONS};
use crate::types::{Coords, Player};

/// Score reported for a decided board. Half the integer range so that
/// search bookkeeping above it can never overflow.
pub const WIN_SCORE: i64 = i64::MAX / 2;

/// Result of scoring a single placement: the change to the board score and
/// whether the placed piece completed a winning line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delta {
    pub score: i64,
    pub win: bool,
}

#[inline]
fn contribution(powers: &[i64], xs: u32, os: u32) -> i64 {
    if xs > 0 && os == 0 {
        powers[xs as usize]
    } else if os > 0 && xs == 0 {
        -powers[os as usize]
    } else {
        0
    }
}

/// Full recomputation of the board score. The board caches this value and
/// maintains it incrementally; this function is the reference the cache is
/// measured against (and the leaf evaluation of the naive search).
pub fn evaluate(board: &Board) -> i64 {
    let powers = board.powers();
    let mut score = 0i64;
    for x in 0..board.length as i32 {
        for y in 0..board.width as i32 {
            for z in 0..board.height as i32 {
                for dir in DIRECTIONS {
                    let start = [x, y, z];
                    if !segment_fits(board, start, dir) {
                        continue;
                    }
                    let (xs, os) = segment_counts(board, start, dir);
                    score += contribution(powers, xs, os);
                }
            }
        }
    }
    score
}

/// Exact score delta of the piece currently at `at`.
///
/// Only segments through `at` can change, so for each direction we slide a
/// window across the cell (`win_length` start offsets) and sum the
/// difference between the segment's contribution with and without the
/// piece. The same per-segment counts reveal a completed line, so win
/// detection rides along for free.
///
/// The piece must be present in the grid: `make_move` calls this after
/// placing, `unmake_move` before clearing.
pub fn placement_delta(board: &Board, at: Coords) -> Delta {
    let placed = board
        .piece_at(at)
        .expect("placement_delta requires an occupied cell");
    let powers = board.powers();
    let win_length = board.win_length as i32;
    let (cx, cy, cz) = (at.x as i32, at.y as i32, at.z as i32);

    let mut delta = 0i64;
    let mut win = false;

    for dir in DIRECTIONS {
        for offset in -(win_length - 1)..=0 {
            let start = [
                cx + offset * dir[0],
                cy + offset * dir[1],
                cz + offset * dir[2],
            ];
            if !segment_fits(board, start, dir) {
                continue;
            }
            let (xs, os) = segment_counts(board, start, dir);
            let after = contribution(powers, xs, os);
            let before = match placed {
                Player::X => contribution(powers, xs - 1, os),
                Player::O => contribution(powers, xs, os - 1),
            };
            delta += after - before;

            let own = match placed {
                Player::X => xs,
                Player::O => os,
            };
            if own == board.win_length as u32 {
                win = true;
            }
        }
    }

    Delta { score: delta, win }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
