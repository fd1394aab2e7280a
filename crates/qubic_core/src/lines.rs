//! Line scanning over the 13 canonical directions.
//!
//! Every straight line on the board is generated by exactly one of these
//! vectors: the nonzero triples in `{-1,0,1}^3` whose first nonzero
//! component is positive (the other half are the same lines walked
//! backwards).

use crate::board::Board;
use crate::types::Player;

pub const DIRECTIONS: [[i32; 3]; 13] = [
    // axial
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
    // face diagonals
    [1, 1, 0],
    [1, -1, 0],
    [1, 0, 1],
    [1, 0, -1],
    [0, 1, 1],
    [0, 1, -1],
    // space diagonals
    [1, 1, 1],
    [1, -1, -1],
    [1, 1, -1],
    [1, -1, 1],
];

#[inline]
pub fn in_bounds(board: &Board, x: i32, y: i32, z: i32) -> bool {
    x >= 0
        && (x as usize) < board.length
        && y >= 0
        && (y as usize) < board.width
        && z >= 0
        && (z as usize) < board.height
}

/// Whether the `win_length`-cell segment starting at `start` and stepping by
/// `dir` lies entirely on the board. Checking both endpoints is enough since
/// the steps are unit-sized.
#[inline]
pub fn segment_fits(board: &Board, start: [i32; 3], dir: [i32; 3]) -> bool {
    let n = board.win_length as i32 - 1;
    in_bounds(board, start[0], start[1], start[2])
        && in_bounds(
            board,
            start[0] + n * dir[0],
            start[1] + n * dir[1],
            start[2] + n * dir[2],
        )
}

/// Count the pieces of each player in a segment. Caller guarantees the
/// segment fits on the board.
#[inline]
pub fn segment_counts(board: &Board, start: [i32; 3], dir: [i32; 3]) -> (u32, u32) {
    let mut xs = 0;
    let mut os = 0;
    for i in 0..board.win_length as i32 {
        let cell = board.piece_at_raw(
            (start[0] + i * dir[0]) as usize,
            (start[1] + i * dir[1]) as usize,
            (start[2] + i * dir[2]) as usize,
        );
        match cell {
            Some(Player::X) => xs += 1,
            Some(Player::O) => os += 1,
            None => {}
        }
    }
    (xs, os)
}
