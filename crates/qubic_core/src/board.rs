//! 3D gravity board with an incrementally maintained score.
//!
//! Pieces drop along `z`: a move names a column `(x, y)` and lands at the
//! column's current height. `make_move`/`unmake_move` keep the cached
//! heuristic score exact by applying the placement delta of the single cell
//! that changed, and keep a cached winner flag so search never needs a full
//! win scan on the hot path.

use crate::eval::{placement_delta, WIN_SCORE};
use crate::lines::{segment_counts, segment_fits, DIRECTIONS};
use crate::types::{Coords, Move, Player};

/// Board dimensions plus the in-a-row count needed to win.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dims {
    pub length: usize,
    pub width: usize,
    pub height: usize,
    pub win_length: usize,
}

impl Dims {
    pub fn new(length: usize, width: usize, height: usize, win_length: usize) -> Self {
        Self { length, width, height, win_length }
    }

    /// An `n`×`n`×`n` board where `n` in a row wins.
    pub fn cube(n: usize) -> Self {
        Self::new(n, n, n, n)
    }
}

impl Default for Dims {
    fn default() -> Self {
        Self::cube(4)
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    pub length: usize,
    pub width: usize,
    pub height: usize,
    pub win_length: usize,
    /// Flat occupancy grid, indexed `(x * width + y) * height + z`.
    grid: Vec<Option<Player>>,
    /// Pieces currently in each column, indexed `x * width + y`.
    heights: Vec<usize>,
    last_move: Option<Coords>,
    score: i64,
    winner: Option<Player>,
    base: i64,
    /// `base^0 ..= base^win_length`, so segment contributions are lookups.
    powers: Vec<i64>,
}

impl Board {
    /// Create an empty board. Dimensions must be positive with
    /// `win_length <= min(length, width, height)`, and `base >= 2`;
    /// anything else is a configuration bug, not a runtime condition.
    pub fn new(dims: Dims, base: i64) -> Self {
        let Dims { length, width, height, win_length } = dims;
        assert!(length > 0 && width > 0 && height > 0, "empty board dimensions");
        assert!(length <= 26, "columns are lettered A-Z");
        assert!(width <= 256, "row numbers stop at 256");
        assert!(
            win_length >= 1 && win_length <= length.min(width).min(height),
            "win length must fit inside the board"
        );
        assert!(base >= 2, "scoring base must be at least 2");

        let mut powers = Vec::with_capacity(win_length + 1);
        let mut p = 1i64;
        for _ in 0..=win_length {
            powers.push(p);
            p = p.saturating_mul(base);
        }

        Self {
            length,
            width,
            height,
            win_length,
            grid: vec![None; length * width * height],
            heights: vec![0; length * width],
            last_move: None,
            score: 0,
            winner: None,
            base,
            powers,
        }
    }

    /// An `n`×`n`×`n` board, `n` in a row to win.
    pub fn cube(n: usize, base: i64) -> Self {
        Self::new(Dims::cube(n), base)
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.length, self.width, self.height, self.win_length)
    }

    pub fn base(&self) -> i64 {
        self.base
    }

    pub fn powers(&self) -> &[i64] {
        &self.powers
    }

    /// Cached heuristic score; equal to `eval::evaluate(self)` at all times.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Cached winner. Set by the move that completed a line, cleared by
    /// `unmake_move`.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn last_move(&self) -> Option<Coords> {
        self.last_move
    }

    #[inline]
    fn cell_index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.width + y) * self.height + z
    }

    #[inline]
    pub(crate) fn piece_at_raw(&self, x: usize, y: usize, z: usize) -> Option<Player> {
        self.grid[self.cell_index(x, y, z)]
    }

    pub fn piece_at(&self, at: Coords) -> Option<Player> {
        self.piece_at_raw(at.x, at.y, at.z)
    }

    pub fn height_at(&self, x: usize, y: usize) -> usize {
        self.heights[x * self.width + y]
    }

    /// All columns that still have room, in column-major order.
    pub fn valid_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.length * self.width);
        self.valid_moves_into(&mut moves);
        moves
    }

    /// Allocation-reusing variant of [`valid_moves`](Self::valid_moves).
    pub fn valid_moves_into(&self, moves: &mut Vec<Move>) {
        moves.clear();
        for x in 0..self.length {
            for y in 0..self.width {
                if self.heights[x * self.width + y] < self.height {
                    moves.push(Move::new(x as u8, y as u8));
                }
            }
        }
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&h| h >= self.height)
    }

    /// Drop `player`'s piece into the column named by `mv`. Returns the
    /// landing coordinates, or `None` for an out-of-range column or a full
    /// one; the board is untouched in that case.
    pub fn make_move(&mut self, mv: Move, player: Player) -> Option<Coords> {
        let x = mv.x as usize;
        let y = mv.y as usize;
        if x >= self.length || y >= self.width {
            return None;
        }
        let z = self.heights[x * self.width + y];
        if z >= self.height {
            return None;
        }

        let idx = self.cell_index(x, y, z);
        self.grid[idx] = Some(player);
        self.heights[x * self.width + y] += 1;
        let coords = Coords::new(x, y, z);
        self.last_move = Some(coords);

        let delta = placement_delta(self, coords);
        self.score += delta.score;
        if delta.win {
            self.winner = Some(player);
        }

        Some(coords)
    }

    /// Parse-and-play convenience over [`make_move`](Self::make_move).
    pub fn make_move_str(&mut self, s: &str, player: Player) -> Option<Coords> {
        self.make_move(Move::parse(s)?, player)
    }

    /// Remove the top piece of the column named by `mv`. Returns the
    /// vacated coordinates, or `None` for an out-of-range or empty column.
    ///
    /// The winner flag is cleared unconditionally: the drivers only ever
    /// unwind moves they just made inside a terminal-free subtree, so there
    /// is no older win to rediscover.
    pub fn unmake_move(&mut self, mv: Move) -> Option<Coords> {
        let x = mv.x as usize;
        let y = mv.y as usize;
        if x >= self.length || y >= self.width {
            return None;
        }
        let h = self.heights[x * self.width + y];
        if h == 0 {
            return None;
        }
        let z = h - 1;
        let coords = Coords::new(x, y, z);

        // Delta of the piece while it is still on the board, then take it off.
        let delta = placement_delta(self, coords);
        let idx = self.cell_index(x, y, z);
        self.grid[idx] = None;
        self.heights[x * self.width + y] -= 1;
        self.score -= delta.score;
        self.winner = None;
        self.last_move = None;

        Some(coords)
    }

    /// Parse-and-unplay convenience over [`unmake_move`](Self::unmake_move).
    pub fn unmake_move_str(&mut self, s: &str) -> Option<Coords> {
        self.unmake_move(Move::parse(s)?)
    }

    /// Fresh full-board win scan. The cached [`winner`](Self::winner) is the
    /// fast path; this is the reference scan (and the naive driver's
    /// terminal test).
    pub fn check_win(&self) -> Option<Player> {
        for x in 0..self.length as i32 {
            for y in 0..self.width as i32 {
                for z in 0..self.height as i32 {
                    for dir in DIRECTIONS {
                        let start = [x, y, z];
                        if !segment_fits(self, start, dir) {
                            continue;
                        }
                        let (xs, os) = segment_counts(self, start, dir);
                        if xs as usize == self.win_length {
                            return Some(Player::X);
                        }
                        if os as usize == self.win_length {
                            return Some(Player::O);
                        }
                    }
                }
            }
        }
        None
    }

    /// The `win_length` cells starting at `start` stepping by `dir`, or
    /// `None` when the segment runs off the board.
    pub fn line(&self, start: Coords, dir: [i32; 3]) -> Option<Vec<Option<Player>>> {
        let s = [start.x as i32, start.y as i32, start.z as i32];
        if !segment_fits(self, s, dir) {
            return None;
        }
        let mut cells = Vec::with_capacity(self.win_length);
        for i in 0..self.win_length as i32 {
            cells.push(self.piece_at_raw(
                (s[0] + i * dir[0]) as usize,
                (s[1] + i * dir[1]) as usize,
                (s[2] + i * dir[2]) as usize,
            ));
        }
        Some(cells)
    }

    /// Score a decided board from `winner`'s side: `WIN_SCORE` for X,
    /// `-WIN_SCORE` for O.
    pub fn win_score(winner: Player) -> i64 {
        match winner {
            Player::X => WIN_SCORE,
            Player::O => -WIN_SCORE,
        }
    }
}

/// Board equality is position identity: dimensions, occupancy, and the
/// cached score/winner. The last-move record is excluded, since search
/// drivers churn through make/unmake pairs that cannot restore it, and two
/// boards reached by different histories are still the same position.
impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        self.length == other.length
            && self.width == other.width
            && self.height == other.height
            && self.win_length == other.win_length
            && self.base == other.base
            && self.grid == other.grid
            && self.heights == other.heights
            && self.score == other.score
            && self.winner == other.winner
    }
}

impl Eq for Board {}

impl Default for Board {
    fn default() -> Self {
        Self::new(Dims::default(), 10)
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
