//! Random-move bot.
//!
//! Picks uniformly among the legal columns. Useful as the baseline any
//! real driver should crush, and for stress-driving the board code in
//! arena games.

use qubic_core::{Board, Bot, Coords, Move, Player};
use rand::seq::SliceRandom;
use rand::thread_rng;

#[cfg(test)]
mod lib_tests;

#[derive(Debug, Clone)]
pub struct RandomBot {
    symbol: Player,
}

impl RandomBot {
    pub fn new(symbol: Player) -> Self {
        Self { symbol }
    }
}

impl Bot for RandomBot {
    fn choose_move(&mut self, board: &mut Board) -> Option<(Move, Coords)> {
        if board.winner().is_some() {
            return None;
        }
        let moves = board.valid_moves();
        let mv = *moves.choose(&mut thread_rng())?;
        let coords = board.make_move(mv, self.symbol)?;
        Some((mv, coords))
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn symbol(&self) -> Player {
        self.symbol
    }
}
