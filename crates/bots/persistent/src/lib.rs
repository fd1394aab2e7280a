//! A bot that keeps thinking on the opponent's time.
//!
//! Where the other drivers search from scratch on every turn, this one
//! owns a [`tree::SearchTree`] that persists between calls: background
//! workers deepen it while the opponent decides, and each played move,
//! ours or theirs, re-roots the tree onto the matching subtree instead of
//! throwing the work away.

pub mod tree;

use qubic_core::{Board, Bot, Coords, Move, Player};
use std::thread;

pub use tree::TreeConfig;

pub struct PersistentMinimaxBot {
    symbol: Player,
    cfg: TreeConfig,
    tree: Option<tree::SearchTree>,
}

impl PersistentMinimaxBot {
    pub fn new(symbol: Player) -> Self {
        Self::with_config(symbol, TreeConfig::default())
    }

    pub fn with_config(symbol: Player, cfg: TreeConfig) -> Self {
        Self { symbol, cfg, tree: None }
    }

    /// Live node count of the search tree; zero when no tree is running.
    pub fn node_count(&self) -> usize {
        self.tree.as_ref().map_or(0, |t| t.node_count())
    }

    /// The board the tree's root currently stands on, if a tree exists.
    pub fn root_board(&self) -> Option<Board> {
        self.tree.as_ref().map(|t| t.root_board())
    }

    fn teardown(&mut self) {
        if let Some(tree) = self.tree.take() {
            tree.close();
        }
    }

    /// Make sure the tree exists and agrees with the caller's board; any
    /// mismatch means our bookkeeping diverged, and the honest recovery is
    /// to start over from the caller's position.
    fn ensure_tree(&mut self, board: &Board) {
        let stale = match &self.tree {
            None => true,
            Some(tree) => tree.root_board() != *board,
        };
        if stale {
            self.teardown();
            self.tree = Some(tree::SearchTree::start(
                board.clone(),
                self.symbol.is_maximizing(),
                self.cfg.clone(),
            ));
        }
    }
}

impl Bot for PersistentMinimaxBot {
    fn choose_move(&mut self, board: &mut Board) -> Option<(Move, Coords)> {
        if board.winner().is_some() {
            return None;
        }
        self.ensure_tree(board);
        // Give a fresh tree a moment to grow its first layers.
        thread::sleep(self.cfg.warmup);

        let tree = self.tree.as_ref().expect("ensure_tree just built one");
        let mv = tree
            .best_move()
            .or_else(|| board.valid_moves().first().copied())?;
        let coords = board.make_move(mv, self.symbol)?;

        if !tree.move_root(mv) {
            // The tree never produced this child; rebuild on the next call.
            self.teardown();
        }
        Some((mv, coords))
    }

    fn name(&self) -> &str {
        "PersistentMinimax"
    }

    fn symbol(&self) -> Player {
        self.symbol
    }

    /// Re-root onto the opponent's move so none of the matching subtree's
    /// work is lost. An unknown move discards the tree; `choose_move`
    /// rebuilds from the caller's board next turn.
    fn opponent_move(&mut self, mv: Move) {
        let keep = match &self.tree {
            None => return,
            Some(tree) => tree.move_root(mv),
        };
        if !keep {
            self.teardown();
        }
    }

    fn close(&mut self) {
        self.teardown();
    }
}

impl Drop for PersistentMinimaxBot {
    fn drop(&mut self) {
        self.teardown();
    }
}
