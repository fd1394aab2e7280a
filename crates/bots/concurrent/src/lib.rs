//! Concurrent minimax bots.
//!
//! The sequential drivers in `minimax_bot` settle a tree one branch at a
//! time; the bots here spread it over worker threads. Results travel over
//! bounded channels, pruning travels the other way as cooperative
//! cancellation, and the streaming variants surface improving candidates
//! while the search is still running.

mod cancel;
mod cancellable;
pub mod parallel;
pub mod stream;

pub use cancel::CancelToken;
pub use parallel::ForkPolicy;
pub use stream::{SearchUpdate, StreamPolicy};

use qubic_core::{Board, Bot, Coords, Move, Player};

/// Fan-out-at-the-root minimax: a worker per legal first move, sequential
/// below. The simplest way to put every core on the problem.
pub struct ConcurrentMinimaxBot {
    symbol: Player,
    depth: u8,
}

impl ConcurrentMinimaxBot {
    pub fn new(symbol: Player, depth: u8) -> Self {
        Self { symbol, depth }
    }
}

impl Bot for ConcurrentMinimaxBot {
    fn choose_move(&mut self, board: &mut Board) -> Option<(Move, Coords)> {
        if board.winner().is_some() {
            return None;
        }
        let (mv, _) = parallel::root_search(board, self.depth, self.symbol.is_maximizing())?;
        let coords = board.make_move(mv, self.symbol)?;
        Some((mv, coords))
    }

    fn name(&self) -> &str {
        "ConcurrentMinimax"
    }

    fn symbol(&self) -> Player {
        self.symbol
    }
}

/// Recursive fan-out with threshold pruning and cooperative cancellation.
pub struct ConcurrentAlphaBetaBot {
    symbol: Player,
    depth: u8,
    policy: ForkPolicy,
}

impl ConcurrentAlphaBetaBot {
    pub fn new(symbol: Player, depth: u8) -> Self {
        Self { symbol, depth, policy: ForkPolicy::default() }
    }

    pub fn with_policy(symbol: Player, depth: u8, policy: ForkPolicy) -> Self {
        Self { symbol, depth, policy }
    }
}

impl Bot for ConcurrentAlphaBetaBot {
    fn choose_move(&mut self, board: &mut Board) -> Option<(Move, Coords)> {
        if board.winner().is_some() {
            return None;
        }
        let (_, line) =
            parallel::deep_search_root(board, self.depth, self.symbol.is_maximizing(), self.policy);
        let mv = *line.first()?;
        let coords = board.make_move(mv, self.symbol)?;
        Some((mv, coords))
    }

    fn name(&self) -> &str {
        "ConcurrentAlphaBeta"
    }

    fn symbol(&self) -> Player {
        self.symbol
    }
}

/// Streams improving candidates while it thinks, then plays the final one.
pub struct StreamingBot {
    symbol: Player,
    depth: u8,
    policy: StreamPolicy,
}

impl StreamingBot {
    pub fn new(symbol: Player, depth: u8) -> Self {
        Self { symbol, depth, policy: StreamPolicy::default() }
    }

    /// The live emission channel for this bot's analysis of `board`, for
    /// callers that want to watch the candidates improve.
    pub fn analyze(&self, board: &Board) -> std::sync::mpsc::Receiver<SearchUpdate> {
        stream::stream_search(
            board,
            self.depth,
            self.symbol.is_maximizing(),
            self.policy,
            CancelToken::root(),
        )
    }
}

impl Bot for StreamingBot {
    fn choose_move(&mut self, board: &mut Board) -> Option<(Move, Coords)> {
        if board.winner().is_some() {
            return None;
        }
        let updates = self.analyze(board);
        let mut chosen = None;
        for update in updates {
            if update.is_final {
                chosen = update.mv;
                break;
            }
        }
        let mv = chosen?;
        let coords = board.make_move(mv, self.symbol)?;
        Some((mv, coords))
    }

    fn name(&self) -> &str {
        "Streaming"
    }

    fn symbol(&self) -> Player {
        self.symbol
    }
}

/// Runs full streaming searches at several depths at once and merges their
/// recommendations, preferring the deeper search on equal scores.
pub struct MultiDepthBot {
    symbol: Player,
    depths: Vec<u8>,
    policy: StreamPolicy,
}

impl MultiDepthBot {
    pub fn new(symbol: Player, depths: Vec<u8>) -> Self {
        Self { symbol, depths, policy: StreamPolicy::default() }
    }

    /// The merged emission channel for callers that want live analysis.
    pub fn analyze(&self, board: &Board) -> std::sync::mpsc::Receiver<SearchUpdate> {
        stream::multi_depth_stream(
            board,
            self.symbol.is_maximizing(),
            &self.depths,
            self.policy,
            CancelToken::root(),
        )
    }
}

impl Default for MultiDepthBot {
    /// The standard analysis ladder.
    fn default() -> Self {
        Self::new(Player::O, vec![3, 4, 5, 6, 7])
    }
}

impl Bot for MultiDepthBot {
    fn choose_move(&mut self, board: &mut Board) -> Option<(Move, Coords)> {
        if board.winner().is_some() {
            return None;
        }
        let updates = self.analyze(board);
        let mut chosen = None;
        for update in updates {
            if update.is_final {
                chosen = update.mv;
                break;
            }
        }
        let mv = chosen?;
        let coords = board.make_move(mv, self.symbol)?;
        Some((mv, coords))
    }

    fn name(&self) -> &str {
        "MultiDepth"
    }

    fn symbol(&self) -> Player {
        self.symbol
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;
