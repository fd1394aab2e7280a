//! Parallel minimax drivers.
//!
//! Two fan-out strategies over the same game tree:
//!
//! - [`root_search`] forks one worker per legal root move; each worker runs
//!   the sequential delta search on a private clone and reports over a
//!   bounded channel. No pruning crosses workers.
//! - [`deep_search_root`] forks recursively wherever the subtree is deep
//!   and wide enough to amortise a thread, combines the single-threshold
//!   pruning of the sequential driver with a shared best-score cell, and
//!   cancels the losing siblings cooperatively once a cutoff fires.
//!
//! Because siblings race, the move reported among equal-scoring candidates
//! depends on arrival order; the score itself does not.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use minimax_bot::delta;
use qubic_core::{Board, Move, Player};

use crate::cancel::CancelToken;
use crate::cancellable;

/// When to fork a subtree instead of searching it in place: only nodes
/// strictly deeper than `fork_depth` with strictly more than `fork_fanout`
/// children are worth a thread.
#[derive(Clone, Copy, Debug)]
pub struct ForkPolicy {
    pub fork_depth: u8,
    pub fork_fanout: usize,
}

impl Default for ForkPolicy {
    fn default() -> Self {
        Self { fork_depth: 2, fork_fanout: 2 }
    }
}

/// The best score a node has secured so far, shared with its racing
/// children: a child spawned late inherits the tightened bound.
struct SharedScore(AtomicI64);

impl SharedScore {
    fn new(initial: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(initial)))
    }

    fn get(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Move the bound toward `score` if it improves in the node's
    /// direction; lost races retry via compare-and-swap.
    fn update(&self, score: i64, maximizing: bool) {
        let _ = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                let better = if maximizing { score > current } else { score < current };
                better.then_some(score)
            });
    }
}

/// Root-parallel search: one worker per legal root move, each running the
/// sequential delta driver on its own clone. Returns the best root move
/// with its score, or `None` when there is no legal move.
pub fn root_search(board: &Board, depth: u8, maximizing: bool) -> Option<(Move, i64)> {
    let moves = board.valid_moves();
    if moves.is_empty() {
        return None;
    }
    let player = if maximizing { Player::X } else { Player::O };

    // A lone candidate is not worth a thread.
    if moves.len() == 1 {
        let mv = moves[0];
        let mut child = board.clone();
        child.make_move(mv, player);
        let (score, _) = delta::search(&mut child, depth.saturating_sub(1), !maximizing);
        return Some((mv, score));
    }

    let (tx, rx) = mpsc::sync_channel(moves.len());
    let mut handles = Vec::with_capacity(moves.len());
    for mv in moves {
        let mut child = board.clone();
        child.make_move(mv, player);
        let tx = tx.clone();
        let child_depth = depth.saturating_sub(1);
        handles.push(thread::spawn(move || {
            let (score, _) = delta::search(&mut child, child_depth, !maximizing);
            let _ = tx.send((mv, score));
        }));
    }
    drop(tx);

    let mut best: Option<(Move, i64)> = None;
    for (mv, score) in rx {
        let improved = match best {
            None => true,
            Some((_, b)) => {
                if maximizing {
                    score > b
                } else {
                    score < b
                }
            }
        };
        if improved {
            best = Some((mv, score));
        }
    }
    for handle in handles {
        let _ = handle.join();
    }
    best
}

/// Entry point for the deep-parallel driver: an unreachable root bound and
/// a fresh cancellation scope.
pub fn deep_search_root(
    board: &Board,
    depth: u8,
    maximizing: bool,
    policy: ForkPolicy,
) -> (i64, Vec<Move>) {
    let threshold = if maximizing { i64::MAX } else { i64::MIN };
    let mut owned = board.clone();
    deep_search(&mut owned, depth, maximizing, threshold, &CancelToken::root(), policy)
}

/// Threshold-pruned minimax that forks a worker per child wherever
/// `policy` allows, and otherwise falls back to the sequential driver.
///
/// Each fork gets a cancellation scope derived from its parent's; when a
/// node's best reaches its threshold it cancels the scope, which every
/// worker underneath observes at its next suspension point. The channel capacity covers
/// all workers so a send never blocks and the cancelling parent can drain
/// the stragglers without waiting.
fn deep_search(
    board: &mut Board,
    depth: u8,
    maximizing: bool,
    threshold: i64,
    cancel: &Arc<CancelToken>,
    policy: ForkPolicy,
) -> (i64, Vec<Move>) {
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

    // Shallow or narrow subtrees are cheaper in place than across threads.
    // A cancelled worker's value never leaves the worker, so the stopped
    // flag can be dropped here.
    if depth <= policy.fork_depth || moves.len() <= policy.fork_fanout {
        let (score, line, _stopped) = cancellable::search(board, depth, maximizing, threshold, cancel);
        return (score, line);
    }

    let player = if maximizing { Player::X } else { Player::O };
    let initial = if maximizing { i64::MIN } else { i64::MAX };
    let shared = SharedScore::new(initial);
    let scope = CancelToken::child(cancel);

    let (tx, rx) = mpsc::sync_channel::<(Move, i64)>(moves.len());
    let mut handles = Vec::with_capacity(moves.len());

    for mv in moves {
        if scope.is_cancelled() {
            break;
        }
        let mut child = board.clone();
        child.make_move(mv, player);

        let tx = tx.clone();
        let shared = Arc::clone(&shared);
        let scope = Arc::clone(&scope);
        let child_depth = depth - 1;

        handles.push(thread::spawn(move || {
            if scope.is_cancelled() {
                return;
            }
            // The bound this node has secured by now; later workers inherit
            // a tighter one than their earlier siblings did.
            let child_threshold = shared.get();
            let (score, _) = deep_search(
                &mut child,
                child_depth,
                !maximizing,
                child_threshold,
                &scope,
                policy,
            );

            if scope.is_cancelled() {
                return;
            }
            let _ = tx.send((mv, score));
        }));
    }
    drop(tx);

    let mut best_score = initial;
    let mut best_line = Vec::new();

    for (mv, score) in &rx {
        let improved = if maximizing { score > best_score } else { score < best_score };
        if improved {
            best_score = score;
            best_line = vec![mv];
            shared.update(best_score, maximizing);

            let cutoff = if maximizing {
                best_score >= threshold
            } else {
                best_score <= threshold
            };
            if cutoff {
                scope.cancel();
                break;
            }
        }
    }
    // Drain whatever the cancelled workers still sent, then let them finish.
    for _ in rx {}
    for handle in handles {
        let _ = handle.join();
    }

    (best_score, best_line)
}
