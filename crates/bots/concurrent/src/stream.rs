//! Streaming search: candidates improve while the tree is still being cut.
//!
//! Every node owns a bounded channel its children report into. A child's
//! non-final updates show work in progress; its single final update carries
//! the settled value of that subtree. A node advances its own best on
//! child finals only, which keeps the emitted sequence strictly monotone
//! in the node's direction and makes the last emission equal to what the
//! sequential threshold driver would have returned. Each strict
//! improvement is forwarded upward before the node closes with its own
//! final.
//!
//! The consumer therefore sees, per search: zero or more strictly
//! improving `(move, score)` candidates, then exactly one update flagged
//! final, then a closed channel. Dropping the receiver mid-stream quietly
//! cancels the tree: the next send fails and the workers unwind.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use qubic_core::{Board, Move, Player};

use crate::cancel::CancelToken;
use crate::cancellable;

/// Scores at or beyond this magnitude abandon the remaining siblings: a
/// forced win dwarfs every heuristic value the evaluator can produce, so
/// nothing a sibling finds can displace it. Heuristic, and tunable.
const PRUNE_LIMIT: i64 = i64::MAX / 3;

/// One emission from a streaming search.
#[derive(Clone, Debug)]
pub struct SearchUpdate {
    /// The candidate move: the sender's incoming move between tree levels,
    /// the recommended root move on the stream handed to the caller.
    pub mv: Option<Move>,
    pub score: i64,
    /// Best continuation below the sender.
    pub pv: Vec<Move>,
    /// Root depth of the search this update belongs to (distinguishes the
    /// merged streams of the multi-depth variant).
    pub depth: u8,
    /// Set on the last update of a stream.
    pub is_final: bool,
}

/// How far down the tree each node gets its own streaming worker. Levels
/// below run the sequential threshold search inside their worker; threads
/// are too expensive to hand one to every node of a deep tree.
#[derive(Clone, Copy, Debug)]
pub struct StreamPolicy {
    pub spawn_levels: u8,
    pub fork_fanout: usize,
}

impl Default for StreamPolicy {
    fn default() -> Self {
        Self { spawn_levels: 2, fork_fanout: 2 }
    }
}

/// Launch a streaming search and hand back its emission channel.
pub fn stream_search(
    board: &Board,
    depth: u8,
    maximizing: bool,
    policy: StreamPolicy,
    cancel: Arc<CancelToken>,
) -> mpsc::Receiver<SearchUpdate> {
    let (tx, rx) = mpsc::sync_channel(emission_capacity(depth));
    let owned = board.clone();
    thread::spawn(move || {
        stream_node(owned, None, depth, depth, maximizing, 0, policy, &cancel, &tx);
    });
    rx
}

/// Room for every improvement a stream can emit plus its final, so a
/// producer outrunning its consumer parks instead of deadlocking.
fn emission_capacity(depth: u8) -> usize {
    depth as usize * 8 + 8
}

#[allow(clippy::too_many_arguments)]
fn stream_node(
    mut board: Board,
    tag: Option<Move>,
    root_depth: u8,
    depth: u8,
    maximizing: bool,
    level: u8,
    policy: StreamPolicy,
    cancel: &Arc<CancelToken>,
    out: &mpsc::SyncSender<SearchUpdate>,
) {
    if cancel.is_cancelled() {
        return;
    }

    let send_final = |score: i64, pv: Vec<Move>| {
        let mv = tag.or_else(|| pv.first().copied());
        let _ = out.send(SearchUpdate { mv, score, pv, depth: root_depth, is_final: true });
    };

    if let Some(winner) = board.winner() {
        send_final(Board::win_score(winner), Vec::new());
        return;
    }
    if depth == 0 {
        send_final(board.score(), Vec::new());
        return;
    }
    let moves = board.valid_moves();
    if moves.is_empty() {
        send_final(board.score(), Vec::new());
        return;
    }

    // Below the streaming levels the subtree is settled in one piece. A
    // sibling's race is no constraint, so the search runs with the
    // unreachable root bound and its result is exact.
    if level >= policy.spawn_levels || moves.len() <= policy.fork_fanout {
        let bound = if maximizing { i64::MAX } else { i64::MIN };
        let (score, line, stopped) = cancellable::search(&mut board, depth, maximizing, bound, cancel);
        if !stopped {
            send_final(score, line);
        }
        return;
    }

    let player = if maximizing { Player::X } else { Player::O };
    let scope = CancelToken::child(cancel);
    let (tx, rx) = mpsc::sync_channel::<SearchUpdate>(moves.len() * emission_capacity(depth));
    let mut handles = Vec::with_capacity(moves.len());

    for mv in moves {
        if scope.is_cancelled() {
            break;
        }
        let mut child = board.clone();
        child.make_move(mv, player);
        let tx = tx.clone();
        let scope = Arc::clone(&scope);
        handles.push(thread::spawn(move || {
            stream_node(
                child,
                Some(mv),
                root_depth,
                depth - 1,
                !maximizing,
                level + 1,
                policy,
                &scope,
                &tx,
            );
        }));
    }
    drop(tx);

    let mut best: Option<(i64, Vec<Move>)> = None;

    for update in &rx {
        // Settled subtrees move the needle; in-flight estimates from a
        // child are optimistic in the wrong direction and only watched.
        if !update.is_final {
            continue;
        }
        let score = update.score;
        let improved = match &best {
            None => true,
            Some((b, _)) => {
                if maximizing {
                    score > *b
                } else {
                    score < *b
                }
            }
        };
        if improved {
            let mut pv = Vec::with_capacity(update.pv.len() + 1);
            if let Some(child_mv) = update.mv {
                pv.push(child_mv);
            }
            pv.extend(update.pv);
            best = Some((score, pv.clone()));

            let emission_mv = tag.or_else(|| pv.first().copied());
            let keep_going = out
                .send(SearchUpdate {
                    mv: emission_mv,
                    score,
                    pv,
                    depth: root_depth,
                    is_final: false,
                })
                .is_ok();
            if !keep_going {
                // The consumer hung up; take the whole subtree down.
                scope.cancel();
                break;
            }

            // A decisive score in our own direction cannot be displaced;
            // a decisive score against us still can, so the race goes on.
            let decisive = if maximizing {
                score >= PRUNE_LIMIT
            } else {
                score <= -PRUNE_LIMIT
            };
            if decisive {
                scope.cancel();
                break;
            }
        }
    }
    for _ in rx {}
    for handle in handles {
        let _ = handle.join();
    }

    match best {
        Some((score, pv)) => send_final(score, pv),
        None => send_final(board.score(), Vec::new()),
    }
}

/// Fan out full streaming searches at several depths and merge their
/// streams. A candidate displaces the current recommendation when its
/// score strictly improves in the root's direction, or matches it from a
/// deeper search. One final update closes the merged stream once every
/// depth has settled.
pub fn multi_depth_stream(
    board: &Board,
    maximizing: bool,
    depths: &[u8],
    policy: StreamPolicy,
    cancel: Arc<CancelToken>,
) -> mpsc::Receiver<SearchUpdate> {
    let (out_tx, out_rx) = mpsc::sync_channel(depths.len() * 16 + 4);
    let (merge_tx, merge_rx) = mpsc::sync_channel::<SearchUpdate>(depths.len() * 16 + 4);

    for &depth in depths {
        let stream = stream_search(board, depth, maximizing, policy, CancelToken::child(&cancel));
        let merge_tx = merge_tx.clone();
        thread::spawn(move || {
            for update in stream {
                if merge_tx.send(update).is_err() {
                    return;
                }
            }
        });
    }
    drop(merge_tx);

    let mut pending = depths.len();
    let scope = cancel;
    thread::spawn(move || {
        let mut recommended: Option<SearchUpdate> = None;

        for update in merge_rx {
            if update.is_final {
                pending -= 1;
            }
            let replace = match &recommended {
                None => true,
                Some(current) => {
                    let strictly_better = if maximizing {
                        update.score > current.score
                    } else {
                        update.score < current.score
                    };
                    strictly_better || (update.score == current.score && update.depth > current.depth)
                }
            };
            if replace {
                let mut emission = update.clone();
                emission.is_final = false;
                recommended = Some(update);
                if out_tx.send(emission).is_err() {
                    scope.cancel();
                    return;
                }
            }
            if pending == 0 {
                break;
            }
        }

        if let Some(mut finale) = recommended {
            finale.is_final = true;
            let _ = out_tx.send(finale);
        }
    });

    out_rx
}
