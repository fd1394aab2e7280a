//! The long-lived search tree and its background workers.
//!
//! The tree outlives individual moves: expander threads keep growing it
//! toward a depth horizon, a ticker raises the horizon while the opponent
//! thinks, and when a move is played the matching child is promoted to
//! root and every sibling subtree is cancelled.
//!
//! Ownership runs strictly downward: parents own children through the
//! `children` maps, while the upward links for score propagation are weak.
//! Tearing down is therefore top-down: cancel, drop the owning references,
//! and the arcs unwind without ever touching a cycle.
//!
//! Node state is atomics plus one `RwLock` around the child map, so score
//! propagation never holds two node locks: it copies child scores out
//! under a read lock, drops it, and stores through the parent's atomic.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, RwLock, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use qubic_core::{Board, Move, Player};

/// Tuning for the background search.
#[derive(Clone, Debug)]
pub struct TreeConfig {
    /// Horizon the tree starts with.
    pub initial_depth: u32,
    /// Hard cap the ticker will not deepen past.
    pub depth_cap: u32,
    /// How often the horizon rises by one.
    pub deepen_interval: Duration,
    /// Grace period `choose_move` grants a fresh tree before reading it.
    pub warmup: Duration,
    /// Fan-out cap per node; columns past this many are not explored.
    pub max_children: usize,
    /// Number of expander threads.
    pub workers: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            initial_depth: 3,
            depth_cap: 6,
            deepen_interval: Duration::from_secs(1),
            warmup: Duration::from_millis(100),
            max_children: 8,
            workers: 4,
        }
    }
}

struct SearchNode {
    /// Snapshot after `mv` was applied; immutable for the node's lifetime.
    board: Board,
    /// The move that led here; `None` only for the initial root.
    mv: Option<Move>,
    maximizing: bool,
    /// Distance from the current root; rewritten on promotion.
    depth: AtomicU32,
    /// Current minimax estimate: the leaf value until expansion, then the
    /// best known child score in this node's direction. Optimistic and
    /// improving over time, not a settled value.
    score: AtomicI64,
    expanded: AtomicBool,
    cancelled: AtomicBool,
    /// Decided at creation (the incoming move won): scored once, never
    /// expanded.
    terminal: bool,
    parent: RwLock<Weak<SearchNode>>,
    children: RwLock<BTreeMap<Move, Arc<SearchNode>>>,
}

impl SearchNode {
    fn initial_score(board: &Board) -> i64 {
        match board.winner() {
            Some(winner) => Board::win_score(winner),
            None => board.score(),
        }
    }
}

/// Queue feeding the expander threads.
struct WorkQueue {
    pending: Mutex<VecDeque<Arc<SearchNode>>>,
    available: Condvar,
    closed: AtomicBool,
}

impl WorkQueue {
    fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            closed: AtomicBool::new(false),
        }
    }

    fn push(&self, node: Arc<SearchNode>) {
        let mut pending = self.pending.lock().unwrap();
        pending.push_back(node);
        self.available.notify_one();
    }

    /// Blocks until work arrives or the queue closes.
    fn pop(&self) -> Option<Arc<SearchNode>> {
        let mut pending = self.pending.lock().unwrap();
        loop {
            if self.closed.load(Ordering::Relaxed) {
                return None;
            }
            if let Some(node) = pending.pop_front() {
                return Some(node);
            }
            pending = self.available.wait(pending).unwrap();
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.available.notify_all();
    }
}

struct TreeState {
    root: RwLock<Arc<SearchNode>>,
    max_depth: AtomicU32,
    node_count: AtomicUsize,
    queue: WorkQueue,
    /// Unexpanded nodes parked at the horizon, re-queued when it rises.
    frontier: Mutex<Vec<Arc<SearchNode>>>,
    shutdown: Mutex<bool>,
    shutdown_signal: Condvar,
    cfg: TreeConfig,
}

impl TreeState {
    fn process(&self, node: Arc<SearchNode>) {
        if node.cancelled.load(Ordering::Relaxed) || node.terminal {
            return;
        }
        if node.depth.load(Ordering::Relaxed) >= self.max_depth.load(Ordering::Relaxed) {
            // Park at the horizon; the ticker brings it back.
            self.frontier.lock().unwrap().push(node);
            return;
        }
        if node
            .expanded
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        self.expand(node);
    }

    fn expand(&self, node: Arc<SearchNode>) {
        let player = if node.maximizing { Player::X } else { Player::O };
        let depth = node.depth.load(Ordering::Relaxed);
        let mut moves = node.board.valid_moves();
        moves.truncate(self.cfg.max_children);

        let mut kids = BTreeMap::new();
        for mv in moves {
            let mut board = node.board.clone();
            board.make_move(mv, player);
            let terminal = board.winner().is_some();
            let score = SearchNode::initial_score(&board);
            let child = Arc::new(SearchNode {
                board,
                mv: Some(mv),
                maximizing: !node.maximizing,
                depth: AtomicU32::new(depth + 1),
                score: AtomicI64::new(score),
                expanded: AtomicBool::new(false),
                cancelled: AtomicBool::new(false),
                terminal,
                parent: RwLock::new(Arc::downgrade(&node)),
                children: RwLock::new(BTreeMap::new()),
            });
            kids.insert(mv, child);
        }

        {
            // Install and count under the same lock: kill_branch marks the
            // node cancelled before it walks the map, so either it sees
            // nothing (we bail) or it sees children that were counted.
            let mut children = node.children.write().unwrap();
            if node.cancelled.load(Ordering::Relaxed) {
                return; // the subtree died while we were building it
            }
            *children = kids.clone();
            self.node_count.fetch_add(kids.len(), Ordering::SeqCst);
        }

        for child in kids.values() {
            if !child.terminal {
                self.queue.push(Arc::clone(child));
            }
        }
        self.propagate(&node);
    }

    /// Walk ancestors recomputing each score from its children, stopping at
    /// the first level that does not change. Child scores are copied out
    /// under the read lock before the parent's atomic is touched.
    fn propagate(&self, from: &Arc<SearchNode>) {
        let mut current = Arc::clone(from);
        loop {
            let best = {
                let children = current.children.read().unwrap();
                let mut best: Option<i64> = None;
                for child in children.values() {
                    let score = child.score.load(Ordering::Relaxed);
                    best = Some(match best {
                        None => score,
                        Some(b) => {
                            if current.maximizing {
                                b.max(score)
                            } else {
                                b.min(score)
                            }
                        }
                    });
                }
                best
            };

            if let Some(score) = best {
                let old = current.score.swap(score, Ordering::SeqCst);
                if old == score {
                    return;
                }
            }

            let parent = current.parent.read().unwrap().upgrade();
            match parent {
                Some(p) => current = p,
                None => return,
            }
        }
    }

    /// Mark a subtree dead and count it; arcs are released by the caller
    /// dropping the owning reference.
    fn kill_branch(node: &Arc<SearchNode>) -> usize {
        node.cancelled.store(true, Ordering::SeqCst);
        let children: Vec<Arc<SearchNode>> =
            node.children.read().unwrap().values().cloned().collect();
        let mut killed = 1;
        for child in &children {
            killed += Self::kill_branch(child);
        }
        killed
    }

    fn rewrite_depths(node: &Arc<SearchNode>, depth: u32) {
        node.depth.store(depth, Ordering::SeqCst);
        let children: Vec<Arc<SearchNode>> =
            node.children.read().unwrap().values().cloned().collect();
        for child in &children {
            Self::rewrite_depths(child, depth + 1);
        }
    }
}

/// Handle owning the background threads. Dropping it shuts them down.
pub struct SearchTree {
    state: Arc<TreeState>,
    workers: Vec<JoinHandle<()>>,
    deepener: Option<JoinHandle<()>>,
}

impl SearchTree {
    /// Build a tree rooted at a snapshot of `board` and start the
    /// background workers. `maximizing` says which direction the root
    /// optimises: true when the owning bot plays X.
    pub fn start(board: Board, maximizing: bool, cfg: TreeConfig) -> Self {
        let root = Arc::new(SearchNode {
            score: AtomicI64::new(SearchNode::initial_score(&board)),
            terminal: board.winner().is_some(),
            board,
            mv: None,
            maximizing,
            depth: AtomicU32::new(0),
            expanded: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(BTreeMap::new()),
        });

        let state = Arc::new(TreeState {
            root: RwLock::new(Arc::clone(&root)),
            max_depth: AtomicU32::new(cfg.initial_depth),
            node_count: AtomicUsize::new(1),
            queue: WorkQueue::new(),
            frontier: Mutex::new(Vec::new()),
            shutdown: Mutex::new(false),
            shutdown_signal: Condvar::new(),
            cfg,
        });
        state.queue.push(root);

        let mut workers = Vec::with_capacity(state.cfg.workers);
        for _ in 0..state.cfg.workers {
            let state = Arc::clone(&state);
            workers.push(thread::spawn(move || {
                while let Some(node) = state.queue.pop() {
                    state.process(node);
                }
            }));
        }

        let deepener = {
            let state = Arc::clone(&state);
            thread::spawn(move || deepen_loop(&state))
        };

        Self { state, workers, deepener: Some(deepener) }
    }

    /// A copy of the board the current root stands on.
    pub fn root_board(&self) -> Board {
        self.state.root.read().unwrap().board.clone()
    }

    /// Live nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.state.node_count.load(Ordering::Relaxed)
    }

    /// Best root child in the root's direction, ties to the first column.
    /// `None` until the root has been expanded.
    pub fn best_move(&self) -> Option<Move> {
        let root = Arc::clone(&self.state.root.read().unwrap());
        let children = root.children.read().unwrap();
        let mut best: Option<(Move, i64)> = None;
        for (&mv, child) in children.iter() {
            let score = child.score.load(Ordering::Relaxed);
            let improved = match best {
                None => true,
                Some((_, b)) => {
                    if root.maximizing {
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
        best.map(|(mv, _)| mv)
    }

    /// Promote the child reached by `mv` to root, cancelling every sibling
    /// subtree and the old root. Returns false when the move is unknown;
    /// the caller discards the tree and starts over.
    pub fn move_root(&self, mv: Move) -> bool {
        let old_root = Arc::clone(&self.state.root.read().unwrap());

        let (promoted, siblings) = {
            let children = old_root.children.read().unwrap();
            let Some(promoted) = children.get(&mv).cloned() else {
                return false;
            };
            let siblings: Vec<Arc<SearchNode>> = children
                .values()
                .filter(|c| c.mv != Some(mv))
                .cloned()
                .collect();
            (promoted, siblings)
        };

        let mut killed = 1; // the old root itself
        for sibling in &siblings {
            killed += TreeState::kill_branch(sibling);
        }
        old_root.cancelled.store(true, Ordering::SeqCst);
        old_root.children.write().unwrap().clear();

        *promoted.parent.write().unwrap() = Weak::new();
        TreeState::rewrite_depths(&promoted, 0);
        *self.state.root.write().unwrap() = Arc::clone(&promoted);
        self.state.node_count.fetch_sub(killed, Ordering::SeqCst);

        true
    }

    /// Stop the ticker and the workers and wait for them.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        {
            let mut flag = self.state.shutdown.lock().unwrap();
            *flag = true;
        }
        self.state.shutdown_signal.notify_all();
        self.state.queue.close();

        let root = Arc::clone(&self.state.root.read().unwrap());
        TreeState::kill_branch(&root);

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        if let Some(deepener) = self.deepener.take() {
            let _ = deepener.join();
        }
    }
}

impl Drop for SearchTree {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Raise the horizon one level per tick (up to the cap) and bring the
/// parked frontier back to the workers.
fn deepen_loop(state: &TreeState) {
    loop {
        {
            let guard = state.shutdown.lock().unwrap();
            let (guard, _timeout) = state
                .shutdown_signal
                .wait_timeout(guard, state.cfg.deepen_interval)
                .unwrap();
            if *guard {
                return;
            }
        }

        let depth = state.max_depth.load(Ordering::Relaxed);
        if depth < state.cfg.depth_cap {
            state.max_depth.store(depth + 1, Ordering::SeqCst);
        }

        // Re-rooting lowers depths, so parked nodes may be inside the
        // horizon even on capped ticks; process() parks them again if not.
        let parked: Vec<Arc<SearchNode>> = {
            let mut frontier = state.frontier.lock().unwrap();
            std::mem::take(&mut *frontier)
        };
        for node in parked {
            if !node.cancelled.load(Ordering::Relaxed) {
                state.queue.push(node);
            }
        }
    }
}
