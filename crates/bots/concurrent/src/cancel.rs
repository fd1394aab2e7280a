//! Cooperative cancellation for search workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cancellation token scoping a group of workers.
///
/// Tokens form a tree: a child token derived with [`child`](Self::child)
/// reports cancelled whenever any ancestor is, so cancelling a node's scope
/// silently stops every worker spawned beneath it. Workers poll
/// [`is_cancelled`](Self::is_cancelled) at their suspension points (before
/// cloning a board, before recursing, before sending a result) and simply
/// return; a cancelled worker's missing result is the only trace it leaves.
///
/// The flag itself is a relaxed atomic load, cheap enough to poll freely.
#[derive(Debug)]
pub struct CancelToken {
    cancelled: AtomicBool,
    parent: Option<Arc<CancelToken>>,
}

impl CancelToken {
    /// A token with no parent scope.
    pub fn root() -> Arc<CancelToken> {
        Arc::new(CancelToken {
            cancelled: AtomicBool::new(false),
            parent: None,
        })
    }

    /// Derive a token that is cancelled whenever `parent` is.
    pub fn child(parent: &Arc<CancelToken>) -> Arc<CancelToken> {
        Arc::new(CancelToken {
            cancelled: AtomicBool::new(false),
            parent: Some(Arc::clone(parent)),
        })
    }

    /// Cancel this scope and, implicitly, every scope derived from it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether this scope or any ancestor has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.is_cancelled(),
            None => false,
        }
    }
}
