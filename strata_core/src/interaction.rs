// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge-triggered interaction blocking.
//!
//! An [`InteractionBlocker`] owns a set of live [`BlockToken`]s. Each token is
//! one reason to suppress user input on the host surface; input is blocked
//! while the set is non-empty. The installed handler is told about transitions
//! only: `true` when the first token is acquired, `false` when the last one is
//! released.
//!
//! Tokens are only reachable through [`InteractionBlockGuard`], which releases
//! its token exactly once when dropped. Whoever holds a guard (a pending
//! readiness wait, for instance) therefore cannot leak a token on any exit
//! path.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;

/// A handle identifying one active reason to block interaction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockToken(pub u64);

impl fmt::Debug for BlockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockToken({})", self.0)
    }
}

type BlockedHandler = Box<dyn FnMut(bool)>;

struct BlockerState {
    next_token: u64,
    live: BTreeSet<BlockToken>,
    handler: Option<BlockedHandler>,
}

/// Tracks live block tokens and reports blocked/unblocked transitions.
///
/// Cloning yields another handle to the same token set.
#[derive(Clone)]
pub struct InteractionBlocker {
    state: Rc<RefCell<BlockerState>>,
}

impl Default for InteractionBlocker {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionBlocker {
    /// Creates a blocker with no live tokens and no handler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(BlockerState {
                next_token: 0,
                live: BTreeSet::new(),
                handler: None,
            })),
        }
    }

    /// Installs the handler told about blocked/unblocked transitions.
    pub fn set_handler(&self, handler: impl FnMut(bool) + 'static) {
        self.state.borrow_mut().handler = Some(Box::new(handler));
    }

    /// Removes the transition handler.
    pub fn clear_handler(&self) {
        self.state.borrow_mut().handler = None;
    }

    /// Whether any token is live.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.state.borrow().live.is_empty()
    }

    /// Number of live tokens.
    #[must_use]
    pub fn live_tokens(&self) -> usize {
        self.state.borrow().live.len()
    }

    /// Acquires a new token, blocking interaction until the guard is dropped.
    #[must_use = "dropping the guard immediately releases the token"]
    pub fn acquire(&self) -> InteractionBlockGuard {
        let (token, was_empty) = {
            let mut state = self.state.borrow_mut();
            let token = BlockToken(state.next_token);
            state.next_token += 1;
            let was_empty = state.live.is_empty();
            state.live.insert(token);
            (token, was_empty)
        };
        if was_empty {
            notify(&self.state, true);
        }
        InteractionBlockGuard {
            state: Rc::downgrade(&self.state),
            token,
        }
    }
}

impl fmt::Debug for InteractionBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("InteractionBlocker")
            .field("next_token", &state.next_token)
            .field("live", &state.live)
            .field("has_handler", &state.handler.is_some())
            .finish()
    }
}

/// Calls the handler without holding the state borrow, so the handler may
/// query the blocker or acquire tokens itself.
fn notify(state: &RefCell<BlockerState>, blocked: bool) {
    let handler = state.borrow_mut().handler.take();
    if let Some(mut handler) = handler {
        handler(blocked);
        let mut state = state.borrow_mut();
        // A handler installed from inside the callback wins.
        if state.handler.is_none() {
            state.handler = Some(handler);
        }
    }
}

/// Scoped ownership of one [`BlockToken`].
///
/// Dropping the guard releases the token; if it was the last live token the
/// blocker reports the unblocked transition.
pub struct InteractionBlockGuard {
    state: Weak<RefCell<BlockerState>>,
    token: BlockToken,
}

impl InteractionBlockGuard {
    /// The token held by this guard.
    #[must_use]
    pub fn token(&self) -> BlockToken {
        self.token
    }
}

impl Drop for InteractionBlockGuard {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let now_empty = {
            let mut inner = state.borrow_mut();
            inner.live.remove(&self.token) && inner.live.is_empty()
        };
        if now_empty {
            notify(&state, false);
        }
    }
}

impl fmt::Debug for InteractionBlockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionBlockGuard")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    fn recording_blocker() -> (InteractionBlocker, Rc<RefCell<Vec<bool>>>) {
        let blocker = InteractionBlocker::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        blocker.set_handler(move |blocked| sink.borrow_mut().push(blocked));
        (blocker, log)
    }

    #[test]
    fn overlapping_guards_fire_each_edge_once() {
        let (blocker, log) = recording_blocker();

        let a = blocker.acquire();
        let b = blocker.acquire();
        assert!(blocker.is_blocked());
        assert_eq!(*log.borrow(), vec![true]);

        drop(a);
        assert!(blocker.is_blocked(), "second token still live");
        assert_eq!(*log.borrow(), vec![true]);

        drop(b);
        assert!(!blocker.is_blocked());
        assert_eq!(*log.borrow(), vec![true, false]);
    }

    #[test]
    fn tokens_are_monotonic() {
        let blocker = InteractionBlocker::new();
        let a = blocker.acquire();
        let a_token = a.token();
        drop(a);
        let b = blocker.acquire();
        assert!(b.token() > a_token, "tokens are never reused");
    }

    #[test]
    fn guard_outliving_blocker_is_inert() {
        let (blocker, log) = recording_blocker();
        let guard = blocker.acquire();
        drop(blocker);
        drop(guard);
        assert_eq!(*log.borrow(), vec![true], "no unblock after blocker is gone");
    }

    #[test]
    fn handler_may_reenter_blocker() {
        let blocker = InteractionBlocker::new();
        let observed = Rc::new(RefCell::new(Vec::new()));
        let inner = blocker.clone();
        let sink = observed.clone();
        blocker.set_handler(move |_| sink.borrow_mut().push(inner.live_tokens()));

        let guard = blocker.acquire();
        drop(guard);
        assert_eq!(*observed.borrow(), vec![1, 0]);
    }
}
