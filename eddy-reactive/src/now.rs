// ============================================================================
// eddy-reactive - Now (turn context)
//
// A turn is one synchronous round of delivery: everything that happens
// between a push entering the graph and the last subscriber returning.
// `Now` is a zero-sized witness that code is running inside a turn; holding
// one makes "read the current value here" a well-defined operation.
// ============================================================================

use std::cell::Cell;
use std::marker::PhantomData;

use crate::primitives::behavior::Behavior;

thread_local! {
    /// Nesting depth of `with_now` on this thread
    static TURN_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Witness that the current code runs inside a reactive turn.
///
/// `Copy`, thread-bound, and only obtainable through [`with_now`]. Functions
/// that must run inside a turn take a `Now` parameter instead of asserting
/// at run time.
#[derive(Clone, Copy)]
pub struct Now {
    _not_send: PhantomData<*const ()>,
}

impl Now {
    /// Read a behavior's current value at this point in the turn.
    ///
    /// # Panics
    ///
    /// Panics if the behavior has no current value yet, see
    /// [`Behavior::sample`].
    pub fn sample<A: Clone + 'static>(self, behavior: &Behavior<A>) -> A {
        behavior.sample()
    }
}

struct TurnGuard;

impl Drop for TurnGuard {
    fn drop(&mut self) {
        TURN_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Run `f` inside a turn, creating one if none is open.
///
/// Re-entrant: sinks pushed from inside a turn deliver within the same
/// outer turn rather than deferring.
pub fn with_now<R>(f: impl FnOnce(Now) -> R) -> R {
    TURN_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let _guard = TurnGuard;
    f(Now { _not_send: PhantomData })
}

/// Whether a turn is currently open on this thread.
pub fn in_turn() -> bool {
    TURN_DEPTH.with(|depth| depth.get() > 0)
}

// =============================================================================
// TESTS
// =============================================================================
