// ============================================================================
// eddy-reactive - Scope
//
// Groups subscriptions for batch disposal. A scope is created per mount (or
// per dynamically rendered region), subscriptions made while rendering are
// added to it, and disposing the scope releases them all - unmounting is one
// `dispose()` call.
//
// Key features:
// - add(subscription) - take ownership of a subscription
// - on_dispose(fn) - register a cleanup callback
// - child() - nested scopes, disposed with the parent
// - dispose() - drop subscriptions, run cleanups (LIFO), dispose children
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::primitives::listen::Subscription;

/// Cleanup function type run on scope disposal.
pub type CleanupFn = Box<dyn FnOnce()>;

// =============================================================================
// SCOPE INNER
// =============================================================================

struct ScopeInner {
    /// Whether the scope is still active (not disposed)
    active: Cell<bool>,

    /// Subscriptions owned by this scope
    subscriptions: RefCell<Vec<Subscription>>,

    /// Cleanup functions to run on disposal
    cleanups: RefCell<Vec<CleanupFn>>,

    /// Parent scope (for nested scopes)
    parent: RefCell<Option<Weak<ScopeInner>>>,

    /// Child scopes
    children: RefCell<Vec<Rc<ScopeInner>>>,

    /// Self-reference, used to detach from the parent on disposal
    self_weak: RefCell<Weak<ScopeInner>>,
}

impl ScopeInner {
    fn new(parent: Option<&Rc<ScopeInner>>) -> Rc<Self> {
        let scope = Rc::new(Self {
            active: Cell::new(true),
            subscriptions: RefCell::new(Vec::new()),
            cleanups: RefCell::new(Vec::new()),
            parent: RefCell::new(parent.map(Rc::downgrade)),
            children: RefCell::new(Vec::new()),
            self_weak: RefCell::new(Weak::new()),
        });
        *scope.self_weak.borrow_mut() = Rc::downgrade(&scope);
        scope
    }

    fn dispose(&self) {
        if !self.active.get() {
            return;
        }
        // Flip the flag first so a cleanup calling dispose() again is a no-op.
        self.active.set(false);

        self.subscriptions.borrow_mut().clear();

        // Cleanups run in reverse order (LIFO)
        let cleanups: Vec<_> = self.cleanups.borrow_mut().drain(..).collect();
        for cleanup in cleanups.into_iter().rev() {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(cleanup));
        }

        let children: Vec<_> = self.children.borrow_mut().drain(..).collect();
        for child in children {
            child.dispose();
        }

        // Detach from the parent's child list
        if let Some(parent) = self.parent.borrow().as_ref().and_then(Weak::upgrade) {
            if let Some(self_rc) = self.self_weak.borrow().upgrade() {
                parent.children.borrow_mut().retain(|s| !Rc::ptr_eq(s, &self_rc));
            }
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        if self.active.get() {
            self.dispose();
        }
    }
}

// =============================================================================
// SCOPE (Public handle)
// =============================================================================

/// Owner of the subscriptions created while rendering.
///
/// Cloning a `Scope` clones the handle, not the scope. Disposing (or dropping
/// the last handle of) a scope drops its subscriptions, runs its cleanups in
/// reverse order and disposes its child scopes.
///
/// # Example
///
/// ```ignore
/// let scope = Scope::new();
/// events.subscribe(&scope, |v| println!("got {v:?}"));
///
/// scope.dispose(); // the subscription is gone
/// ```
#[derive(Clone)]
pub struct Scope {
    inner: Rc<ScopeInner>,
}

impl Scope {
    /// Create a root scope.
    pub fn new() -> Self {
        Self { inner: ScopeInner::new(None) }
    }

    /// Create a child scope, disposed together with this one.
    ///
    /// A child created under an already-disposed parent starts disposed:
    /// subscriptions added to it are released immediately.
    pub fn child(&self) -> Scope {
        let inner = ScopeInner::new(Some(&self.inner));
        if self.inner.active.get() {
            self.inner.children.borrow_mut().push(inner.clone());
        } else {
            inner.active.set(false);
        }
        Scope { inner }
    }

    /// Whether the scope is still active (not disposed).
    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    /// Take ownership of a subscription.
    ///
    /// On a disposed scope the subscription is dropped on the spot, which
    /// severs its wiring before anything can be delivered through it.
    pub fn add(&self, subscription: Subscription) {
        if self.inner.active.get() {
            self.inner.subscriptions.borrow_mut().push(subscription);
        }
    }

    /// Register a cleanup callback, run when the scope is disposed.
    ///
    /// On a disposed scope the callback runs immediately.
    pub fn on_dispose(&self, f: impl FnOnce() + 'static) {
        if self.inner.active.get() {
            self.inner.cleanups.borrow_mut().push(Box::new(f));
        } else {
            f();
        }
    }

    /// Dispose the scope: drop subscriptions, run cleanups (in reverse
    /// order), dispose children. Idempotent.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        // Dispose when the last handle goes away. A child scope is also held
        // by its parent's list, so it survives its handle and is disposed
        // with the parent.
        if Rc::strong_count(&self.inner) == 1 {
            self.inner.dispose();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dispose_runs_cleanups_in_reverse_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = order.clone();
        let second = order.clone();

        let scope = Scope::new();
        scope.on_dispose(move || first.borrow_mut().push(1));
        scope.on_dispose(move || second.borrow_mut().push(2));

        scope.dispose();

        assert_eq!(*order.borrow(), vec![2, 1]);
    }

    #[test]
    fn dispose_is_idempotent() {
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let scope = Scope::new();
        scope.on_dispose(move || runs_clone.set(runs_clone.get() + 1));

        scope.dispose();
        scope.dispose();

        assert_eq!(runs.get(), 1, "cleanup must run exactly once");
    }

    #[test]
    fn child_disposed_with_parent() {
        let cleaned = Rc::new(Cell::new(false));
        let cleaned_clone = cleaned.clone();

        let parent = Scope::new();
        let child = parent.child();
        child.on_dispose(move || cleaned_clone.set(true));

        parent.dispose();

        assert!(cleaned.get(), "child cleanup should run on parent dispose");
        assert!(!child.is_active());
    }

    #[test]
    fn disposed_child_detaches_from_parent() {
        let parent = Scope::new();
        let child = parent.child();

        child.dispose();

        // The parent no longer holds the child, so dropping the handle frees it.
        assert_eq!(Rc::strong_count(&child.inner), 1);
    }

    #[test]
    fn child_of_disposed_parent_starts_disposed() {
        let parent = Scope::new();
        parent.dispose();

        let child = parent.child();
        assert!(!child.is_active());

        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();
        child.on_dispose(move || ran_clone.set(true));
        assert!(ran.get(), "cleanup on a dead scope runs immediately");
    }

    #[test]
    fn last_handle_drop_disposes() {
        let cleaned = Rc::new(Cell::new(false));
        let cleaned_clone = cleaned.clone();

        {
            let scope = Scope::new();
            scope.on_dispose(move || cleaned_clone.set(true));
        }

        assert!(cleaned.get(), "dropping the last handle should dispose");
    }
}
