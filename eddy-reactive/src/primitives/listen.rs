// ============================================================================
// eddy-reactive - Listeners & Subscriptions
//
// The wiring shared by streams and behaviors. A reactive node holds *weak*
// references to its listeners; whoever wants the wiring to stay alive holds
// the strong side. Dropping the strong side is unsubscription - dead weak
// entries are pruned on the next delivery.
// ============================================================================

use std::any::Any;
use std::rc::Rc;

/// A type-erased callback attached to a reactive node.
///
/// Boxed behind a concrete struct so the same allocation can be held both as
/// the node's weak subscriber entry and as an `Rc<dyn Any>` keep-alive.
pub(crate) struct Listener<A> {
    f: Box<dyn Fn(&A)>,
}

impl<A> Listener<A> {
    pub(crate) fn new(f: impl Fn(&A) + 'static) -> Self {
        Self { f: Box::new(f) }
    }

    pub(crate) fn call(&self, value: &A) {
        (self.f)(value)
    }
}

/// An active subscription.
///
/// Holds strong references to the listener and to the source node it is
/// attached to. Dropping the subscription severs the wiring: the source
/// prunes the dead listener on its next delivery. Subscriptions are owned by
/// a [`Scope`](crate::Scope) and dropped when the scope is disposed.
pub struct Subscription {
    _keep: Vec<Rc<dyn Any>>,
}

impl Subscription {
    pub(crate) fn new(keep: Vec<Rc<dyn Any>>) -> Self {
        Self { _keep: keep }
    }
}
