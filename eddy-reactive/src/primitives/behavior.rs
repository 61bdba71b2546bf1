// ============================================================================
// eddy-reactive - Behavior Primitive
//
// A behavior is a value that exists at every point in time. Sampling reads
// the current value; subscribing observes changes (the current value is not
// replayed to new subscribers). There is no equality gate: every write
// notifies, like the event it usually mirrors.
// ============================================================================

use std::any::Any;
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::now::with_now;
use crate::primitives::listen::{Listener, Subscription};
use crate::primitives::scope::Scope;
use crate::primitives::stream::Stream;

// =============================================================================
// BEHAVIOR NODE
// =============================================================================

pub(crate) struct BehaviorNode<A> {
    /// Current value. `None` only for a placeholder view that has not been
    /// resolved yet.
    value: RefCell<Option<A>>,

    /// Weak subscriber entries, pruned on delivery
    subscribers: RefCell<Vec<Weak<Listener<A>>>>,

    /// Strong references keeping upstream wiring alive while this node lives
    sources: RefCell<Vec<Rc<dyn Any>>>,
}

impl<A: Clone> BehaviorNode<A> {
    pub(crate) fn new(initial: Option<A>) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(initial),
            subscribers: RefCell::new(Vec::new()),
            sources: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn current(&self) -> Option<A> {
        self.value.borrow().clone()
    }

    /// Store a new current value and notify subscribers.
    pub(crate) fn set(&self, value: A) {
        *self.value.borrow_mut() = Some(value.clone());
        let listeners: Vec<Rc<Listener<A>>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|entry| entry.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in listeners {
            listener.call(&value);
        }
    }

    pub(crate) fn attach(&self, listener: &Rc<Listener<A>>) {
        self.subscribers.borrow_mut().push(Rc::downgrade(listener));
    }

    pub(crate) fn keep(&self, source: Rc<dyn Any>) {
        self.sources.borrow_mut().push(source);
    }
}

// =============================================================================
// BEHAVIOR<A> - The public behavior handle
// =============================================================================

/// A time-varying value with a current value at every point in time.
///
/// Behaviors are cheap-to-clone handles onto a shared node. The one
/// exception to "a value at every point in time" is the behavior view of an
/// unresolved placeholder, which has no value until resolution; sampling one
/// is a programming error and panics, [`try_sample`](Behavior::try_sample)
/// is the forgiving read.
#[derive(Clone)]
pub struct Behavior<A> {
    pub(crate) node: Rc<BehaviorNode<A>>,
}

impl<A: Clone + 'static> Behavior<A> {
    /// A constant behavior.
    pub fn of(value: A) -> Behavior<A> {
        Behavior { node: BehaviorNode::new(Some(value)) }
    }

    /// A behavior with no value yet. Used for placeholder views.
    pub(crate) fn unset() -> Behavior<A> {
        Behavior { node: BehaviorNode::new(None) }
    }

    /// Read the current value.
    ///
    /// # Panics
    ///
    /// Panics if the behavior has no current value, which only happens for
    /// the view of a placeholder that has not been resolved. Sampling one is
    /// a bug in the caller's wiring order, not a recoverable condition.
    pub fn sample(&self) -> A {
        match self.try_sample() {
            Some(value) => value,
            None => panic!("sampled a behavior with no current value (unresolved placeholder)"),
        }
    }

    /// Read the current value, or `None` for an unresolved placeholder view.
    pub fn try_sample(&self) -> Option<A> {
        self.node.current()
    }

    /// Subscribe to changes. The current value is not delivered; only
    /// subsequent writes are. The subscription lives in `scope`.
    pub fn subscribe(&self, scope: &Scope, f: impl Fn(&A) + 'static) {
        let listener = Rc::new(Listener::new(f));
        self.node.attach(&listener);
        let keep: Vec<Rc<dyn Any>> = vec![listener, self.node.clone()];
        scope.add(Subscription::new(keep));
    }

    /// A behavior of `f` applied to the current value, updated on changes.
    pub fn map<B: Clone + 'static>(&self, f: impl Fn(&A) -> B + 'static) -> Behavior<B> {
        let initial = self.try_sample().map(|value| f(&value));
        let node = BehaviorNode::new(initial);
        let target = Rc::downgrade(&node);
        let listener = Rc::new(Listener::new(move |value: &A| {
            if let Some(node) = target.upgrade() {
                node.set(f(value));
            }
        }));
        self.node.attach(&listener);
        node.keep(listener);
        node.keep(self.node.clone());
        Behavior { node }
    }
}

/// Combine two behaviors with `f`, recomputing when either changes.
///
/// The result has a value once both inputs do.
pub fn lift2<A, B, C>(
    f: impl Fn(&A, &B) -> C + 'static,
    a: &Behavior<A>,
    b: &Behavior<B>,
) -> Behavior<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let initial = match (a.try_sample(), b.try_sample()) {
        (Some(x), Some(y)) => Some(f(&x, &y)),
        _ => None,
    };
    let node = BehaviorNode::new(initial);
    let target = Rc::downgrade(&node);
    let left = a.node.clone();
    let right = b.node.clone();
    let f = Rc::new(f);
    let recompute = Rc::new(move || {
        let (Some(node), Some(x), Some(y)) = (target.upgrade(), left.current(), right.current())
        else {
            return;
        };
        node.set(f(&x, &y));
    });

    let on_left = Rc::new(Listener::new({
        let recompute = recompute.clone();
        move |_: &A| recompute()
    }));
    a.node.attach(&on_left);
    let on_right = Rc::new(Listener::new({
        let recompute = recompute.clone();
        move |_: &B| recompute()
    }));
    b.node.attach(&on_right);

    node.keep(on_left);
    node.keep(on_right);
    node.keep(a.node.clone());
    node.keep(b.node.clone());
    Behavior { node }
}

/// The classic stepper: starts at `initial`, then holds the latest
/// occurrence of `events`.
pub fn stepper<A: Clone + 'static>(initial: A, events: &Stream<A>) -> Behavior<A> {
    let node = BehaviorNode::new(Some(initial));
    let target = Rc::downgrade(&node);
    let listener = Rc::new(Listener::new(move |value: &A| {
        if let Some(node) = target.upgrade() {
            node.set(value.clone());
        }
    }));
    events.node.attach(&listener);
    node.keep(listener);
    node.keep(events.node.clone());
    Behavior { node }
}

/// Fold occurrences into a running accumulator, starting at `initial`.
///
/// `f` is called as `f(&accumulator, &occurrence)`, like `Iterator::fold`.
pub fn accum<A, B>(f: impl Fn(&B, &A) -> B + 'static, initial: B, events: &Stream<A>) -> Behavior<B>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let node = BehaviorNode::new(Some(initial));
    let target = Rc::downgrade(&node);
    let listener = Rc::new(Listener::new(move |value: &A| {
        let Some(node) = target.upgrade() else { return };
        let Some(current) = node.current() else { return };
        node.set(f(&current, value));
    }));
    events.node.attach(&listener);
    node.keep(listener);
    node.keep(events.node.clone());
    Behavior { node }
}

// =============================================================================
// SINK BEHAVIOR
// =============================================================================

/// A behavior with a push side.
///
/// Pushing replaces the current value and notifies subscribers, inside a
/// turn (one is opened if the push happens outside any).
#[derive(Clone)]
pub struct SinkBehavior<A> {
    behavior: Behavior<A>,
}

impl<A: Clone + 'static> SinkBehavior<A> {
    pub fn new(initial: A) -> Self {
        Self { behavior: Behavior::of(initial) }
    }

    /// Replace the current value and notify subscribers.
    pub fn push(&self, value: A) {
        with_now(|_| self.behavior.node.set(value));
    }

    /// The read-only side of this sink.
    pub fn behavior(&self) -> Behavior<A> {
        self.behavior.clone()
    }
}

impl<A> Deref for SinkBehavior<A> {
    type Target = Behavior<A>;

    fn deref(&self) -> &Self::Target {
        &self.behavior
    }
}

/// Create a behavior you can push new values into.
pub fn sink_behavior<A: Clone + 'static>(initial: A) -> SinkBehavior<A> {
    SinkBehavior::new(initial)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::stream::sink_stream;
    use std::cell::Cell;

    #[test]
    fn constant_behavior_samples() {
        let b = Behavior::of(7);
        assert_eq!(b.sample(), 7);
        assert_eq!(b.try_sample(), Some(7));
    }

    #[test]
    fn unset_behavior_try_sample_is_none() {
        let b = Behavior::<i32>::unset();
        assert_eq!(b.try_sample(), None);
    }

    #[test]
    #[should_panic(expected = "no current value")]
    fn unset_behavior_sample_panics() {
        let b = Behavior::<i32>::unset();
        let _ = b.sample();
    }

    #[test]
    fn sink_push_updates_and_notifies() {
        let scope = Scope::new();
        let b = sink_behavior(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        b.subscribe(&scope, move |v| seen_clone.borrow_mut().push(*v));

        assert!(seen.borrow().is_empty(), "subscribe must not replay the current value");

        b.push(1);
        b.push(2);

        assert_eq!(b.sample(), 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn map_tracks_source() {
        let b = sink_behavior(2);
        let squared = b.map(|n| n * n);

        assert_eq!(squared.sample(), 4);

        b.push(5);
        assert_eq!(squared.sample(), 25);
    }

    #[test]
    fn map_of_unset_defers() {
        let b = Behavior::<i32>::unset();
        let mapped = b.map(|n| n + 1);
        assert_eq!(mapped.try_sample(), None);
    }

    #[test]
    fn lift2_combines_and_recomputes() {
        let a = sink_behavior(2);
        let b = sink_behavior(3);
        let sum = lift2(|x, y| x + y, &a.behavior(), &b.behavior());

        assert_eq!(sum.sample(), 5);

        a.push(10);
        assert_eq!(sum.sample(), 13);

        b.push(1);
        assert_eq!(sum.sample(), 11);
    }

    #[test]
    fn stepper_holds_latest() {
        let events = sink_stream::<i32>();
        let held = stepper(0, &events.stream());

        assert_eq!(held.sample(), 0);

        events.push(4);
        assert_eq!(held.sample(), 4);

        events.push(9);
        assert_eq!(held.sample(), 9);
    }

    #[test]
    fn accum_folds() {
        let events = sink_stream::<i32>();
        let total = accum(|acc, n| acc + n, 0, &events.stream());

        events.push(1);
        events.push(2);
        events.push(3);

        assert_eq!(total.sample(), 6);
    }

    #[test]
    fn scope_dispose_stops_notifications() {
        let scope = Scope::new();
        let b = sink_behavior(0);
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        b.subscribe(&scope, move |_| count_clone.set(count_clone.get() + 1));

        b.push(1);
        scope.dispose();
        b.push(2);

        assert_eq!(count.get(), 1, "no notifications after scope dispose");
        assert_eq!(b.sample(), 2, "the behavior itself keeps updating");
    }
}
