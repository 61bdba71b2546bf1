// ============================================================================
// eddy-reactive - Stream Primitive
//
// A stream is a channel of discrete occurrences. It carries no current
// value: subscribers see occurrences pushed after they attached, and
// nothing else. Delivery is synchronous and in subscription order.
// ============================================================================

use std::any::Any;
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::now::with_now;
use crate::primitives::listen::{Listener, Subscription};
use crate::primitives::scope::Scope;

// =============================================================================
// STREAM NODE
// =============================================================================

pub(crate) struct StreamNode<A> {
    /// Weak subscriber entries, pruned on delivery
    subscribers: RefCell<Vec<Weak<Listener<A>>>>,

    /// Strong references keeping upstream wiring alive while this node lives
    sources: RefCell<Vec<Rc<dyn Any>>>,
}

impl<A> StreamNode<A> {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            subscribers: RefCell::new(Vec::new()),
            sources: RefCell::new(Vec::new()),
        })
    }

    /// Deliver an occurrence to every live subscriber.
    pub(crate) fn emit(&self, value: &A) {
        // Collect strong handles first so a listener may attach or push
        // again without hitting the live borrow.
        let listeners: Vec<Rc<Listener<A>>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|entry| entry.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in listeners {
            listener.call(value);
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
// STREAM<A> - The public stream handle
// =============================================================================

/// A reactive channel of discrete occurrences.
///
/// Streams are cheap-to-clone handles onto a shared node. Combinators build
/// derived streams that live as long as someone holds them (or subscribes
/// through a [`Scope`]); dropping every handle and subscription releases the
/// wiring.
///
/// # Example
///
/// ```ignore
/// let clicks = sink_stream::<u32>();
/// let doubled = clicks.map(|n| n * 2);
///
/// doubled.subscribe(&scope, |n| println!("{n}"));
/// clicks.push(21); // prints 42
/// ```
#[derive(Clone)]
pub struct Stream<A> {
    pub(crate) node: Rc<StreamNode<A>>,
}

impl<A: Clone + 'static> Stream<A> {
    /// A stream that never fires.
    pub fn never() -> Stream<A> {
        Stream { node: StreamNode::new() }
    }

    /// Subscribe to occurrences. The subscription lives in `scope` and is
    /// released when the scope is disposed.
    pub fn subscribe(&self, scope: &Scope, f: impl Fn(&A) + 'static) {
        let listener = Rc::new(Listener::new(f));
        self.node.attach(&listener);
        let keep: Vec<Rc<dyn Any>> = vec![listener, self.node.clone()];
        scope.add(Subscription::new(keep));
    }

    /// A stream of `f` applied to every occurrence.
    pub fn map<B: Clone + 'static>(&self, f: impl Fn(&A) -> B + 'static) -> Stream<B> {
        let node = StreamNode::<B>::new();
        let target = Rc::downgrade(&node);
        let listener = Rc::new(Listener::new(move |value: &A| {
            if let Some(node) = target.upgrade() {
                node.emit(&f(value));
            }
        }));
        self.node.attach(&listener);
        node.keep(listener);
        node.keep(self.node.clone());
        Stream { node }
    }

    /// A stream of the occurrences matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&A) -> bool + 'static) -> Stream<A> {
        let node = StreamNode::new();
        let target = Rc::downgrade(&node);
        let listener = Rc::new(Listener::new(move |value: &A| {
            if predicate(value) {
                if let Some(node) = target.upgrade() {
                    node.emit(value);
                }
            }
        }));
        self.node.attach(&listener);
        node.keep(listener);
        node.keep(self.node.clone());
        Stream { node }
    }

    /// Map and filter in one pass: occurrences where `f` returns `Some` pass
    /// through mapped, the rest are dropped.
    pub fn filter_map<B: Clone + 'static>(
        &self,
        f: impl Fn(&A) -> Option<B> + 'static,
    ) -> Stream<B> {
        let node = StreamNode::<B>::new();
        let target = Rc::downgrade(&node);
        let listener = Rc::new(Listener::new(move |value: &A| {
            if let Some(mapped) = f(value) {
                if let Some(node) = target.upgrade() {
                    node.emit(&mapped);
                }
            }
        }));
        self.node.attach(&listener);
        node.keep(listener);
        node.keep(self.node.clone());
        Stream { node }
    }

    /// A stream firing whenever either input fires.
    pub fn merge(&self, other: &Stream<A>) -> Stream<A> {
        let node = StreamNode::new();
        for source in [&self.node, &other.node] {
            let target = Rc::downgrade(&node);
            let listener = Rc::new(Listener::new(move |value: &A| {
                if let Some(node) = target.upgrade() {
                    node.emit(value);
                }
            }));
            source.attach(&listener);
            node.keep(listener);
            node.keep(source.clone());
        }
        Stream { node }
    }
}

/// Merge two streams. Free-function spelling of [`Stream::merge`].
pub fn combine<A: Clone + 'static>(a: &Stream<A>, b: &Stream<A>) -> Stream<A> {
    a.merge(b)
}

// =============================================================================
// SINK STREAM
// =============================================================================

/// A stream with a push side.
///
/// The only way occurrences enter the reactive graph from the outside.
/// Pushing delivers synchronously inside a turn (one is opened if the push
/// happens outside any).
#[derive(Clone)]
pub struct SinkStream<A> {
    stream: Stream<A>,
}

impl<A: Clone + 'static> SinkStream<A> {
    pub fn new() -> Self {
        Self { stream: Stream::never() }
    }

    /// Push an occurrence to all subscribers.
    pub fn push(&self, value: A) {
        with_now(|_| self.stream.node.emit(&value));
    }

    /// The stream side of this sink.
    pub fn stream(&self) -> Stream<A> {
        self.stream.clone()
    }
}

impl<A: Clone + 'static> Default for SinkStream<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Deref for SinkStream<A> {
    type Target = Stream<A>;

    fn deref(&self) -> &Self::Target {
        &self.stream
    }
}

/// Create a stream you can push occurrences into.
pub fn sink_stream<A: Clone + 'static>() -> SinkStream<A> {
    SinkStream::new()
}

// =============================================================================
// TESTS
// =============================================================================
