// ============================================================================
// eddy-reactive - Placeholder
//
// A forward declaration for a reactive value that does not exist yet.
// Consumers wire against the placeholder's stream/behavior views; when the
// real source appears the placeholder is resolved exactly once and the views
// start carrying it. The views keep their identity through resolution, so
// nothing wired before needs to be touched.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

use crate::primitives::behavior::Behavior;
use crate::primitives::listen::Listener;
use crate::primitives::stream::Stream;

/// Errors from placeholder resolution.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderError {
    /// The placeholder was already resolved; a placeholder tolerates exactly
    /// one writer.
    #[error("placeholder already resolved")]
    AlreadyResolved,

    /// The placeholder was handed itself as its own source, which would wire
    /// its views into a feedback loop with no external input.
    #[error("placeholder resolved with itself")]
    SelfResolution,
}

// =============================================================================
// PLACEHOLDER<A>
// =============================================================================

/// A forward-declared reactive value, resolvable exactly once.
///
/// [`stream()`](Placeholder::stream) and [`behavior()`](Placeholder::behavior)
/// hand out identity-stable views that can be subscribed to, mapped and
/// passed around before the real source exists. Resolution connects the
/// source to the views:
///
/// - a stream source forwards occurrences pushed after resolution; earlier
///   occurrences are not replayed;
/// - a behavior source delivers its current value to the behavior view at
///   resolution time (notifying subscribers) and forwards changes from then
///   on.
///
/// Reading the behavior view with [`Behavior::sample`] before resolution
/// panics; [`Behavior::try_sample`] returns `None`.
///
/// # Example
///
/// ```ignore
/// let looped = Placeholder::<u32>::new();
/// let view = looped.behavior();          // wire consumers now
/// assert_eq!(view.try_sample(), None);
///
/// let source = sink_behavior(42);
/// looped.replace_with_behavior(&source)?; // resolve later
/// assert_eq!(view.sample(), 42);          // same view, now live
/// ```
#[derive(Clone)]
pub struct Placeholder<A> {
    inner: Rc<PlaceholderInner<A>>,
}

struct PlaceholderInner<A> {
    resolved: Cell<bool>,
    stream_view: Stream<A>,
    behavior_view: Behavior<A>,
}

impl<A: Clone + 'static> Placeholder<A> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(PlaceholderInner {
                resolved: Cell::new(false),
                stream_view: Stream::never(),
                behavior_view: Behavior::unset(),
            }),
        }
    }

    /// The stream view. Stable across resolution.
    pub fn stream(&self) -> Stream<A> {
        self.inner.stream_view.clone()
    }

    /// The behavior view. Stable across resolution; has no current value
    /// until the placeholder is resolved with a behavior.
    pub fn behavior(&self) -> Behavior<A> {
        self.inner.behavior_view.clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.resolved.get()
    }

    /// Resolve with a stream: occurrences from here on flow into the stream
    /// view.
    pub fn replace_with_stream(&self, source: &Stream<A>) -> Result<(), PlaceholderError> {
        self.claim()?;
        forward_stream(source, &self.inner.stream_view);
        Ok(())
    }

    /// Resolve with a behavior: the behavior view takes the source's current
    /// value now (notifying its subscribers) and follows it from here on.
    ///
    /// A source with no current value yet (an unresolved view itself) is
    /// followed from its first value.
    pub fn replace_with_behavior(&self, source: &Behavior<A>) -> Result<(), PlaceholderError> {
        self.claim()?;
        forward_behavior(source, &self.inner.behavior_view);
        Ok(())
    }

    /// Resolve with another placeholder, chaining both views to the other's.
    pub fn replace_with_placeholder(&self, source: &Placeholder<A>) -> Result<(), PlaceholderError> {
        if Rc::ptr_eq(&self.inner, &source.inner) {
            return Err(PlaceholderError::SelfResolution);
        }
        self.claim()?;
        forward_stream(&source.inner.stream_view, &self.inner.stream_view);
        forward_behavior(&source.inner.behavior_view, &self.inner.behavior_view);
        Ok(())
    }

    fn claim(&self) -> Result<(), PlaceholderError> {
        if self.inner.resolved.replace(true) {
            return Err(PlaceholderError::AlreadyResolved);
        }
        Ok(())
    }
}

impl<A: Clone + 'static> Default for Placeholder<A> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FORWARDING
// =============================================================================

fn forward_stream<A: Clone + 'static>(source: &Stream<A>, into: &Stream<A>) {
    let target = Rc::downgrade(&into.node);
    let listener = Rc::new(Listener::new(move |value: &A| {
        if let Some(node) = target.upgrade() {
            node.emit(value);
        }
    }));
    source.node.attach(&listener);
    // The view owns the wiring: it stays alive as long as any view handle does.
    into.node.keep(listener);
    into.node.keep(source.node.clone());
}

fn forward_behavior<A: Clone + 'static>(source: &Behavior<A>, into: &Behavior<A>) {
    let target = Rc::downgrade(&into.node);
    let listener = Rc::new(Listener::new(move |value: &A| {
        if let Some(node) = target.upgrade() {
            node.set(value.clone());
        }
    }));
    source.node.attach(&listener);
    into.node.keep(listener);
    into.node.keep(source.node.clone());
    // Deliver the current value last, after the wiring is in place, so view
    // subscribers observe it exactly once.
    if let Some(current) = source.try_sample() {
        into.node.set(current);
    }
}

// =============================================================================
// TESTS
// =============================================================================
