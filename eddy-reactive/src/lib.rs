//! # eddy-reactive
//!
//! Push-based reactive primitives: streams of discrete occurrences,
//! behaviors with a current value, and placeholders that let a value be
//! wired before it exists.
//!
//! ## Model
//!
//! Everything is a cheap-to-clone handle onto an `Rc` node. Delivery is
//! synchronous, single-threaded and turn-based:
//!
//! ```text
//! sink.push(v) → [open turn] → subscribers in order, depth-first → [close]
//! ```
//!
//! Subscriptions are owned by a [`Scope`]; disposing the scope releases
//! them. Nodes hold their listeners weakly, so dropping the owning side is
//! unsubscription.
//!
//! ## Placeholders
//!
//! A [`Placeholder`] is the piece that makes feedback composition work: its
//! stream/behavior views can be consumed before the real source exists, and
//! resolving it (exactly once) connects the source without disturbing
//! anything already wired to the views.

pub mod macros;
pub mod now;
pub mod primitives;

pub use now::{in_turn, with_now, Now};
pub use primitives::behavior::{
    accum, lift2, sink_behavior, stepper, Behavior, SinkBehavior,
};
pub use primitives::listen::Subscription;
pub use primitives::placeholder::{Placeholder, PlaceholderError};
pub use primitives::scope::{CleanupFn, Scope};
pub use primitives::stream::{combine, sink_stream, SinkStream, Stream};
