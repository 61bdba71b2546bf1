//! The reactive primitives: streams, behaviors, placeholders, and the
//! scopes that own subscriptions to them.

pub mod behavior;
pub mod listen;
pub mod placeholder;
pub mod scope;
pub mod stream;
